//! Theme modes, variants, and the resolved appearance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// The setting that governs appearance, and the unit of persistence.
///
/// `System` defers to the operating system's color-scheme signal. The binary
/// variant only ever persists `Light` or `Dark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    /// All modes, in control order.
    pub const ALL: [ThemeMode; 3] = [ThemeMode::System, ThemeMode::Light, ThemeMode::Dark];

    /// The string persisted for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// The fixed appearance for explicit modes; `None` for `System`.
    pub fn explicit_appearance(&self) -> Option<Appearance> {
        match self {
            ThemeMode::System => None,
            ThemeMode::Light => Some(Appearance::Light),
            ThemeMode::Dark => Some(Appearance::Dark),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "system" => Ok(ThemeMode::System),
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(ThemeError::UnknownMode(other.to_string())),
        }
    }
}

impl From<Appearance> for ThemeMode {
    fn from(appearance: Appearance) -> Self {
        match appearance {
            Appearance::Light => ThemeMode::Light,
            Appearance::Dark => ThemeMode::Dark,
        }
    }
}

/// The resolved appearance actually painted. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Light background, dark text.
    Light,
    /// Dark background, light text.
    Dark,
}

impl Appearance {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            Appearance::Dark
        } else {
            Appearance::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Appearance::Dark)
    }

    pub fn opposite(&self) -> Self {
        match self {
            Appearance::Light => Appearance::Dark,
            Appearance::Dark => Appearance::Light,
        }
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Appearance::Light => f.write_str("light"),
            Appearance::Dark => f.write_str("dark"),
        }
    }
}

/// Which control layout and tie-break rules the page uses.
///
/// | | Tri-state | Binary |
/// |---|---|---|
/// | Controls | one per mode | one generic toggle |
/// | Boot without preference | `System` | mirror the OS, unsaved |
/// | Follows OS changes | while mode is `System` | while nothing is persisted |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    TriState,
    Binary,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::TriState => f.write_str("tri-state"),
            Variant::Binary => f.write_str("binary"),
        }
    }
}

impl FromStr for Variant {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tri-state" | "tristate" => Ok(Variant::TriState),
            "binary" => Ok(Variant::Binary),
            other => Err(ThemeError::UnknownVariant(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_string_forms() {
        for mode in ThemeMode::ALL {
            assert_eq!(mode.as_str().parse::<ThemeMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_parse_rejects_unknown() {
        assert!(matches!(
            "sepia".parse::<ThemeMode>(),
            Err(ThemeError::UnknownMode(_))
        ));
        assert!("".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_mode_parse_trims() {
        assert_eq!(" dark ".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
    }

    #[test]
    fn test_explicit_appearance() {
        assert_eq!(ThemeMode::System.explicit_appearance(), None);
        assert_eq!(
            ThemeMode::Dark.explicit_appearance(),
            Some(Appearance::Dark)
        );
        assert_eq!(
            ThemeMode::Light.explicit_appearance(),
            Some(Appearance::Light)
        );
    }

    #[test]
    fn test_appearance_helpers() {
        assert!(Appearance::from_dark(true).is_dark());
        assert!(!Appearance::from_dark(false).is_dark());
        assert_eq!(Appearance::Dark.opposite(), Appearance::Light);
        assert_eq!(ThemeMode::from(Appearance::Dark), ThemeMode::Dark);
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("binary".parse::<Variant>().unwrap(), Variant::Binary);
        assert_eq!("tri-state".parse::<Variant>().unwrap(), Variant::TriState);
        assert!("quad".parse::<Variant>().is_err());
    }

    #[test]
    fn test_mode_serde_lowercase() {
        let json = serde_json::to_string(&ThemeMode::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
        let variant: Variant = serde_json::from_str("\"binary\"").unwrap();
        assert_eq!(variant, Variant::Binary);
    }
}
