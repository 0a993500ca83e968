//! Light/dark color tables built from the root's custom properties.
//!
//! For every declared variable `name` the builder reads two custom properties
//! from the root's computed style:
//!
//! | Property | Role |
//! |---|---|
//! | `--color--<name>` | light value; required |
//! | `--dark--<name>` | dark override; optional |
//!
//! A name whose light value is absent or blank is skipped and appears in
//! neither half. A missing dark override falls back to the light value, so
//! `dark` always has exactly the keys of `light`.
//!
//! The table is captured once. Applying a mode writes `--color--<name>` inline
//! on the root, which shadows the original computed value, so re-reading
//! afterwards would return whatever was last applied.

use crate::config::ThemeConfig;
use crate::document::Document;
use crate::mode::Appearance;

/// Splits a declaration attribute value into variable names.
///
/// Entries are trimmed; empty entries are dropped.
pub fn parse_declaration(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads the variable declaration from the first element carrying the
/// declaration attribute. Empty when the attribute is missing or blank.
pub fn declared_variables<D: Document>(doc: &D, config: &ThemeConfig) -> Vec<String> {
    doc.elements_with_attribute(&config.declaration_attribute)
        .first()
        .and_then(|node| doc.attribute(node, &config.declaration_attribute))
        .map(|value| parse_declaration(&value))
        .unwrap_or_default()
}

/// Light and dark values for each declared variable, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    light: Vec<(String, String)>,
    dark: Vec<(String, String)>,
}

impl ColorTable {
    /// Captures the table from the document's computed root style.
    pub fn build<D: Document>(doc: &D, config: &ThemeConfig, names: &[String]) -> Self {
        let mut table = ColorTable::default();

        for name in names {
            if table.contains(name) {
                continue;
            }
            let light = match read_property(doc, &config.light_property(name)) {
                Some(value) => value,
                None => {
                    log::debug!("skipping theme variable '{}': no light value", name);
                    continue;
                }
            };
            let dark = read_property(doc, &config.dark_property(name)).unwrap_or_else(|| light.clone());

            table.light.push((name.clone(), light));
            table.dark.push((name.clone(), dark));
        }

        table
    }

    pub fn is_empty(&self) -> bool {
        self.light.is_empty()
    }

    pub fn len(&self) -> usize {
        self.light.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.light.iter().any(|(n, _)| n == name)
    }

    /// Value of `name` for `appearance`.
    pub fn get(&self, name: &str, appearance: Appearance) -> Option<&str> {
        self.half(appearance)
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `(name, value)` pairs for `appearance`.
    pub fn half(&self, appearance: Appearance) -> &[(String, String)] {
        match appearance {
            Appearance::Light => &self.light,
            Appearance::Dark => &self.dark,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.light.iter().map(|(n, _)| n.as_str())
    }
}

fn read_property<D: Document>(doc: &D, property: &str) -> Option<String> {
    doc.computed_property(property)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ElementSpec, MemoryDocument};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_declaration_trims_and_drops_empty() {
        assert_eq!(parse_declaration(" brand , bg,, "), names(&["brand", "bg"]));
        assert!(parse_declaration("").is_empty());
        assert!(parse_declaration(" , ").is_empty());
    }

    #[test]
    fn test_declared_variables_uses_first_declaration() {
        let doc = MemoryDocument::new(
            ElementSpec::new("html")
                .child(ElementSpec::new("body").attr("data-theme-variables", "a,b"))
                .child(ElementSpec::new("div").attr("data-theme-variables", "c")),
        );
        assert_eq!(
            declared_variables(&doc, &ThemeConfig::default()),
            names(&["a", "b"])
        );
    }

    #[test]
    fn test_declared_variables_missing() {
        let doc = MemoryDocument::new(ElementSpec::new("html"));
        assert!(declared_variables(&doc, &ThemeConfig::default()).is_empty());
    }

    #[test]
    fn test_dark_override_and_fallback() {
        let doc = MemoryDocument::new(ElementSpec::new("html"))
            .with_computed("--color--brand", " #111")
            .with_computed("--dark--brand", "#eee ")
            .with_computed("--color--bg", "#fff");
        let table = ColorTable::build(&doc, &ThemeConfig::default(), &names(&["brand", "bg"]));

        assert_eq!(table.get("brand", Appearance::Light), Some("#111"));
        assert_eq!(table.get("brand", Appearance::Dark), Some("#eee"));
        assert_eq!(table.get("bg", Appearance::Dark), Some("#fff"));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["brand", "bg"]);
    }

    #[test]
    fn test_blank_light_value_is_skipped() {
        let doc = MemoryDocument::new(ElementSpec::new("html"))
            .with_computed("--color--ghost", "   ")
            .with_computed("--dark--ghost", "#000")
            .with_computed("--color--bg", "#fff");
        let table = ColorTable::build(
            &doc,
            &ThemeConfig::default(),
            &names(&["ghost", "missing", "bg"]),
        );

        assert_eq!(table.len(), 1);
        assert!(!table.contains("ghost"));
        assert!(!table.contains("missing"));
        assert_eq!(table.get("ghost", Appearance::Dark), None);
    }

    #[test]
    fn test_blank_dark_override_falls_back() {
        let doc = MemoryDocument::new(ElementSpec::new("html"))
            .with_computed("--color--bg", "#fff")
            .with_computed("--dark--bg", "");
        let table = ColorTable::build(&doc, &ThemeConfig::default(), &names(&["bg"]));
        assert_eq!(table.get("bg", Appearance::Dark), Some("#fff"));
    }

    #[test]
    fn test_duplicate_names_kept_once() {
        let doc = MemoryDocument::new(ElementSpec::new("html")).with_computed("--color--bg", "#fff");
        let table = ColorTable::build(&doc, &ThemeConfig::default(), &names(&["bg", "bg"]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_no_names_builds_empty_table() {
        let doc = MemoryDocument::new(ElementSpec::new("html"));
        let table = ColorTable::build(&doc, &ThemeConfig::default(), &[]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_custom_prefixes() {
        let config = ThemeConfig {
            light_prefix: "--c-".to_string(),
            dark_prefix: "--c-dark-".to_string(),
            ..ThemeConfig::default()
        };
        let doc = MemoryDocument::new(ElementSpec::new("html"))
            .with_computed("--c-text", "black")
            .with_computed("--c-dark-text", "white");
        let table = ColorTable::build(&doc, &config, &names(&["text"]));
        assert_eq!(table.get("text", Appearance::Dark), Some("white"));
    }
}
