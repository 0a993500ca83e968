//! Scripted page events.

use std::fmt;
use std::str::FromStr;

use themeswitch::Appearance;

/// One step of a preview script, given on the command line as `--event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `click:<id>`: the user clicks the element with this id.
    Click(String),
    /// `system:dark|light`: the OS preference changes.
    System(Appearance),
    /// `ready`: the document finishes parsing.
    Ready,
    /// `reload`: a fresh page load over the same preference store.
    Reload,
}

impl FromStr for Event {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };
        match (kind, arg) {
            ("click", Some(id)) if !id.is_empty() => Ok(Event::Click(id.to_string())),
            ("system", Some("dark")) => Ok(Event::System(Appearance::Dark)),
            ("system", Some("light")) => Ok(Event::System(Appearance::Light)),
            ("ready", None) => Ok(Event::Ready),
            ("reload", None) => Ok(Event::Reload),
            _ => Err(format!(
                "invalid event '{}' (expected click:<id>, system:dark|light, ready or reload)",
                s
            )),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Click(id) => write!(f, "click:{}", id),
            Event::System(appearance) => write!(f, "system:{}", appearance),
            Event::Ready => f.write_str("ready"),
            Event::Reload => f.write_str("reload"),
        }
    }
}
