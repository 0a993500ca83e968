//! The host document seam.
//!
//! The engine never talks to a DOM directly. Everything it needs from the page
//! goes through [`Document`]: attribute and class access, the two element
//! queries it performs, the root's computed custom properties, inline custom
//! property writes on the root, and the three animation-player calls.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryDocument`]: an in-memory element tree with an operation log, used
//!   by tests and the command-line previewer
//! - `WebDocument` (feature `web`): the browser DOM through `web-sys`

mod memory;

pub use memory::{DocumentSnapshot, ElementSnapshot, ElementSpec, MemoryDocument, NodeId, Operation, PageFixture};

use serde::{Deserialize, Serialize};

/// Parsing progress of the document, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    #[default]
    Complete,
}

impl ReadyState {
    /// Whether the document has finished parsing.
    pub fn is_ready(&self) -> bool {
        !matches!(self, ReadyState::Loading)
    }
}

/// Access to the host document.
///
/// Reads return `None`/empty for anything absent; none of these operations
/// fail. Query results are in document order.
pub trait Document {
    /// Handle to one element.
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// The root (`<html>`) element.
    fn root(&self) -> Self::Node;

    fn ready_state(&self) -> ReadyState;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Adds or removes `class` so that its presence equals `present`.
    fn set_class(&mut self, node: &Self::Node, class: &str, present: bool);

    /// Lower-case tag name.
    fn tag_name(&self, node: &Self::Node) -> String;

    /// Direct element children.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Elements carrying at least one of `classes`, each listed once.
    fn elements_with_any_class(&self, classes: &[&str]) -> Vec<Self::Node>;

    fn elements_with_attribute(&self, name: &str) -> Vec<Self::Node>;

    /// Computed value of a custom property on the root element.
    fn computed_property(&self, name: &str) -> Option<String>;

    /// Writes an inline custom property on the root element.
    fn set_root_property(&mut self, name: &str, value: &str);

    /// Source currently loaded by an animation player.
    fn animation_source(&self, node: &Self::Node) -> Option<String> {
        self.attribute(node, "src")
    }

    fn stop_animation(&mut self, node: &Self::Node);

    fn load_animation(&mut self, node: &Self::Node, src: &str);

    fn play_animation(&mut self, node: &Self::Node);
}
