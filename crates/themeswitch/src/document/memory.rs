//! In-memory document used by tests and the previewer.
//!
//! [`MemoryDocument`] is a small element arena: tags, classes, attributes, and
//! children, plus the root's computed custom properties and inline style. Every
//! mutation the engine performs is appended to an [`Operation`] log so callers
//! can assert on exactly what changed (or that nothing did).
//!
//! Documents are built either with the [`ElementSpec`] builder:
//!
//! ```rust
//! use themeswitch::{ElementSpec, MemoryDocument};
//!
//! let doc = MemoryDocument::new(
//!     ElementSpec::new("html")
//!         .attr("data-theme-variables", "brand")
//!         .child(ElementSpec::new("img").id("logo").class("theme-asset")),
//! )
//! .with_computed("--color--brand", "#111");
//!
//! assert!(doc.find("logo").is_some());
//! ```
//!
//! or from a YAML/JSON [`PageFixture`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Document, ReadyState};
use crate::config::extension;
use crate::error::ThemeError;
use crate::stylesheet::parse_root_properties;

/// Handle to an element of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Declarative description of an element and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl Default for ElementSpec {
    fn default() -> Self {
        Self::new("div")
    }
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// A serialized page: root element, ready state, and root styling.
///
/// `computed` entries win over properties read from `stylesheet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PageFixture {
    pub ready_state: ReadyState,
    pub stylesheet: Option<String>,
    pub computed: BTreeMap<String, String>,
    pub root: ElementSpec,
}

impl Default for PageFixture {
    fn default() -> Self {
        Self {
            ready_state: ReadyState::Complete,
            stylesheet: None,
            computed: BTreeMap::new(),
            root: ElementSpec::new("html"),
        }
    }
}

/// A mutation recorded by [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },
    SetClass {
        node: NodeId,
        class: String,
        present: bool,
    },
    SetRootProperty {
        name: String,
        value: String,
    },
    StopAnimation {
        node: NodeId,
    },
    LoadAnimation {
        node: NodeId,
        src: String,
    },
    PlayAnimation {
        node: NodeId,
    },
}

impl Operation {
    /// The element the operation touched; `None` for root style writes.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Operation::SetAttribute { node, .. }
            | Operation::SetClass { node, .. }
            | Operation::StopAnimation { node }
            | Operation::LoadAnimation { node, .. }
            | Operation::PlayAnimation { node } => Some(*node),
            Operation::SetRootProperty { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    children: Vec<NodeId>,
}

/// In-memory [`Document`] with an operation log.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    ready_state: ReadyState,
    computed: BTreeMap<String, String>,
    inline_style: BTreeMap<String, String>,
    operations: Vec<Operation>,
}

impl MemoryDocument {
    /// Builds a complete (already parsed) document from a root element spec.
    pub fn new(root: ElementSpec) -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            ready_state: ReadyState::Complete,
            computed: BTreeMap::new(),
            inline_style: BTreeMap::new(),
            operations: Vec::new(),
        };
        doc.insert(root);
        doc
    }

    /// Builds a document from a fixture, rejecting duplicate element ids.
    pub fn from_fixture(fixture: PageFixture) -> Result<Self, ThemeError> {
        check_unique_ids(&fixture.root, &mut HashSet::new())?;

        let mut doc = Self::new(fixture.root).with_ready_state(fixture.ready_state);
        if let Some(css) = &fixture.stylesheet {
            doc = doc.with_stylesheet(css);
        }
        for (name, value) in fixture.computed {
            doc.computed.insert(name, value);
        }
        Ok(doc)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        let fixture: PageFixture = serde_yaml::from_str(yaml)?;
        Self::from_fixture(fixture)
    }

    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let fixture: PageFixture = serde_json::from_str(json)?;
        Self::from_fixture(fixture)
    }

    /// Loads a fixture file, choosing the format by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
        match extension(path).as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(ThemeError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn with_ready_state(mut self, state: ReadyState) -> Self {
        self.ready_state = state;
        self
    }

    /// Sets a computed custom property on the root.
    pub fn with_computed(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.computed.insert(name.into(), value.into());
        self
    }

    /// Adds the custom properties declared on `:root`/`html` in `css`.
    pub fn with_stylesheet(mut self, css: &str) -> Self {
        for (name, value) in parse_root_properties(css) {
            self.computed.insert(name, value);
        }
        self
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn set_computed(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.computed.insert(name.into(), value.into());
    }

    /// Appends a subtree under `parent`, returning the new element.
    ///
    /// Unknown parents leave the document unchanged and return `None`.
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> Option<NodeId> {
        if parent.0 >= self.elements.len() {
            return None;
        }
        let node = self.insert(spec);
        self.elements[parent.0].children.push(node);
        Some(node)
    }

    /// First element whose `id` attribute equals `id`.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|node| self.element(*node).attributes.get("id").map(String::as_str) == Some(id))
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.element(node).classes
    }

    pub fn attributes(&self, node: NodeId) -> &BTreeMap<String, String> {
        &self.element(node).attributes
    }

    /// Inline style written on the root.
    pub fn inline_style(&self) -> &BTreeMap<String, String> {
        &self.inline_style
    }

    pub fn root_property(&self, name: &str) -> Option<&str> {
        self.inline_style.get(name).map(String::as_str)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn clear_operations(&mut self) {
        self.operations.clear();
    }

    /// All elements in document order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.elements.len());
        if !self.elements.is_empty() {
            self.walk_from(NodeId(0), &mut order);
        }
        order
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            ready_state: self.ready_state,
            root_style: self.inline_style.clone(),
            elements: self
                .walk()
                .into_iter()
                .map(|node| {
                    let el = self.element(node);
                    ElementSnapshot {
                        node,
                        tag: el.tag.clone(),
                        classes: el.classes.clone(),
                        attributes: el.attributes.clone(),
                    }
                })
                .collect(),
        }
    }

    fn insert(&mut self, spec: ElementSpec) -> NodeId {
        let node = NodeId(self.elements.len());
        let mut attributes = spec.attributes;
        if let Some(id) = spec.id {
            attributes.insert("id".to_string(), id);
        }
        let mut classes: Vec<String> = Vec::with_capacity(spec.classes.len());
        for class in spec.classes {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        self.elements.push(Element {
            tag: spec.tag.to_ascii_lowercase(),
            classes,
            attributes,
            children: Vec::new(),
        });
        for child in spec.children {
            let child_node = self.insert(child);
            self.elements[node.0].children.push(child_node);
        }
        node
    }

    fn walk_from(&self, node: NodeId, order: &mut Vec<NodeId>) {
        order.push(node);
        for child in &self.elements[node.0].children {
            self.walk_from(*child, order);
        }
    }

    fn element(&self, node: NodeId) -> &Element {
        &self.elements[node.0]
    }

    fn element_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.elements[node.0]
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.element(*node).attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.element_mut(*node)
            .attributes
            .insert(name.to_string(), value.to_string());
        self.operations.push(Operation::SetAttribute {
            node: *node,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.element(*node).classes.iter().any(|c| c == class)
    }

    fn set_class(&mut self, node: &NodeId, class: &str, present: bool) {
        let classes = &mut self.element_mut(*node).classes;
        if present {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        } else {
            classes.retain(|c| c != class);
        }
        self.operations.push(Operation::SetClass {
            node: *node,
            class: class.to_string(),
            present,
        });
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.element(*node).tag.clone()
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.element(*node).children.clone()
    }

    fn elements_with_any_class(&self, classes: &[&str]) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|node| {
                let el = self.element(*node);
                el.classes.iter().any(|c| classes.contains(&c.as_str()))
            })
            .collect()
    }

    fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|node| self.element(*node).attributes.contains_key(name))
            .collect()
    }

    fn computed_property(&self, name: &str) -> Option<String> {
        self.inline_style
            .get(name)
            .or_else(|| self.computed.get(name))
            .cloned()
    }

    fn set_root_property(&mut self, name: &str, value: &str) {
        self.inline_style.insert(name.to_string(), value.to_string());
        self.operations.push(Operation::SetRootProperty {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn stop_animation(&mut self, node: &NodeId) {
        self.operations.push(Operation::StopAnimation { node: *node });
    }

    fn load_animation(&mut self, node: &NodeId, src: &str) {
        self.element_mut(*node)
            .attributes
            .insert("src".to_string(), src.to_string());
        self.operations.push(Operation::LoadAnimation {
            node: *node,
            src: src.to_string(),
        });
    }

    fn play_animation(&mut self, node: &NodeId) {
        self.operations.push(Operation::PlayAnimation { node: *node });
    }
}

/// Serializable state of a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocumentSnapshot {
    pub ready_state: ReadyState,
    pub root_style: BTreeMap<String, String>,
    pub elements: Vec<ElementSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSnapshot {
    pub node: NodeId,
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

fn check_unique_ids(spec: &ElementSpec, seen: &mut HashSet<String>) -> Result<(), ThemeError> {
    let id = spec.id.as_ref().or_else(|| spec.attributes.get("id"));
    if let Some(id) = id {
        if !seen.insert(id.clone()) {
            return Err(ThemeError::DuplicateId(id.clone()));
        }
    }
    for child in &spec.children {
        check_unique_ids(child, seen)?;
    }
    Ok(())
}
