//! Toggle controls.
//!
//! Controls are discovered once, at initialization, and kept as
//! [`ControlBinding`]s. The tri-state variant binds one element per mode
//! (`data-theme-system`, `data-theme-light`, `data-theme-dark`); the binary
//! variant binds every `data-theme-toggle` element. Markup added later is not
//! bound.

use crate::config::ThemeConfig;
use crate::document::Document;
use crate::mode::{Appearance, ThemeMode, Variant};

/// What a click on a bound control requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Select exactly this mode.
    Select(ThemeMode),
    /// Flip between light and dark based on the root marker class.
    Toggle,
}

impl ControlAction {
    fn label(&self) -> &'static str {
        match self {
            ControlAction::Select(ThemeMode::System) => "Use system theme",
            ControlAction::Select(ThemeMode::Light) => "Use light theme",
            ControlAction::Select(ThemeMode::Dark) => "Use dark theme",
            ControlAction::Toggle => "Toggle dark mode",
        }
    }
}

/// A control element and the action it triggers.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBinding<N> {
    pub node: N,
    pub action: ControlAction,
}

/// Finds the controls for the configured variant.
pub fn discover<D: Document>(doc: &D, config: &ThemeConfig) -> Vec<ControlBinding<D::Node>> {
    match config.variant {
        Variant::TriState => ThemeMode::ALL
            .iter()
            .flat_map(|mode| {
                doc.elements_with_attribute(config.control_attribute(*mode))
                    .into_iter()
                    .map(move |node| ControlBinding {
                        node,
                        action: ControlAction::Select(*mode),
                    })
            })
            .collect(),
        Variant::Binary => doc
            .elements_with_attribute(&config.toggle_attribute)
            .into_iter()
            .map(|node| ControlBinding {
                node,
                action: ControlAction::Toggle,
            })
            .collect(),
    }
}

/// Sets the baseline `role` and `aria-label` on each bound control.
pub fn set_baseline_aria<D: Document>(doc: &mut D, bindings: &[ControlBinding<D::Node>]) {
    for binding in bindings {
        if doc.attribute(&binding.node, "role").is_none() {
            doc.set_attribute(&binding.node, "role", "button");
        }
        if doc.attribute(&binding.node, "aria-label").is_none() {
            doc.set_attribute(&binding.node, "aria-label", binding.action.label());
        }
    }
}

/// Marks the controls matching the active mode as pressed.
///
/// Mode controls are pressed when their mode is the active one; toggles are
/// pressed while dark is showing.
pub fn sync<D: Document>(
    doc: &mut D,
    bindings: &[ControlBinding<D::Node>],
    config: &ThemeConfig,
    mode: ThemeMode,
    appearance: Appearance,
) {
    for binding in bindings {
        let pressed = match binding.action {
            ControlAction::Select(target) => target == mode,
            ControlAction::Toggle => appearance.is_dark(),
        };
        if doc.has_class(&binding.node, &config.active_class) != pressed {
            doc.set_class(&binding.node, &config.active_class, pressed);
        }
        let value = if pressed { "true" } else { "false" };
        if doc.attribute(&binding.node, "aria-pressed").as_deref() != Some(value) {
            doc.set_attribute(&binding.node, "aria-pressed", value);
        }
    }
}
