//! Preview output: plain data, rendered as styled text or JSON.

use std::collections::BTreeMap;

use console::Style;
use minijinja::{Environment, Value};
use serde::Serialize;
use themeswitch::document::{DocumentSnapshot, ElementSnapshot};
use themeswitch::{Appearance, Operation, Phase, ThemeMode, Variant};

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub event: String,
    pub handled: bool,
}

/// Everything the previewer shows about the current page load.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub page: String,
    pub phase: String,
    pub variant: Variant,
    pub mode: ThemeMode,
    pub appearance: Appearance,
    pub stored: Option<String>,
    pub loads: usize,
    pub steps: Vec<StepReport>,
    pub document: DocumentSnapshot,
    pub animations: Vec<Operation>,
}

impl Report {
    pub fn phase_name(phase: Phase) -> String {
        match phase {
            Phase::Preapplied => "preapplied",
            Phase::Ready => "ready",
            Phase::Disabled => "disabled",
        }
        .to_string()
    }

    pub fn is_animation(op: &Operation) -> bool {
        matches!(
            op,
            Operation::StopAnimation { .. }
                | Operation::LoadAnimation { .. }
                | Operation::PlayAnimation { .. }
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report. `use_color` forces styling on or off.
    pub fn to_text(&self, use_color: bool) -> Result<String, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        register_filters(&mut env, use_color);
        env.add_template("report", REPORT_TEMPLATE)?;

        let view = TextView {
            report: self,
            stored: self.stored.as_deref().unwrap_or("-"),
            root_style: self
                .document
                .root_style
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect(),
            elements: self.document.elements.iter().map(ElementLine::new).collect(),
            animations: self
                .animations
                .iter()
                .map(|op| animation_line(op, &self.document))
                .collect(),
        };
        env.get_template("report")?.render(&view)
    }
}

const REPORT_TEMPLATE: &str = r#"{{ "page" | style("header") }} {{ report.page }}
  phase     {{ report.phase | style("value") }}
  variant   {{ report.variant }}
  mode      {{ report.mode | style("value") }} {{ ("(" ~ report.appearance ~ ")") | style("dim") }}
  stored    {{ stored }}
  loads     {{ report.loads }}
{% if report.steps %}
{{ "events" | style("header") }}
{% for step in report.steps %}
{% if step.handled %}
  {{ "*" | style("ok") }} {{ step.event }}
{% else %}
  {{ "-" | style("dim") }} {{ step.event }} {{ "(ignored)" | style("dim") }}
{% endif %}
{% endfor %}
{% endif %}
{{ "root style" | style("header") }}
{% for name, value in root_style %}
  {{ name | style("label") }}: {{ value }}
{% else %}
  {{ "(none)" | style("dim") }}
{% endfor %}
{{ "elements" | style("header") }}
{% for el in elements %}
  {{ el.selector | style("label") }}{{ el.attributes | style("dim") }}
{% endfor %}
{% if animations %}
{{ "animations" | style("header") }}
{% for line in animations %}
  {{ line }}
{% endfor %}
{% endif %}
"#;

#[derive(Serialize)]
struct TextView<'a> {
    report: &'a Report,
    stored: &'a str,
    root_style: Vec<(&'a str, &'a str)>,
    elements: Vec<ElementLine>,
    animations: Vec<String>,
}

/// `tag#id.class.class` plus ` attr="value" ...` when there are attributes.
#[derive(Serialize)]
struct ElementLine {
    selector: String,
    attributes: String,
}

impl ElementLine {
    fn new(element: &ElementSnapshot) -> Self {
        let mut selector = element.tag.clone();
        if let Some(id) = element.attributes.get("id") {
            selector.push('#');
            selector.push_str(id);
        }
        for class in &element.classes {
            selector.push('.');
            selector.push_str(class);
        }

        let attributes: String = element
            .attributes
            .iter()
            .filter(|(name, _)| name.as_str() != "id")
            .map(|(name, value)| format!(" {}=\"{}\"", name, value))
            .collect();

        Self {
            selector,
            attributes,
        }
    }
}

fn styles() -> BTreeMap<&'static str, Style> {
    BTreeMap::from([
        ("header", Style::new().bold().cyan()),
        ("label", Style::new().yellow()),
        ("value", Style::new().green()),
        ("ok", Style::new().green().bold()),
        ("dim", Style::new().dim()),
    ])
}

/// Registers `style(name)`; empty values and unknown names pass through plain.
fn register_filters(env: &mut Environment<'static>, use_color: bool) {
    let styles = styles();
    env.add_filter("style", move |value: Value, name: String| -> String {
        let text = value.to_string();
        match styles.get(name.as_str()) {
            Some(style) if !text.is_empty() => {
                style.clone().force_styling(use_color).apply_to(text).to_string()
            }
            _ => text,
        }
    });
}

fn animation_line(op: &Operation, document: &DocumentSnapshot) -> String {
    let target = op
        .node()
        .and_then(|node| document.elements.iter().find(|el| el.node == node))
        .map(|el| match el.attributes.get("id") {
            Some(id) => format!("#{}", id),
            None => el.tag.clone(),
        })
        .unwrap_or_default();

    match op {
        Operation::StopAnimation { .. } => format!("{} stop", target),
        Operation::LoadAnimation { src, .. } => format!("{} load {}", target, src),
        Operation::PlayAnimation { .. } => format!("{} play", target),
        _ => target,
    }
}
