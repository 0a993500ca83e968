//! Theme-aware asset switching.
//!
//! Every apply cycle queries the document afresh for elements carrying the
//! asset marker class or either visibility class; nothing is cached, so
//! elements inserted after load are handled on the next mode change.
//!
//! Each element is classified into one [`AssetKind`]:
//!
//! | Kind | Detection | Effect |
//! |---|---|---|
//! | [`Picture`](AssetKind::Picture) | marker class, `<picture>` | source-switch each `<source>`/`<img>` child |
//! | [`Animation`](AssetKind::Animation) | marker class, player tag | stop, load, play when the source changes |
//! | [`Image`](AssetKind::Image) | marker class, any other tag | set `src`/`srcset` from the mode attributes |
//! | [`Visibility`](AssetKind::Visibility) | one visibility class | hidden unless its appearance is active |
//! | [`Conflicting`](AssetKind::Conflicting) | both visibility classes | left alone |
//!
//! A missing attribute for the requested mode leaves the element as it is.

use crate::config::ThemeConfig;
use crate::document::Document;
use crate::mode::Appearance;

/// How a theme-aware element reacts to a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Picture,
    Animation,
    /// Visible only while the given appearance is active.
    Visibility(Appearance),
    /// Carries both visibility classes; never toggled.
    Conflicting,
}

impl AssetKind {
    /// Classifies `node`, or `None` when it is not theme-aware.
    pub fn classify<D: Document>(doc: &D, node: &D::Node, config: &ThemeConfig) -> Option<Self> {
        if doc.has_class(node, &config.asset_class) {
            let tag = doc.tag_name(node);
            return Some(if tag == "picture" {
                AssetKind::Picture
            } else if config.is_player_tag(&tag) {
                AssetKind::Animation
            } else {
                AssetKind::Image
            });
        }

        let dark = doc.has_class(node, &config.dark_asset_class);
        let light = doc.has_class(node, &config.light_asset_class);
        match (dark, light) {
            (true, true) => Some(AssetKind::Conflicting),
            (true, false) => Some(AssetKind::Visibility(Appearance::Dark)),
            (false, true) => Some(AssetKind::Visibility(Appearance::Light)),
            (false, false) => None,
        }
    }

    /// Brings `node` in line with `appearance`.
    pub fn apply<D: Document>(
        &self,
        doc: &mut D,
        node: &D::Node,
        config: &ThemeConfig,
        appearance: Appearance,
    ) {
        match self {
            AssetKind::Image => switch_image(doc, node, config, appearance),
            AssetKind::Picture => switch_picture(doc, node, config, appearance),
            AssetKind::Animation => switch_animation(doc, node, config, appearance),
            AssetKind::Visibility(visible_in) => {
                switch_visibility(doc, node, config, *visible_in == appearance)
            }
            AssetKind::Conflicting => {
                log::debug!(
                    "ignoring {:?}: carries both '{}' and '{}'",
                    node,
                    config.dark_asset_class,
                    config.light_asset_class
                );
            }
        }
    }
}

/// Switches every theme-aware element to `appearance`.
///
/// Returns the number of theme-aware elements found.
pub fn switch_assets<D: Document>(doc: &mut D, config: &ThemeConfig, appearance: Appearance) -> usize {
    let nodes = doc.elements_with_any_class(&[
        config.asset_class.as_str(),
        config.dark_asset_class.as_str(),
        config.light_asset_class.as_str(),
    ]);

    let mut count = 0;
    for node in &nodes {
        if let Some(kind) = AssetKind::classify(doc, node, config) {
            kind.apply(doc, node, config, appearance);
            count += 1;
        }
    }
    log::trace!("switched {} theme assets to {}", count, appearance);
    count
}

fn switch_image<D: Document>(doc: &mut D, node: &D::Node, config: &ThemeConfig, appearance: Appearance) {
    copy_attribute(doc, node, config.src_attribute(appearance), "src");
    copy_attribute(doc, node, config.srcset_attribute(appearance), "srcset");
}

fn switch_picture<D: Document>(doc: &mut D, node: &D::Node, config: &ThemeConfig, appearance: Appearance) {
    for child in doc.children(node) {
        let tag = doc.tag_name(&child);
        if tag == "source" || tag == "img" {
            switch_image(doc, &child, config, appearance);
        }
    }
}

fn switch_animation<D: Document>(
    doc: &mut D,
    node: &D::Node,
    config: &ThemeConfig,
    appearance: Appearance,
) {
    let Some(target) = doc.attribute(node, config.src_attribute(appearance)) else {
        return;
    };
    if doc.animation_source(node).as_deref() == Some(target.as_str()) {
        return;
    }
    doc.stop_animation(node);
    doc.load_animation(node, &target);
    doc.play_animation(node);
}

fn switch_visibility<D: Document>(doc: &mut D, node: &D::Node, config: &ThemeConfig, visible: bool) {
    let hidden = !visible;
    if doc.has_class(node, &config.hidden_class) != hidden {
        doc.set_class(node, &config.hidden_class, hidden);
    }
}

fn copy_attribute<D: Document>(doc: &mut D, node: &D::Node, from: &str, to: &str) {
    if let Some(value) = doc.attribute(node, from) {
        if doc.attribute(node, to).as_deref() != Some(value.as_str()) {
            doc.set_attribute(node, to, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ElementSpec, MemoryDocument, Operation};

    fn doc_with(child: ElementSpec) -> MemoryDocument {
        MemoryDocument::new(ElementSpec::new("html").child(child))
    }

    #[test]
    fn test_classify_by_tag_and_class() {
        let config = ThemeConfig::default();
        let doc = MemoryDocument::new(
            ElementSpec::new("html")
                .child(ElementSpec::new("img").id("img").class("theme-asset"))
                .child(ElementSpec::new("picture").id("pic").class("theme-asset"))
                .child(ElementSpec::new("lottie-player").id("anim").class("theme-asset"))
                .child(ElementSpec::new("div").id("dark").class("dark-asset"))
                .child(ElementSpec::new("div").id("light").class("light-asset"))
                .child(
                    ElementSpec::new("div")
                        .id("both")
                        .class("dark-asset")
                        .class("light-asset"),
                )
                .child(ElementSpec::new("div").id("plain")),
        );
        let kind = |id: &str| AssetKind::classify(&doc, &doc.find(id).unwrap(), &config);

        assert_eq!(kind("img"), Some(AssetKind::Image));
        assert_eq!(kind("pic"), Some(AssetKind::Picture));
        assert_eq!(kind("anim"), Some(AssetKind::Animation));
        assert_eq!(kind("dark"), Some(AssetKind::Visibility(Appearance::Dark)));
        assert_eq!(kind("light"), Some(AssetKind::Visibility(Appearance::Light)));
        assert_eq!(kind("both"), Some(AssetKind::Conflicting));
        assert_eq!(kind("plain"), None);
    }

    #[test]
    fn test_image_switches_src_and_srcset() {
        let config = ThemeConfig::default();
        let mut doc = doc_with(
            ElementSpec::new("img")
                .id("hero")
                .class("theme-asset")
                .attr("src", "light.png")
                .attr("data-light-src", "light.png")
                .attr("data-dark-src", "dark.png")
                .attr("data-dark-srcset", "dark@2x.png 2x"),
        );
        let hero = doc.find("hero").unwrap();

        switch_assets(&mut doc, &config, Appearance::Dark);
        assert_eq!(doc.attribute(&hero, "src").as_deref(), Some("dark.png"));
        assert_eq!(doc.attribute(&hero, "srcset").as_deref(), Some("dark@2x.png 2x"));

        switch_assets(&mut doc, &config, Appearance::Light);
        assert_eq!(doc.attribute(&hero, "src").as_deref(), Some("light.png"));
        // no light srcset declared: the dark one stays
        assert_eq!(doc.attribute(&hero, "srcset").as_deref(), Some("dark@2x.png 2x"));
    }

    #[test]
    fn test_missing_target_source_is_untouched() {
        let config = ThemeConfig::default();
        let mut doc = doc_with(
            ElementSpec::new("img")
                .id("logo")
                .class("theme-asset")
                .attr("src", "current.png")
                .attr("data-dark-src", "dark.png"),
        );
        let logo = doc.find("logo").unwrap();

        switch_assets(&mut doc, &config, Appearance::Light);

        assert!(doc.operations().is_empty());
        assert_eq!(doc.attribute(&logo, "src").as_deref(), Some("current.png"));
    }

    #[test]
    fn test_picture_switches_each_child() {
        let config = ThemeConfig::default();
        let mut doc = doc_with(
            ElementSpec::new("picture")
                .class("theme-asset")
                .child(
                    ElementSpec::new("source")
                        .id("wide")
                        .attr("data-light-srcset", "wide-light.webp")
                        .attr("data-dark-srcset", "wide-dark.webp"),
                )
                .child(ElementSpec::new("source").id("narrow").attr("data-light-srcset", "n.webp"))
                .child(
                    ElementSpec::new("img")
                        .id("fallback")
                        .attr("data-light-src", "f-light.png")
                        .attr("data-dark-src", "f-dark.png"),
                )
                .child(ElementSpec::new("span").id("caption").attr("data-dark-src", "x")),
        );

        switch_assets(&mut doc, &config, Appearance::Dark);

        let attr = |id: &str, name: &str| doc.attribute(&doc.find(id).unwrap(), name);
        assert_eq!(attr("wide", "srcset").as_deref(), Some("wide-dark.webp"));
        assert_eq!(attr("narrow", "srcset"), None);
        assert_eq!(attr("fallback", "src").as_deref(), Some("f-dark.png"));
        assert_eq!(attr("caption", "src"), None);
    }

    #[test]
    fn test_animation_reloads_only_on_change() {
        let config = ThemeConfig::default();
        let mut doc = doc_with(
            ElementSpec::new("lottie-player")
                .id("anim")
                .class("theme-asset")
                .attr("src", "light.json")
                .attr("data-light-src", "light.json")
                .attr("data-dark-src", "dark.json"),
        );
        let anim = doc.find("anim").unwrap();

        switch_assets(&mut doc, &config, Appearance::Light);
        assert!(doc.operations().is_empty());

        switch_assets(&mut doc, &config, Appearance::Dark);
        assert_eq!(
            doc.operations(),
            &[
                Operation::StopAnimation { node: anim },
                Operation::LoadAnimation {
                    node: anim,
                    src: "dark.json".to_string()
                },
                Operation::PlayAnimation { node: anim },
            ]
        );

        doc.clear_operations();
        switch_assets(&mut doc, &config, Appearance::Dark);
        assert!(doc.operations().is_empty());
    }

    #[test]
    fn test_visibility_pair() {
        let config = ThemeConfig::default();
        let mut doc = MemoryDocument::new(
            ElementSpec::new("html")
                .child(ElementSpec::new("div").id("d").class("dark-asset"))
                .child(ElementSpec::new("div").id("l").class("light-asset")),
        );
        let d = doc.find("d").unwrap();
        let l = doc.find("l").unwrap();

        switch_assets(&mut doc, &config, Appearance::Dark);
        assert!(!doc.has_class(&d, "hidden"));
        assert!(doc.has_class(&l, "hidden"));

        switch_assets(&mut doc, &config, Appearance::Light);
        assert!(doc.has_class(&d, "hidden"));
        assert!(!doc.has_class(&l, "hidden"));
    }

    #[test]
    fn test_conflicting_visibility_is_never_hidden() {
        let config = ThemeConfig::default();
        let mut doc = doc_with(
            ElementSpec::new("div")
                .id("both")
                .class("dark-asset")
                .class("light-asset"),
        );
        let both = doc.find("both").unwrap();

        for appearance in [Appearance::Dark, Appearance::Light, Appearance::Dark] {
            switch_assets(&mut doc, &config, appearance);
            assert!(!doc.has_class(&both, "hidden"));
        }
        assert!(doc.operations().is_empty());
    }

    #[test]
    fn test_marker_class_takes_precedence_over_visibility() {
        let config = ThemeConfig::default();
        let doc = doc_with(
            ElementSpec::new("img")
                .id("x")
                .class("theme-asset")
                .class("dark-asset"),
        );
        let kind = AssetKind::classify(&doc, &doc.find("x").unwrap(), &config);
        assert_eq!(kind, Some(AssetKind::Image));
    }

    #[test]
    fn test_switch_assets_counts_theme_aware_elements() {
        let config = ThemeConfig::default();
        let mut doc = MemoryDocument::new(
            ElementSpec::new("html")
                .child(ElementSpec::new("img").class("theme-asset"))
                .child(ElementSpec::new("div").class("dark-asset"))
                .child(ElementSpec::new("div").class("unrelated")),
        );
        assert_eq!(switch_assets(&mut doc, &config, Appearance::Dark), 2);
    }
}
