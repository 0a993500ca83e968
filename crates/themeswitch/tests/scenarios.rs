//! End-to-end scenarios: boot, user interaction, OS changes, and reloads.

use themeswitch::{
    Appearance, Bootstrap, Document, ElementSpec, ManualScheme, MemoryDocument, MemoryStore,
    NodeId, ReadyState, ThemeConfig, ThemeEngine, ThemeMode, Variant,
};

type Boot = Bootstrap<MemoryDocument, MemoryStore, ManualScheme>;

fn page() -> MemoryDocument {
    MemoryDocument::new(
        ElementSpec::new("html")
            .attr("data-theme-variables", "brand,bg")
            .child(
                ElementSpec::new("nav")
                    .child(ElementSpec::new("button").id("system").attr("data-theme-system", ""))
                    .child(ElementSpec::new("button").id("light").attr("data-theme-light", ""))
                    .child(ElementSpec::new("button").id("dark").attr("data-theme-dark", ""))
                    .child(ElementSpec::new("button").id("toggle").attr("data-theme-toggle", "")),
            )
            .child(
                ElementSpec::new("img")
                    .id("logo")
                    .class("theme-asset")
                    .attr("src", "logo-light.png")
                    .attr("data-light-src", "logo-light.png")
                    .attr("data-dark-src", "logo-dark.png"),
            )
            .child(ElementSpec::new("p").id("night-note").class("dark-asset"))
            .child(ElementSpec::new("p").id("day-note").class("light-asset")),
    )
    .with_computed("--color--brand", "#111")
    .with_computed("--dark--brand", "#eee")
    .with_computed("--color--bg", "#fff")
}

fn boot(variant: Variant, store: &MemoryStore, scheme: &ManualScheme) -> Boot {
    Bootstrap::start(ThemeEngine::new(
        ThemeConfig::default().with_variant(variant),
        page(),
        store.clone(),
        scheme.clone(),
    ))
}

fn node(boot: &Boot, id: &str) -> NodeId {
    boot.engine().document().find(id).unwrap()
}

fn is_dark(boot: &Boot) -> bool {
    let doc = boot.engine().document();
    doc.has_class(&doc.root(), "dark")
}

#[test]
fn test_selecting_dark_applies_colors_class_and_control() {
    let store = MemoryStore::new();
    let mut boot = boot(Variant::TriState, &store, &ManualScheme::light());
    let dark = node(&boot, "dark");

    assert!(boot.click(&dark));

    let doc = boot.engine().document();
    assert_eq!(doc.root_property("--color--brand"), Some("#eee"));
    assert_eq!(doc.root_property("--color--bg"), Some("#fff"));
    assert!(doc.has_class(&doc.root(), "dark"));
    assert!(doc.has_class(&dark, "active"));
    assert_eq!(doc.attribute(&dark, "aria-pressed").as_deref(), Some("true"));
    assert_eq!(
        doc.attribute(&node(&boot, "logo"), "src").as_deref(),
        Some("logo-dark.png")
    );
    assert!(doc.has_class(&node(&boot, "day-note"), "hidden"));
    assert!(!doc.has_class(&node(&boot, "night-note"), "hidden"));
}

#[test]
fn test_first_visit_follows_os_without_persisting() {
    let store = MemoryStore::new();
    let boot = boot(Variant::TriState, &store, &ManualScheme::dark());

    assert!(boot.is_ready());
    assert_eq!(boot.engine().mode(), ThemeMode::System);
    assert!(is_dark(&boot));
    assert!(store.is_empty());
    let doc = boot.engine().document();
    assert!(doc.has_class(&node(&boot, "system"), "active"));
}

#[test]
fn test_persisted_dark_survives_reload_regardless_of_os() {
    let store = MemoryStore::new();
    let scheme = ManualScheme::light();
    let mut first = boot(Variant::TriState, &store, &scheme);
    let dark = node(&first, "dark");
    first.click(&dark);

    for os_dark in [false, true] {
        scheme.set(os_dark);
        let reloaded = boot(Variant::TriState, &store, &scheme);
        assert_eq!(reloaded.engine().mode(), ThemeMode::Dark);
        assert!(is_dark(&reloaded));
    }
}

#[test]
fn test_persisted_system_resolves_to_os_at_reload() {
    let store = MemoryStore::new();
    let scheme = ManualScheme::light();
    let mut first = boot(Variant::TriState, &store, &scheme);
    let system = node(&first, "system");
    first.click(&system);
    assert_eq!(store.get("theme").as_deref(), Some("system"));

    scheme.set(true);
    let reloaded = boot(Variant::TriState, &store, &scheme);
    assert_eq!(
        reloaded.engine().resolve(ThemeMode::System),
        Appearance::Dark
    );
    assert!(is_dark(&reloaded));
}

#[test]
fn test_explicit_choice_ignores_os_changes() {
    let store = MemoryStore::new();
    let scheme = ManualScheme::dark();
    let mut boot = boot(Variant::TriState, &store, &scheme);
    let light = node(&boot, "light");
    boot.click(&light);

    for os_dark in [false, true, false, true] {
        scheme.set(os_dark);
        assert!(!boot.system_changed());
        assert!(!is_dark(&boot));
        assert_eq!(boot.engine().mode(), ThemeMode::Light);
    }
    assert_eq!(store.get("theme").as_deref(), Some("light"));
}

#[test]
fn test_system_mode_tracks_os_changes() {
    let store = MemoryStore::new();
    let scheme = ManualScheme::light();
    let mut boot = boot(Variant::TriState, &store, &scheme);
    assert!(!is_dark(&boot));

    scheme.set(true);
    assert!(boot.system_changed());
    assert!(is_dark(&boot));
    assert_eq!(
        boot.engine().document().root_property("--color--brand"),
        Some("#eee")
    );

    scheme.set(false);
    assert!(boot.system_changed());
    assert!(!is_dark(&boot));
    assert!(store.is_empty());
}

#[test]
fn test_returning_to_system_resumes_tracking() {
    let store = MemoryStore::new();
    let scheme = ManualScheme::light();
    let mut boot = boot(Variant::TriState, &store, &scheme);
    let dark = node(&boot, "dark");
    let system = node(&boot, "system");

    boot.click(&dark);
    scheme.set(false);
    assert!(!boot.system_changed());

    boot.click(&system);
    assert!(!is_dark(&boot));
    scheme.set(true);
    assert!(boot.system_changed());
    assert!(is_dark(&boot));
}

#[test]
fn test_binary_toggle_persists_and_stops_following_os() {
    let store = MemoryStore::new();
    let scheme = ManualScheme::dark();
    let mut boot = boot(Variant::Binary, &store, &scheme);
    let toggle = node(&boot, "toggle");

    assert!(is_dark(&boot));
    assert!(store.is_empty());

    scheme.set(false);
    assert!(boot.system_changed());
    assert!(!is_dark(&boot));

    assert!(boot.click(&toggle));
    assert!(is_dark(&boot));
    assert_eq!(store.get("theme").as_deref(), Some("dark"));
    assert_eq!(
        boot.engine().document().attribute(&toggle, "aria-pressed").as_deref(),
        Some("true")
    );

    scheme.set(true);
    scheme.set(false);
    assert!(!boot.system_changed());
    assert!(is_dark(&boot));
}

#[test]
fn test_binary_variant_ignores_mode_controls() {
    let store = MemoryStore::new();
    let mut boot = boot(Variant::Binary, &store, &ManualScheme::light());
    let dark = node(&boot, "dark");
    assert!(!boot.click(&dark));
    assert!(store.is_empty());
}

#[test]
fn test_assets_added_later_switch_on_next_change_only() {
    let store = MemoryStore::new();
    let mut boot = boot(Variant::TriState, &store, &ManualScheme::light());
    let root = boot.engine().document().root();

    let late = boot
        .engine_mut()
        .document_mut()
        .append(
            root,
            ElementSpec::new("img")
                .class("theme-asset")
                .attr("src", "late-light.png")
                .attr("data-dark-src", "late-dark.png"),
        )
        .unwrap();
    assert_eq!(
        boot.engine().document().attribute(&late, "src").as_deref(),
        Some("late-light.png")
    );

    let dark = node(&boot, "dark");
    boot.click(&dark);
    assert_eq!(
        boot.engine().document().attribute(&late, "src").as_deref(),
        Some("late-dark.png")
    );
}

#[test]
fn test_controls_added_later_are_not_bound() {
    let store = MemoryStore::new();
    let mut boot = boot(Variant::TriState, &store, &ManualScheme::light());
    let root = boot.engine().document().root();
    let late = boot
        .engine_mut()
        .document_mut()
        .append(root, ElementSpec::new("button").attr("data-theme-dark", ""))
        .unwrap();

    assert!(!boot.click(&late));
    assert!(store.is_empty());
}

#[test]
fn test_color_table_is_not_reread() {
    let store = MemoryStore::new();
    let mut boot = boot(Variant::TriState, &store, &ManualScheme::light());
    boot.engine_mut()
        .document_mut()
        .set_computed("--dark--brand", "#abcdef");

    let dark = node(&boot, "dark");
    boot.click(&dark);
    assert_eq!(
        boot.engine().document().root_property("--color--brand"),
        Some("#eee")
    );
}

#[test]
fn test_apply_is_idempotent() {
    let store = MemoryStore::new();
    let mut boot = boot(Variant::TriState, &store, &ManualScheme::light());

    boot.engine_mut().select(ThemeMode::Dark);
    let once = boot.engine().document().snapshot();
    let stored_once = store.get("theme");

    boot.engine_mut().select(ThemeMode::Dark);
    assert_eq!(boot.engine().document().snapshot(), once);
    assert_eq!(store.get("theme"), stored_once);
}

#[test]
fn test_loading_page_defers_colors_until_ready() {
    let store = MemoryStore::new();
    let doc = page().with_ready_state(ReadyState::Loading);
    let mut boot = Bootstrap::start(ThemeEngine::new(
        ThemeConfig::default(),
        doc,
        store,
        ManualScheme::dark(),
    ));

    let logo = node(&boot, "logo");
    assert_eq!(
        boot.engine().document().attribute(&logo, "src").as_deref(),
        Some("logo-dark.png")
    );
    assert!(boot.engine().document().inline_style().is_empty());

    assert!(boot.document_ready());
    assert!(is_dark(&boot));
}

#[test]
fn test_yaml_fixture_end_to_end() {
    let doc = MemoryDocument::from_yaml(
        r##"
stylesheet: |
  :root {
    --color--brand: #111;
    --dark--brand: #eee;
    --color--bg: #fff;
  }
root:
  tag: html
  attributes:
    data-theme-variables: "brand, bg"
  children:
    - tag: button
      id: dark
      attributes:
        data-theme-dark: ""
"##,
    )
    .unwrap();
    let mut boot = Bootstrap::start(ThemeEngine::new(
        ThemeConfig::default(),
        doc,
        MemoryStore::new(),
        ManualScheme::light(),
    ));
    let dark = boot.engine().document().find("dark").unwrap();
    boot.click(&dark);

    let doc = boot.engine().document();
    assert_eq!(doc.root_property("--color--brand"), Some("#eee"));
    assert_eq!(doc.root_property("--color--bg"), Some("#fff"));
    assert!(doc.has_class(&dark, "active"));
}
