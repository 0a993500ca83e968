//! # themeswitch - Light/Dark Theme Switching for Web Pages
//!
//! `themeswitch` drives a page's light/dark presentation from declarative
//! markup: a list of themeable CSS custom properties, theme-aware assets, and
//! optional toggle controls. It follows the operating system's color-scheme
//! preference until the user picks a mode, persists that choice, and applies
//! the right theme before first paint.
//!
//! ## Core Concepts
//!
//! - [`ThemeMode`]: `System`, `Light` or `Dark`; the unit of persistence
//! - [`Appearance`]: the resolved light/dark outcome actually painted
//! - [`ColorTable`]: light and dark values captured once per declared variable
//! - [`AssetKind`]: how an image, picture, animation player, or visibility
//!   marker reacts to a mode change
//! - [`ThemeEngine`]: resolution and the ordered application of a mode
//! - [`Bootstrap`]: two-phase startup and event gating
//! - [`Variant`]: tri-state controls (system/light/dark) or a single toggle
//!
//! ## Seams
//!
//! The engine reaches the page only through three traits:
//!
//! - [`Document`]: DOM attribute/class access and root custom properties
//! - [`PreferenceStore`]: the persisted mode
//! - [`ColorScheme`]: the OS "prefers dark" signal
//!
//! In-memory implementations ([`MemoryDocument`], [`MemoryStore`],
//! [`ManualScheme`]) back the tests and the `themeswitch` previewer. The `web`
//! feature adds the browser implementations in [`web`].
//!
//! ## Markup Contract
//!
//! ```html
//! <html data-theme-variables="brand,bg">
//!   <style>
//!     :root { --color--brand: #111; --dark--brand: #eee; --color--bg: #fff; }
//!   </style>
//!   <img class="theme-asset" data-light-src="logo.png" data-dark-src="logo-dark.png">
//!   <div class="dark-asset">Shown only in dark mode</div>
//!   <button data-theme-system>Auto</button>
//!   <button data-theme-light>Light</button>
//!   <button data-theme-dark>Dark</button>
//! </html>
//! ```
//!
//! Every name above can be changed through [`ThemeConfig`].
//!
//! ## Quick Start
//!
//! ```rust
//! use themeswitch::{
//!     Bootstrap, ElementSpec, ManualScheme, MemoryDocument, MemoryStore, ThemeConfig,
//!     ThemeEngine, ThemeMode,
//! };
//!
//! let doc = MemoryDocument::new(
//!     ElementSpec::new("html")
//!         .attr("data-theme-variables", "brand,bg")
//!         .child(ElementSpec::new("button").id("dark").attr("data-theme-dark", "")),
//! )
//! .with_stylesheet(":root { --color--brand: #111; --dark--brand: #eee; --color--bg: #fff; }");
//!
//! let store = MemoryStore::new();
//! let engine = ThemeEngine::new(ThemeConfig::default(), doc, store.clone(), ManualScheme::light());
//! let mut boot = Bootstrap::start(engine);
//!
//! let button = boot.engine().document().find("dark").unwrap();
//! boot.click(&button);
//!
//! let doc = boot.engine().document();
//! assert_eq!(doc.root_property("--color--brand"), Some("#eee"));
//! assert_eq!(doc.root_property("--color--bg"), Some("#fff"));
//! assert_eq!(store.get("theme").as_deref(), Some("dark"));
//! assert_eq!(boot.engine().mode(), ThemeMode::Dark);
//! ```

pub mod assets;
mod bootstrap;
pub mod colors;
pub mod config;
pub mod controls;
pub mod document;
mod engine;
mod error;
mod mode;
pub mod scheme;
pub mod store;
mod stylesheet;
#[cfg(feature = "web")]
pub mod web;

pub use assets::{switch_assets, AssetKind};
pub use bootstrap::{Bootstrap, Phase};
pub use colors::{parse_declaration, ColorTable};
pub use config::ThemeConfig;
pub use controls::{ControlAction, ControlBinding};
pub use document::{Document, ElementSpec, MemoryDocument, NodeId, Operation, PageFixture, ReadyState};
pub use engine::{ApplyCause, ThemeEngine};
pub use error::ThemeError;
pub use mode::{Appearance, ThemeMode, Variant};
pub use scheme::{
    detect_appearance, reset_scheme_detector, set_scheme_detector, ColorScheme, ManualScheme,
    OsScheme,
};
pub use store::{FileStore, MemoryStore, PreferenceStore};
pub use stylesheet::parse_root_properties;
