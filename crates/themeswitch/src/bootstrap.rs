//! Two-phase startup.
//!
//! Painting the page before the right theme is in place shows a flash of the
//! wrong one. Startup is therefore split:
//!
//! - **Phase 1** runs synchronously when the script is evaluated. It reads the
//!   variable declaration (disabling everything if it is missing), resolves the
//!   boot mode, and switches assets. Colors are left to whatever inline
//!   strategy the page uses before scripts run.
//! - **Phase 2** runs once the document is ready. It captures the color table
//!   (disabling everything if it is empty), applies the boot mode, and binds
//!   the controls.
//!
//! When the document is already past `loading` at phase 1, phase 2 follows
//! immediately. Phase 1 therefore always completes before phase 2.
//!
//! ```rust
//! use themeswitch::{Bootstrap, ElementSpec, ManualScheme, MemoryDocument, MemoryStore, ThemeConfig, ThemeEngine};
//!
//! let doc = MemoryDocument::new(ElementSpec::new("html").attr("data-theme-variables", "bg"))
//!     .with_computed("--color--bg", "#fff")
//!     .with_computed("--dark--bg", "#000");
//! let engine = ThemeEngine::new(ThemeConfig::default(), doc, MemoryStore::new(), ManualScheme::dark());
//!
//! let boot = Bootstrap::start(engine);
//! assert!(boot.is_ready());
//! assert_eq!(boot.engine().document().root_property("--color--bg"), Some("#000"));
//! ```

use crate::document::Document;
use crate::engine::{ApplyCause, ThemeEngine};
use crate::scheme::ColorScheme;
use crate::store::PreferenceStore;

/// Where startup currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Phase 1 done; waiting for the document to be ready.
    Preapplied,
    /// Fully initialized and reacting to events.
    Ready,
    /// Misconfigured page; every event is ignored.
    Disabled,
}

/// Drives a [`ThemeEngine`] through startup and gates events on its phase.
#[derive(Debug)]
pub struct Bootstrap<D: Document, S, C> {
    engine: ThemeEngine<D, S, C>,
    variables: Vec<String>,
    phase: Phase,
}

impl<D, S, C> Bootstrap<D, S, C>
where
    D: Document,
    S: PreferenceStore,
    C: ColorScheme,
{
    /// Runs phase 1, and phase 2 as well if the document is already parsed.
    pub fn start(engine: ThemeEngine<D, S, C>) -> Self {
        let mut boot = Self {
            engine,
            variables: Vec::new(),
            phase: Phase::Preapplied,
        };
        boot.preapply();

        if boot.phase == Phase::Preapplied && boot.engine.document().ready_state().is_ready() {
            boot.document_ready();
        }
        boot
    }

    fn preapply(&mut self) {
        self.variables = self.engine.declared_variables();
        if self.variables.is_empty() {
            log::warn!(
                "theme switching disabled: no variables declared in '{}'",
                self.engine.config().declaration_attribute
            );
            self.phase = Phase::Disabled;
            return;
        }

        let mode = self.engine.boot_mode();
        let appearance = self.engine.resolve(mode);
        let assets = self.engine.switch_assets(appearance);
        log::debug!(
            "phase 1: {} mode ({}), {} assets switched",
            mode,
            appearance,
            assets
        );
    }

    /// Runs phase 2. Returns `false` if it already ran or startup is disabled.
    pub fn document_ready(&mut self) -> bool {
        if self.phase != Phase::Preapplied {
            return false;
        }

        if !self.engine.capture_colors(&self.variables) {
            log::warn!(
                "theme switching disabled: none of [{}] has a value for '{}'",
                self.variables.join(", "),
                self.engine.config().light_prefix
            );
            self.phase = Phase::Disabled;
            return false;
        }

        let mode = self.engine.boot_mode();
        self.engine.apply_mode(mode, ApplyCause::Boot);
        self.engine.bind_controls();
        self.phase = Phase::Ready;
        log::debug!("phase 2: initialized in {} mode", mode);
        true
    }

    /// Forwards a click. Ignored until ready.
    pub fn click(&mut self, node: &D::Node) -> bool {
        self.phase == Phase::Ready && self.engine.click(node)
    }

    /// Forwards an OS preference change. Ignored until ready.
    pub fn system_changed(&mut self) -> bool {
        self.phase == Phase::Ready && self.engine.system_changed()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn is_disabled(&self) -> bool {
        self.phase == Phase::Disabled
    }

    pub fn engine(&self) -> &ThemeEngine<D, S, C> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ThemeEngine<D, S, C> {
        &mut self.engine
    }

    pub fn into_engine(self) -> ThemeEngine<D, S, C> {
        self.engine
    }
}
