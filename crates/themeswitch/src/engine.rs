//! The theme engine: mode resolution and application.
//!
//! [`ThemeEngine`] owns everything one document load needs: the config, the
//! document, the preference store, the OS signal, the captured
//! [`ColorTable`], the active [`ThemeMode`], and the bound controls.
//!
//! # Resolution
//!
//! `Dark` and `Light` resolve to themselves; `System` resolves to the OS signal
//! at the time of the call. The boot mode is the persisted preference when it
//! is valid for the variant. Without one, the tri-state variant boots in
//! `System` and the binary variant mirrors the OS as an explicit light/dark
//! mode, without saving it.
//!
//! # Application
//!
//! [`ThemeEngine::apply_mode`] performs, in this order:
//!
//! 1. persist the mode, for [`ApplyCause::Explicit`] only
//! 2. set the root dark class to match the appearance
//! 3. write the color table half for the appearance as inline root properties
//! 4. switch theme assets
//! 5. sync control active/pressed state
//!
//! Later steps rely on earlier ones: assets and controls are updated after the
//! root class and colors already reflect the new appearance.

use crate::assets::switch_assets;
use crate::colors::{declared_variables, ColorTable};
use crate::config::ThemeConfig;
use crate::controls::{self, ControlAction, ControlBinding};
use crate::document::Document;
use crate::mode::{Appearance, ThemeMode, Variant};
use crate::scheme::ColorScheme;
use crate::store::PreferenceStore;

/// Why a mode is being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyCause {
    /// Initial application during boot; nothing is persisted.
    Boot,
    /// The user chose the mode; it is persisted.
    Explicit,
    /// The OS preference changed; nothing is persisted.
    System,
}

/// Theme state and behavior for one document.
pub struct ThemeEngine<D: Document, S, C> {
    config: ThemeConfig,
    document: D,
    store: S,
    scheme: C,
    table: ColorTable,
    mode: ThemeMode,
    controls: Vec<ControlBinding<D::Node>>,
}

impl<D, S, C> ThemeEngine<D, S, C>
where
    D: Document,
    S: PreferenceStore,
    C: ColorScheme,
{
    /// Creates an engine. Nothing is read or written until it is used.
    pub fn new(config: ThemeConfig, document: D, store: S, scheme: C) -> Self {
        Self {
            config,
            document,
            store,
            scheme,
            table: ColorTable::default(),
            mode: ThemeMode::System,
            controls: Vec::new(),
        }
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheme(&self) -> &C {
        &self.scheme
    }

    pub fn color_table(&self) -> &ColorTable {
        &self.table
    }

    /// The mode most recently applied.
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn controls(&self) -> &[ControlBinding<D::Node>] {
        &self.controls
    }

    /// Consumes the engine, returning the document.
    pub fn into_document(self) -> D {
        self.document
    }

    /// Variable names declared by the document.
    pub fn declared_variables(&self) -> Vec<String> {
        declared_variables(&self.document, &self.config)
    }

    /// Captures the color table from the document. Returns `true` when it
    /// holds at least one variable.
    pub fn capture_colors(&mut self, names: &[String]) -> bool {
        self.table = ColorTable::build(&self.document, &self.config, names);
        log::debug!(
            "captured {} of {} theme variables",
            self.table.len(),
            names.len()
        );
        !self.table.is_empty()
    }

    /// The persisted mode, when present and valid for the variant.
    ///
    /// Under the binary variant a stored `system` counts as no preference.
    pub fn stored_mode(&self) -> Option<ThemeMode> {
        let raw = self.store.load(&self.config.storage_key)?;
        match raw.parse::<ThemeMode>() {
            Ok(ThemeMode::System) if self.config.variant == Variant::Binary => {
                log::debug!("binary variant ignores stored 'system' preference");
                None
            }
            Ok(mode) => Some(mode),
            Err(e) => {
                log::debug!("ignoring stored preference: {}", e);
                None
            }
        }
    }

    /// The mode to boot in.
    pub fn boot_mode(&self) -> ThemeMode {
        if let Some(mode) = self.stored_mode() {
            return mode;
        }
        match self.config.variant {
            Variant::TriState => ThemeMode::System,
            Variant::Binary => ThemeMode::from(self.scheme.appearance()),
        }
    }

    /// Resolves a mode to the appearance it paints right now.
    pub fn resolve(&self, mode: ThemeMode) -> Appearance {
        mode.explicit_appearance()
            .unwrap_or_else(|| self.scheme.appearance())
    }

    /// Switches theme assets only. Used before the document is ready.
    pub fn switch_assets(&mut self, appearance: Appearance) -> usize {
        switch_assets(&mut self.document, &self.config, appearance)
    }

    /// Applies `mode`, returning the painted appearance.
    ///
    /// See the module docs for the fixed order of effects.
    pub fn apply_mode(&mut self, mode: ThemeMode, cause: ApplyCause) -> Appearance {
        let appearance = self.resolve(mode);
        self.mode = mode;
        log::debug!("applying {} mode ({}) on {:?}", mode, appearance, cause);

        if cause == ApplyCause::Explicit {
            self.store.save(&self.config.storage_key, mode.as_str());
        }

        let root = self.document.root();
        if self.document.has_class(&root, &self.config.dark_class) != appearance.is_dark() {
            self.document
                .set_class(&root, &self.config.dark_class, appearance.is_dark());
        }

        for (name, value) in self.table.half(appearance) {
            let property = self.config.light_property(name);
            log::trace!("{} = {}", property, value);
            self.document.set_root_property(&property, value);
        }

        switch_assets(&mut self.document, &self.config, appearance);

        controls::sync(
            &mut self.document,
            &self.controls,
            &self.config,
            mode,
            appearance,
        );

        appearance
    }

    /// Applies a mode chosen by the user and persists it.
    pub fn select(&mut self, mode: ThemeMode) -> Appearance {
        self.apply_mode(mode, ApplyCause::Explicit)
    }

    /// Flips between light and dark based on the root dark class.
    pub fn toggle(&mut self) -> Appearance {
        let root = self.document.root();
        let showing_dark = self.document.has_class(&root, &self.config.dark_class);
        let target = Appearance::from_dark(showing_dark).opposite();
        self.select(ThemeMode::from(target))
    }

    /// Discovers the controls and sets their baseline ARIA state.
    ///
    /// Bindings are fixed from here on; later calls replace them.
    pub fn bind_controls(&mut self) -> usize {
        self.controls = controls::discover(&self.document, &self.config);
        controls::set_baseline_aria(&mut self.document, &self.controls);

        let appearance = self.resolve(self.mode);
        controls::sync(
            &mut self.document,
            &self.controls,
            &self.config,
            self.mode,
            appearance,
        );
        log::debug!("bound {} theme controls", self.controls.len());
        self.controls.len()
    }

    /// Handles a click on `node`. Returns `false` when it is not a bound
    /// control.
    pub fn click(&mut self, node: &D::Node) -> bool {
        let action = self
            .controls
            .iter()
            .find(|binding| &binding.node == node)
            .map(|binding| binding.action);

        match action {
            Some(ControlAction::Select(mode)) => {
                self.select(mode);
                true
            }
            Some(ControlAction::Toggle) => {
                self.toggle();
                true
            }
            None => false,
        }
    }

    /// Whether an OS preference change should re-apply the theme.
    ///
    /// Tri-state: only while the active mode is `System`. Binary: only while no
    /// preference has been persisted.
    pub fn follows_system(&self) -> bool {
        match self.config.variant {
            Variant::TriState => self.mode == ThemeMode::System,
            Variant::Binary => self.stored_mode().is_none(),
        }
    }

    /// Reacts to an OS preference change. Returns `true` when the theme was
    /// re-applied.
    pub fn system_changed(&mut self) -> bool {
        if !self.follows_system() {
            log::debug!("keeping explicit {} mode despite OS change", self.mode);
            return false;
        }
        let mode = match self.config.variant {
            Variant::TriState => ThemeMode::System,
            Variant::Binary => ThemeMode::from(self.scheme.appearance()),
        };
        self.apply_mode(mode, ApplyCause::System);
        true
    }
}

impl<D, S, C> std::fmt::Debug for ThemeEngine<D, S, C>
where
    D: Document,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("variant", &self.config.variant)
            .field("mode", &self.mode)
            .field("variables", &self.table.len())
            .field("controls", &self.controls.len())
            .finish_non_exhaustive()
    }
}
