//! A scripted preview: boot a page fixture and replay events against it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use themeswitch::{
    Bootstrap, ManualScheme, MemoryDocument, Phase, PreferenceStore, ThemeConfig, ThemeEngine,
};

use crate::event::Event;
use crate::report::{Report, StepReport};

type PreviewBoot<S> = Bootstrap<MemoryDocument, S, ManualScheme>;

/// Where page loads come from: the fixture plus an optional stylesheet.
#[derive(Debug, Clone)]
pub struct PageSource {
    path: PathBuf,
    css: Option<String>,
}

impl PageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            css: None,
        }
    }

    /// Reads `path` now so every reload sees the same stylesheet.
    pub fn with_css_file(mut self, path: &Path) -> Result<Self> {
        let css = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read stylesheet {}", path.display()))?;
        self.css = Some(css);
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh copy of the page.
    pub fn load(&self) -> Result<MemoryDocument> {
        let doc = MemoryDocument::from_file(&self.path)
            .with_context(|| format!("failed to load page {}", self.path.display()))?;
        Ok(match &self.css {
            Some(css) => doc.with_stylesheet(css),
            None => doc,
        })
    }
}

/// One browser tab: page loads share the store and the OS preference.
pub struct Session<S> {
    config: ThemeConfig,
    source: PageSource,
    store: S,
    scheme: ManualScheme,
    boot: PreviewBoot<S>,
    loads: usize,
    steps: Vec<StepReport>,
}

impl<S> Session<S>
where
    S: PreferenceStore + Clone,
{
    /// Loads the page and runs startup.
    pub fn start(config: ThemeConfig, source: PageSource, store: S, scheme: ManualScheme) -> Result<Self> {
        let boot = Self::boot_page(&config, &source, &store, &scheme)?;
        Ok(Self {
            config,
            source,
            store,
            scheme,
            boot,
            loads: 1,
            steps: Vec::new(),
        })
    }

    fn boot_page(
        config: &ThemeConfig,
        source: &PageSource,
        store: &S,
        scheme: &ManualScheme,
    ) -> Result<PreviewBoot<S>> {
        let doc = source.load()?;
        let boot = Bootstrap::start(ThemeEngine::new(
            config.clone(),
            doc,
            store.clone(),
            scheme.clone(),
        ));
        log::info!(
            "loaded {} ({:?}, {} mode)",
            source.path().display(),
            boot.phase(),
            boot.engine().mode()
        );
        Ok(boot)
    }

    /// Replays one event. Returns whether it changed the theme.
    ///
    /// # Errors
    ///
    /// Fails when a click names an element that is not on the page, or a
    /// reload cannot read the fixture.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let handled = match event {
            Event::Click(id) => {
                let Some(node) = self.boot.engine().document().find(id) else {
                    bail!("no element with id '{}' on the page", id);
                };
                self.boot.click(&node)
            }
            Event::System(appearance) => {
                self.scheme.set(appearance.is_dark());
                self.boot.system_changed()
            }
            Event::Ready => {
                self.boot
                    .engine_mut()
                    .document_mut()
                    .set_ready_state(themeswitch::ReadyState::Interactive);
                self.boot.document_ready()
            }
            Event::Reload => {
                self.boot = Self::boot_page(&self.config, &self.source, &self.store, &self.scheme)?;
                self.loads += 1;
                true
            }
        };
        log::debug!("{} -> {}", event, if handled { "applied" } else { "ignored" });
        self.steps.push(StepReport {
            event: event.to_string(),
            handled,
        });
        Ok(handled)
    }

    /// Replays events in order, stopping at the first error.
    pub fn run<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> Result<()> {
        for event in events {
            self.dispatch(event)
                .with_context(|| format!("event '{}' failed", event))?;
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.boot.phase()
    }

    pub fn bootstrap(&self) -> &PreviewBoot<S> {
        &self.boot
    }

    /// The state of the current page load.
    pub fn report(&self) -> Report {
        let engine = self.boot.engine();
        let doc = engine.document();
        Report {
            page: self.source.path().display().to_string(),
            phase: Report::phase_name(self.boot.phase()),
            variant: self.config.variant,
            mode: engine.mode(),
            appearance: engine.resolve(engine.mode()),
            stored: self.store.load(&self.config.storage_key),
            loads: self.loads,
            steps: self.steps.clone(),
            document: doc.snapshot(),
            animations: doc
                .operations()
                .iter()
                .filter(|op| Report::is_animation(op))
                .cloned()
                .collect(),
        }
    }
}
