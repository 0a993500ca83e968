//! The operating system's color-scheme signal.
//!
//! The engine only asks one question of the OS: does the user prefer dark?
//! [`ColorScheme`] answers it. Change notifications are not pulled; the host
//! calls [`Bootstrap::system_changed`](crate::Bootstrap::system_changed) when
//! its listener fires and the engine re-reads the signal.
//!
//! - [`ManualScheme`]: a shared, settable flag for tests and previews
//! - [`OsScheme`]: native detection through `dark-light`, overridable with
//!   [`set_scheme_detector`]
//! - `MediaQueryScheme` (feature `web`): `prefers-color-scheme: dark`

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Mutex;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;

use crate::mode::Appearance;

/// Source of the OS "prefers dark" boolean.
pub trait ColorScheme {
    fn prefers_dark(&self) -> bool;

    fn appearance(&self) -> Appearance {
        Appearance::from_dark(self.prefers_dark())
    }
}

/// Settable signal. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ManualScheme {
    dark: Rc<Cell<bool>>,
}

impl ManualScheme {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            dark: Rc::new(Cell::new(prefers_dark)),
        }
    }

    pub fn dark() -> Self {
        Self::new(true)
    }

    pub fn light() -> Self {
        Self::new(false)
    }

    pub fn set(&self, prefers_dark: bool) {
        self.dark.set(prefers_dark);
    }
}

impl ColorScheme for ManualScheme {
    fn prefers_dark(&self) -> bool {
        self.dark.get()
    }
}

type SchemeDetector = fn() -> Appearance;

static SCHEME_DETECTOR: Lazy<Mutex<SchemeDetector>> = Lazy::new(|| Mutex::new(os_scheme_detector));

/// Overrides the detector used by [`OsScheme`].
///
/// Useful in tests or to force an appearance regardless of OS settings.
pub fn set_scheme_detector(detector: SchemeDetector) {
    let mut guard = SCHEME_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = detector;
}

/// Restores OS detection after [`set_scheme_detector`].
pub fn reset_scheme_detector() {
    set_scheme_detector(os_scheme_detector);
}

/// Queries the current detector.
pub fn detect_appearance() -> Appearance {
    let detector = SCHEME_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    (*detector)()
}

fn os_scheme_detector() -> Appearance {
    match detect_os_theme() {
        OsThemeMode::Dark => Appearance::Dark,
        _ => Appearance::Light,
    }
}

/// Native OS signal, re-detected on every read.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsScheme;

impl ColorScheme for OsScheme {
    fn prefers_dark(&self) -> bool {
        detect_appearance().is_dark()
    }
}
