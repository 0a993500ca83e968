//! Browser backend (feature `web`).
//!
//! Implements the engine seams on top of `web-sys`:
//!
//! - [`WebDocument`]: the live DOM; computed style via `getComputedStyle`,
//!   inline writes via `element.style.setProperty`
//! - [`LocalStorage`]: `window.localStorage`
//! - [`MediaQueryScheme`]: `matchMedia("(prefers-color-scheme: dark)")`
//!
//! [`install`] wires everything together. Call it from the wasm start function
//! of a script loaded in `<head>` so phase 1 runs before first paint:
//!
//! ```rust,ignore
//! #[wasm_bindgen(start)]
//! pub fn start() {
//!     themeswitch::web::install(themeswitch::ThemeConfig::default());
//! }
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    DocumentReadyState, Element, EventTarget, HtmlElement, MediaQueryList, Storage, Window,
};

use crate::bootstrap::Bootstrap;
use crate::config::ThemeConfig;
use crate::document::{Document, ReadyState};
use crate::engine::ThemeEngine;
use crate::scheme::ColorScheme;
use crate::store::PreferenceStore;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// A bootstrapped engine driving the live page.
pub type WebBootstrap = Bootstrap<WebDocument, LocalStorage, MediaQueryScheme>;

/// The browser DOM.
#[derive(Debug, Clone)]
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
    root: Element,
}

impl WebDocument {
    /// The current page, or `None` outside a browser window.
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let root = document.document_element()?;
        Some(Self {
            window,
            document,
            root,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn query(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                log::debug!("invalid selector {:?}: {:?}", selector, e);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn call(&self, node: &Element, method: &str, args: &[JsValue]) {
        let function = Reflect::get(node, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        let Some(function) = function else {
            log::debug!("{} has no {}() method", node.tag_name(), method);
            return;
        };
        let result = match args {
            [] => function.call0(node),
            [arg] => function.call1(node, arg),
            _ => function.apply(node, &args.iter().collect::<js_sys::Array>()),
        };
        if let Err(e) = result {
            log::debug!("{}.{}() failed: {:?}", node.tag_name(), method, e);
        }
    }
}

impl Document for WebDocument {
    type Node = Element;

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn ready_state(&self) -> ReadyState {
        match self.document.ready_state() {
            DocumentReadyState::Loading => ReadyState::Loading,
            DocumentReadyState::Interactive => ReadyState::Interactive,
            _ => ReadyState::Complete,
        }
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(e) = node.set_attribute(name, value) {
            log::debug!("setAttribute({}) failed: {:?}", name, e);
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_class(&mut self, node: &Element, class: &str, present: bool) {
        if let Err(e) = node.class_list().toggle_with_force(class, present) {
            log::debug!("classList.toggle({}) failed: {:?}", class, e);
        }
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn elements_with_any_class(&self, classes: &[&str]) -> Vec<Element> {
        let selector = classes
            .iter()
            .map(|class| format!(".{}", class))
            .collect::<Vec<_>>()
            .join(", ");
        self.query(&selector)
    }

    fn elements_with_attribute(&self, name: &str) -> Vec<Element> {
        self.query(&format!("[{}]", name))
    }

    fn computed_property(&self, name: &str) -> Option<String> {
        self.window
            .get_computed_style(&self.root)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(name).ok())
    }

    fn set_root_property(&mut self, name: &str, value: &str) {
        if let Some(html) = self.root.dyn_ref::<HtmlElement>() {
            if let Err(e) = html.style().set_property(name, value) {
                log::debug!("style.setProperty({}) failed: {:?}", name, e);
            }
        }
    }

    fn animation_source(&self, node: &Element) -> Option<String> {
        Reflect::get(node, &JsValue::from_str("src"))
            .ok()
            .and_then(|v| v.as_string())
            .filter(|s| !s.is_empty())
            .or_else(|| node.get_attribute("src"))
    }

    fn stop_animation(&mut self, node: &Element) {
        self.call(node, "stop", &[]);
    }

    fn load_animation(&mut self, node: &Element, src: &str) {
        self.call(node, "load", &[JsValue::from_str(src)]);
    }

    fn play_animation(&mut self, node: &Element) {
        self.call(node, "play", &[]);
    }
}

/// `window.localStorage`. Without storage access every load is `None`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("localStorage.setItem failed: {:?}", e);
            }
        }
    }
}

/// The `prefers-color-scheme: dark` media query.
#[derive(Debug, Clone)]
pub struct MediaQueryScheme {
    list: Option<MediaQueryList>,
}

impl MediaQueryScheme {
    pub fn new(window: &Window) -> Self {
        Self {
            list: window.match_media(DARK_QUERY).ok().flatten(),
        }
    }
}

impl ColorScheme for MediaQueryScheme {
    fn prefers_dark(&self) -> bool {
        self.list.as_ref().map(|l| l.matches()).unwrap_or(false)
    }
}

/// Boots the theme engine on the current page and registers its listeners.
///
/// Phase 1 runs before this returns. Phase 2 runs immediately if the document
/// is already parsed, otherwise on `DOMContentLoaded`. Control clicks and
/// `prefers-color-scheme` changes are forwarded for the life of the page.
/// Returns `None` outside a browser window.
pub fn install(config: ThemeConfig) -> Option<Rc<RefCell<WebBootstrap>>> {
    let document = WebDocument::current()?;
    let window = document.window().clone();
    let dom = document.document.clone();
    let scheme = MediaQueryScheme::new(&window);
    let media = scheme.list.clone();

    let engine = ThemeEngine::new(config, document, LocalStorage::new(&window), scheme);
    let boot = Rc::new(RefCell::new(Bootstrap::start(engine)));
    if boot.borrow().is_disabled() {
        return Some(boot);
    }

    if boot.borrow().is_ready() {
        bind_clicks(&boot);
    } else {
        let handle = Rc::clone(&boot);
        let on_ready = Closure::<dyn FnMut()>::new(move || {
            let initialized = handle.borrow_mut().document_ready();
            if initialized {
                bind_clicks(&handle);
            }
        });
        listen(&dom, "DOMContentLoaded", on_ready);
    }

    if let Some(media) = media {
        let handle = Rc::clone(&boot);
        let on_change = Closure::<dyn FnMut()>::new(move || {
            handle.borrow_mut().system_changed();
        });
        listen(&media, "change", on_change);
    }

    Some(boot)
}

fn bind_clicks(boot: &Rc<RefCell<WebBootstrap>>) {
    let nodes: Vec<Element> = boot
        .borrow()
        .engine()
        .controls()
        .iter()
        .map(|binding| binding.node.clone())
        .collect();

    for node in nodes {
        let handle = Rc::clone(boot);
        let target = node.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            handle.borrow_mut().click(&target);
        });
        listen(&node, "click", on_click);
    }
}

/// Registers `callback` for the life of the page.
fn listen(target: &EventTarget, event: &str, callback: Closure<dyn FnMut()>) {
    if let Err(e) = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
        log::warn!("failed to listen for {}: {:?}", event, e);
    }
    callback.forget();
}
