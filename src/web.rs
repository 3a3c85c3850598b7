//! Browser bindings: web-sys backed [`Document`] and [`Storage`], plus the
//! wasm entry points the page layout calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Compiled only with the `hydrate` feature. On module start a [`Page`] is
//! started against the live document and kept in a thread-local for the rest
//! of the page's life; its callbacks hold weak handles and stop firing if it
//! is dropped. Observer and listener closures are handed to the browser with
//! `forget`: each lives as long as the page.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};
use web_sys::{HtmlScriptElement, IntersectionObserver, IntersectionObserverEntry};

use crate::dom::{Document, DomError, Placement, ProximityCallback, ReadyState, ScriptTag, Storage, WatchControl};
use crate::page::Page;

fn js_error(err: JsValue) -> DomError {
    DomError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// The live page document.
pub struct WebDocument {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl WebDocument {
    /// Bind to the current window.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Unavailable`] outside a browser window.
    pub fn current() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::Unavailable("window"))?;
        let document = window.document().ok_or(DomError::Unavailable("document"))?;
        Ok(Self { window, document })
    }
}

impl Document for WebDocument {
    type Element = web_sys::Element;

    fn element_by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.document.get_element_by_id(id)
    }

    fn root_element(&self) -> Option<web_sys::Element> {
        self.document.document_element()
    }

    fn attribute(&self, element: &web_sys::Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn attributes(&self, element: &web_sys::Element) -> Vec<(String, String)> {
        let map = element.attributes();
        (0..map.length())
            .filter_map(|i| map.item(i))
            .map(|attr| (attr.name(), attr.value()))
            .collect()
    }

    fn set_attribute(&self, element: &web_sys::Element, name: &str, value: &str) -> Result<(), DomError> {
        element.set_attribute(name, value).map_err(js_error)
    }

    fn set_inner_html(&self, element: &web_sys::Element, html: &str) {
        element.set_inner_html(html);
    }

    fn append_script(
        &self,
        placement: Placement,
        container: &web_sys::Element,
        script: &ScriptTag,
    ) -> Result<(), DomError> {
        let element: HtmlScriptElement = self
            .document
            .create_element("script")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| DomError::Js("created element is not a script".to_owned()))?;
        element.set_src(&script.src);
        element.set_async(script.is_async);
        if let Some(script_type) = &script.script_type {
            element.set_type(script_type);
        }
        if let Some(mode) = &script.cross_origin {
            element.set_cross_origin(Some(mode.as_str()));
        }
        for (name, value) in &script.attributes {
            element.set_attribute(name, value).map_err(js_error)?;
        }

        let parent: web_sys::Node = match placement {
            Placement::Body => self.document.body().ok_or(DomError::Unavailable("body"))?.into(),
            Placement::HeadOrBody => match self.document.head() {
                Some(head) => head.into(),
                None => self.document.body().ok_or(DomError::Unavailable("head or body"))?.into(),
            },
            Placement::Container => container.clone().into(),
        };
        parent.append_child(&element).map_err(js_error)?;
        Ok(())
    }

    fn global(&self, name: &str) -> Option<String> {
        let value = js_sys::Reflect::get(&self.window, &JsValue::from_str(name)).ok()?;
        if let Some(flag) = value.as_bool() {
            return Some(flag.to_string());
        }
        value.as_string()
    }

    fn set_global(&self, name: &str, value: &str) -> Result<(), DomError> {
        js_sys::Reflect::set(&self.window, &JsValue::from_str(name), &JsValue::from_str(value))
            .map_err(js_error)?;
        Ok(())
    }

    fn matches_media(&self, query: &str) -> bool {
        self.window
            .match_media(query)
            .ok()
            .flatten()
            .map_or(false, |mq| mq.matches())
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_dom(&self.document.ready_state())
    }

    fn on_click(&self, element: &web_sys::Element, callback: Box<dyn FnMut()>) -> Result<(), DomError> {
        let listener: Closure<dyn FnMut()> = Closure::wrap(callback);
        element
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .map_err(js_error)?;
        listener.forget();
        Ok(())
    }

    fn on_load(&self, callback: Box<dyn FnOnce()>) {
        let listener = Closure::once_into_js(callback);
        if let Err(err) = self
            .window
            .add_event_listener_with_callback("load", listener.unchecked_ref())
        {
            log::warn!("failed to listen for load: {}", js_error(err));
        }
    }

    fn supports_proximity(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }

    fn watch_proximity(
        &self,
        target: &web_sys::Element,
        root_margin: &str,
        callback: ProximityCallback,
    ) -> Result<(), DomError> {
        if !self.supports_proximity() {
            return Err(DomError::Unavailable("IntersectionObserver"));
        }

        let mut callback = callback;
        let watched = target.clone();
        let on_entries = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let control = callback(entry.is_intersecting());
                if control == WatchControl::Release {
                    observer.unobserve(&watched);
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = web_sys::IntersectionObserverInit::new();
        options.set_root_margin(root_margin);
        let observer = IntersectionObserver::new_with_options(on_entries.as_ref().unchecked_ref(), &options)
            .map_err(js_error)?;
        observer.observe(target);
        on_entries.forget();
        Ok(())
    }
}

/// `window.localStorage`.
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    /// Bind to the current origin's `localStorage`. Storage can be absent
    /// (privacy settings, sandboxed frames); reads then return `None` and
    /// writes fail.
    pub fn current() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomError> {
        self.storage
            .as_ref()
            .ok_or(DomError::Unavailable("localStorage"))?
            .set_item(key, value)
            .map_err(js_error)
    }
}

type WebPage = Page<WebDocument, LocalStorage>;

thread_local! {
    static PAGE: RefCell<Option<Rc<WebPage>>> = const { RefCell::new(None) };
}

fn current_page() -> Option<Rc<WebPage>> {
    PAGE.with(|slot| slot.borrow().clone())
}

/// Module start: initialize the theme and arm the comment widgets.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let document = match WebDocument::current() {
        Ok(document) => Rc::new(document),
        Err(err) => {
            log::error!("theme assets not started: {err}");
            return;
        }
    };

    let page = Page::start(document, LocalStorage::current());
    PAGE.with(|slot| *slot.borrow_mut() = Some(Rc::new(page)));
}

/// Toggle the theme from page scripts. Returns the theme now applied.
///
/// For layouts whose `#theme-toggle` carries `onclick="themeToggle()"`. The
/// module binds its own click listener only to toggles without an `onclick`
/// attribute, so each click toggles once either way.
#[wasm_bindgen(js_name = themeToggle)]
pub fn theme_toggle() -> Option<String> {
    current_page().map(|page| page.toggle_theme().as_str().to_owned())
}
