//! Document and storage abstractions.
//!
//! SYSTEM CONTEXT
//! ==============
//! The theme controller and the comment loader never touch `window` or
//! `document` directly. They receive a [`Document`] and a [`Storage`] so the
//! same code runs against the browser (see `web`, behind `hydrate`) and
//! against the in-memory fakes in [`crate::memory`].
//!
//! All methods take `&self`: the DOM is shared, single-threaded, and mutated
//! from event callbacks, so implementations use interior mutability.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

/// Error raised by a [`Document`] or [`Storage`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A browser object the operation needs does not exist.
    #[error("{0} is not available")]
    Unavailable(&'static str),
    /// A DOM call threw.
    #[error("DOM call failed: {0}")]
    Js(String),
}

/// Document loading progress, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// Map a `document.readyState` string. Unknown values count as loading.
    #[must_use]
    pub fn from_dom(state: &str) -> Self {
        match state {
            "complete" => Self::Complete,
            "interactive" => Self::Interactive,
            _ => Self::Loading,
        }
    }
}

/// What a proximity watcher should do after delivering a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchControl {
    /// Keep watching the target.
    Continue,
    /// Stop watching the target; no further notifications are delivered.
    Release,
}

/// Where an injected script element is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// End of `<body>`.
    Body,
    /// End of `<head>`, or `<body>` when the document has no head.
    HeadOrBody,
    /// Inside the widget container that triggered activation.
    Container,
}

/// Description of a `<script>` element to inject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptTag {
    pub src: String,
    pub is_async: bool,
    /// Value of the `type` attribute, when set.
    pub script_type: Option<String>,
    /// Value of the `crossorigin` attribute, when set.
    pub cross_origin: Option<String>,
    /// Additional attributes, written verbatim in order.
    pub attributes: Vec<(String, String)>,
}

impl ScriptTag {
    /// An async script pointing at `src`.
    #[must_use]
    pub fn asynchronous(src: impl Into<String>) -> Self {
        Self { src: src.into(), is_async: true, ..Self::default() }
    }

    #[must_use]
    pub fn with_type(mut self, script_type: &str) -> Self {
        self.script_type = Some(script_type.to_owned());
        self
    }

    #[must_use]
    pub fn with_cross_origin(mut self, mode: &str) -> Self {
        self.cross_origin = Some(mode.to_owned());
        self
    }

    /// Append an extra attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    /// Look up an extra attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Callback delivered for every proximity notification on a watched target.
///
/// The argument is `isIntersecting`. The return value decides whether the
/// watcher keeps the subscription.
pub type ProximityCallback = Box<dyn FnMut(bool) -> WatchControl>;

/// The page document plus the window facilities the components need.
pub trait Document {
    /// Handle to an element of this document.
    type Element: Clone + 'static;

    /// `document.getElementById`.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// `document.documentElement`.
    fn root_element(&self) -> Option<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Every attribute of `element` as `(name, value)` pairs, in document order.
    fn attributes(&self, element: &Self::Element) -> Vec<(String, String)>;

    /// Set an attribute on an element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Js`] when the DOM rejects the name or value.
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> Result<(), DomError>;

    /// Replace the element's children with parsed `html`.
    fn set_inner_html(&self, element: &Self::Element, html: &str);

    /// Create a script element from `script` and append it at `placement`.
    /// `container` resolves [`Placement::Container`].
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Unavailable`] when the target parent is missing and
    /// [`DomError::Js`] when element creation or insertion throws.
    fn append_script(
        &self,
        placement: Placement,
        container: &Self::Element,
        script: &ScriptTag,
    ) -> Result<(), DomError>;

    /// Read a page global as a string. Booleans read as `"true"`/`"false"`.
    fn global(&self, name: &str) -> Option<String>;

    /// Set a string page global.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Js`] when the global object rejects the write.
    fn set_global(&self, name: &str, value: &str) -> Result<(), DomError>;

    /// `window.matchMedia(query).matches`; `false` when media queries are
    /// unavailable.
    fn matches_media(&self, query: &str) -> bool;

    fn ready_state(&self) -> ReadyState;

    /// Call `callback` on every click of `element`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Js`] when the listener cannot be added.
    fn on_click(&self, element: &Self::Element, callback: Box<dyn FnMut()>) -> Result<(), DomError>;

    /// Run `callback` once when the window `load` event fires.
    fn on_load(&self, callback: Box<dyn FnOnce()>);

    /// Whether the runtime provides `IntersectionObserver`.
    fn supports_proximity(&self) -> bool;

    /// Start watching `target` with the given root margin.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Unavailable`] when proximity watching is not
    /// supported and [`DomError::Js`] when the observer cannot be created.
    fn watch_proximity(
        &self,
        target: &Self::Element,
        root_margin: &str,
        callback: ProximityCallback,
    ) -> Result<(), DomError>;
}

/// Durable per-origin key-value storage (`localStorage`).
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] when storage is unavailable or full.
    fn set_item(&self, key: &str, value: &str) -> Result<(), DomError>;
}

impl<S: Storage + ?Sized> Storage for std::rc::Rc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomError> {
        (**self).set_item(key, value)
    }
}
