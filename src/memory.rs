//! In-memory [`Document`] and [`Storage`] implementations.
//!
//! SYSTEM CONTEXT
//! ==============
//! These fakes stand in for the browser when the components run outside a
//! page: unit tests, and embedders that want to exercise the loader without
//! wasm. The document is a flat arena of elements with `<html>`, `<head>` and
//! `<body>` pre-created. Proximity watchers and `load` listeners are recorded
//! and only fire when a caller drives them with [`MemoryDocument::intersect`]
//! or [`MemoryDocument::fire_load`].

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::dom::{Document, DomError, Placement, ProximityCallback, ReadyState, ScriptTag, Storage, WatchControl};

/// Handle to an element in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    inner_html: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Set for script elements created through [`Document::append_script`].
    script: Option<ScriptTag>,
    detached: bool,
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_owned(),
            attributes: Vec::new(),
            inner_html: String::new(),
            parent,
            children: Vec::new(),
            script: None,
            detached: false,
        }
    }
}

/// A proximity watcher registered on the document.
struct Watcher {
    target: NodeId,
    root_margin: String,
    callback: Option<ProximityCallback>,
    released: bool,
    notifications: usize,
}

/// A script element injected into the document, with where it landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedScript {
    pub parent: NodeId,
    pub tag: ScriptTag,
}

struct State {
    nodes: Vec<Node>,
    globals: HashMap<String, String>,
    matching_media: HashSet<String>,
    media_queries: Vec<String>,
    ready_state: ReadyState,
    load_listeners: Vec<Box<dyn FnOnce()>>,
    click_listeners: Vec<(NodeId, Option<Box<dyn FnMut()>>)>,
    proximity_supported: bool,
    watchers: Vec<Watcher>,
}

/// Arena-backed document fake.
pub struct MemoryDocument {
    state: RefCell<State>,
    root: NodeId,
    head: Option<NodeId>,
    body: NodeId,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty, fully loaded document with `<head>` and `<body>`, and
    /// proximity watching available.
    #[must_use]
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Same as [`MemoryDocument::new`] but without a `<head>` element.
    #[must_use]
    pub fn without_head() -> Self {
        Self::build(false)
    }

    fn build(with_head: bool) -> Self {
        let root = NodeId(0);
        let mut nodes = vec![Node::new("html", None)];
        let head = with_head.then(|| {
            nodes.push(Node::new("head", Some(root)));
            NodeId(nodes.len() - 1)
        });
        nodes.push(Node::new("body", Some(root)));
        let body = NodeId(nodes.len() - 1);
        nodes[root.0].children.extend(head);
        nodes[root.0].children.push(body);

        Self {
            state: RefCell::new(State {
                nodes,
                globals: HashMap::new(),
                matching_media: HashSet::new(),
                media_queries: Vec::new(),
                ready_state: ReadyState::Complete,
                load_listeners: Vec::new(),
                click_listeners: Vec::new(),
                proximity_supported: true,
                watchers: Vec::new(),
            }),
            root,
            head,
            body,
        }
    }

    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append a new element under `parent`.
    pub fn append_element(&self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let mut state = self.state.borrow_mut();
        let mut node = Node::new(tag, Some(parent));
        node.attributes = attributes
            .iter()
            .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
            .collect();
        state.nodes.push(node);
        let id = NodeId(state.nodes.len() - 1);
        state.nodes[parent.0].children.push(id);
        id
    }

    /// Detach an element (and its subtree) from the document.
    pub fn remove(&self, node: NodeId) {
        let mut state = self.state.borrow_mut();
        if let Some(parent) = state.nodes[node.0].parent.take() {
            state.nodes[parent.0].children.retain(|c| *c != node);
        }
        detach_subtree(&mut state.nodes, node);
    }

    /// Remove an attribute from an element.
    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        self.state.borrow_mut().nodes[node.0]
            .attributes
            .retain(|(n, _)| n != name);
    }

    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        self.state.borrow().nodes[node.0].inner_html.clone()
    }

    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> String {
        self.state.borrow().nodes[node.0].tag.clone()
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state.borrow().nodes[node.0].children.clone()
    }

    /// Every injected script still attached to the document, in insertion order.
    #[must_use]
    pub fn scripts(&self) -> Vec<InjectedScript> {
        let state = self.state.borrow();
        let mut out = Vec::new();
        collect_scripts(&state.nodes, self.root, &mut out);
        out.sort_by_key(|(id, _)| id.0);
        out.into_iter().map(|(_, script)| script).collect()
    }

    /// Injected scripts that are direct children of `parent`.
    #[must_use]
    pub fn scripts_in(&self, parent: NodeId) -> Vec<ScriptTag> {
        self.scripts()
            .into_iter()
            .filter(|s| s.parent == parent)
            .map(|s| s.tag)
            .collect()
    }

    /// Mark `query` as matching (or not) for [`Document::matches_media`].
    pub fn set_media(&self, query: &str, matches: bool) {
        let mut state = self.state.borrow_mut();
        if matches {
            state.matching_media.insert(query.to_owned());
        } else {
            state.matching_media.remove(query);
        }
    }

    /// Media queries evaluated so far, in call order.
    #[must_use]
    pub fn media_queries(&self) -> Vec<String> {
        self.state.borrow().media_queries.clone()
    }

    /// Set a boolean page global the way a layout template would.
    pub fn set_bool_global(&self, name: &str, value: bool) {
        self.state
            .borrow_mut()
            .globals
            .insert(name.to_owned(), value.to_string());
    }

    pub fn set_ready_state(&self, ready_state: ReadyState) {
        self.state.borrow_mut().ready_state = ready_state;
    }

    pub fn set_proximity_supported(&self, supported: bool) {
        self.state.borrow_mut().proximity_supported = supported;
    }

    /// Complete loading and run every pending `load` listener.
    pub fn fire_load(&self) {
        let listeners = {
            let mut state = self.state.borrow_mut();
            state.ready_state = ReadyState::Complete;
            std::mem::take(&mut state.load_listeners)
        };
        for listener in listeners {
            listener();
        }
    }

    #[must_use]
    pub fn pending_load_listeners(&self) -> usize {
        self.state.borrow().load_listeners.len()
    }

    /// Dispatch a click to every listener bound on `node`.
    pub fn click(&self, node: NodeId) {
        let bound: Vec<usize> = {
            let state = self.state.borrow();
            state
                .click_listeners
                .iter()
                .enumerate()
                .filter(|(_, (target, _))| *target == node)
                .map(|(i, _)| i)
                .collect()
        };

        for index in bound {
            let Some(mut listener) = self.state.borrow_mut().click_listeners[index].1.take() else {
                continue;
            };
            listener();
            self.state.borrow_mut().click_listeners[index].1 = Some(listener);
        }
    }

    #[must_use]
    pub fn click_listener_count(&self, node: NodeId) -> usize {
        self.state
            .borrow()
            .click_listeners
            .iter()
            .filter(|(target, _)| *target == node)
            .count()
    }

    /// Number of watchers ever registered.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.state.borrow().watchers.len()
    }

    /// Targets of every registered watcher, in registration order.
    #[must_use]
    pub fn watched_targets(&self) -> Vec<NodeId> {
        self.state.borrow().watchers.iter().map(|w| w.target).collect()
    }

    /// Root margin of the watcher registered on `target`.
    #[must_use]
    pub fn root_margin(&self, target: NodeId) -> Option<String> {
        self.state
            .borrow()
            .watchers
            .iter()
            .find(|w| w.target == target)
            .map(|w| w.root_margin.clone())
    }

    /// Whether every watcher on `target` has released its subscription.
    #[must_use]
    pub fn is_released(&self, target: NodeId) -> bool {
        self.state
            .borrow()
            .watchers
            .iter()
            .filter(|w| w.target == target)
            .all(|w| w.released)
    }

    /// Notifications delivered to watchers of `target`.
    #[must_use]
    pub fn notifications(&self, target: NodeId) -> usize {
        self.state
            .borrow()
            .watchers
            .iter()
            .filter(|w| w.target == target)
            .map(|w| w.notifications)
            .sum()
    }

    /// Deliver a proximity notification to every live watcher of `target`.
    ///
    /// Released watchers are skipped, like a real observer after `unobserve`.
    pub fn intersect(&self, target: NodeId, is_intersecting: bool) {
        let live: Vec<usize> = {
            let state = self.state.borrow();
            state
                .watchers
                .iter()
                .enumerate()
                .filter(|(_, w)| w.target == target && !w.released)
                .map(|(i, _)| i)
                .collect()
        };

        for index in live {
            // The callback mutates the document, so it runs with no borrow held.
            let Some(mut callback) = self.state.borrow_mut().watchers[index].callback.take() else {
                continue;
            };
            let control = callback(is_intersecting);
            let mut state = self.state.borrow_mut();
            let watcher = &mut state.watchers[index];
            watcher.notifications += 1;
            if control == WatchControl::Release {
                watcher.released = true;
            } else {
                watcher.callback = Some(callback);
            }
        }
    }
}

/// Mark `node` and every descendant as no longer in the document.
fn detach_subtree(nodes: &mut [Node], node: NodeId) {
    nodes[node.0].detached = true;
    for child in nodes[node.0].children.clone() {
        detach_subtree(nodes, child);
    }
}

fn collect_scripts(nodes: &[Node], node: NodeId, out: &mut Vec<(NodeId, InjectedScript)>) {
    for child in &nodes[node.0].children {
        if let Some(tag) = &nodes[child.0].script {
            out.push((*child, InjectedScript { parent: node, tag: tag.clone() }));
        }
        collect_scripts(nodes, *child, out);
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let state = self.state.borrow();
        state
            .nodes
            .iter()
            .position(|n| !n.detached && n.attributes.iter().any(|(k, v)| k == "id" && v == id))
            .map(NodeId)
    }

    fn root_element(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.state.borrow().nodes[element.0]
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn attributes(&self, element: &NodeId) -> Vec<(String, String)> {
        self.state.borrow().nodes[element.0].attributes.clone()
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if name.is_empty() {
            return Err(DomError::Js("InvalidCharacterError: empty attribute name".to_owned()));
        }
        let mut state = self.state.borrow_mut();
        let attributes = &mut state.nodes[element.0].attributes;
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => value.clone_into(&mut slot.1),
            None => attributes.push((name.to_owned(), value.to_owned())),
        }
        Ok(())
    }

    fn set_inner_html(&self, element: &NodeId, html: &str) {
        let mut state = self.state.borrow_mut();
        let children = std::mem::take(&mut state.nodes[element.0].children);
        for child in children {
            state.nodes[child.0].parent = None;
            detach_subtree(&mut state.nodes, child);
        }
        html.clone_into(&mut state.nodes[element.0].inner_html);
    }

    fn append_script(&self, placement: Placement, container: &NodeId, script: &ScriptTag) -> Result<(), DomError> {
        let parent = match placement {
            Placement::Body => self.body,
            Placement::HeadOrBody => self.head.unwrap_or(self.body),
            Placement::Container => *container,
        };
        let mut state = self.state.borrow_mut();
        if state.nodes[parent.0].detached {
            return Err(DomError::Unavailable("script parent"));
        }
        let mut node = Node::new("script", Some(parent));
        node.script = Some(script.clone());
        state.nodes.push(node);
        let id = NodeId(state.nodes.len() - 1);
        state.nodes[parent.0].children.push(id);
        Ok(())
    }

    fn global(&self, name: &str) -> Option<String> {
        self.state.borrow().globals.get(name).cloned()
    }

    fn set_global(&self, name: &str, value: &str) -> Result<(), DomError> {
        self.state
            .borrow_mut()
            .globals
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn matches_media(&self, query: &str) -> bool {
        let mut state = self.state.borrow_mut();
        state.media_queries.push(query.to_owned());
        state.matching_media.contains(query)
    }

    fn ready_state(&self) -> ReadyState {
        self.state.borrow().ready_state
    }

    fn on_click(&self, element: &NodeId, callback: Box<dyn FnMut()>) -> Result<(), DomError> {
        self.state
            .borrow_mut()
            .click_listeners
            .push((*element, Some(callback)));
        Ok(())
    }

    fn on_load(&self, callback: Box<dyn FnOnce()>) {
        self.state.borrow_mut().load_listeners.push(callback);
    }

    fn supports_proximity(&self) -> bool {
        self.state.borrow().proximity_supported
    }

    fn watch_proximity(&self, target: &NodeId, root_margin: &str, callback: ProximityCallback) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        if !state.proximity_supported {
            return Err(DomError::Unavailable("IntersectionObserver"));
        }
        state.watchers.push(Watcher {
            target: *target,
            root_margin: root_margin.to_owned(),
            callback: Some(callback),
            released: false,
            notifications: 0,
        });
        Ok(())
    }
}

/// `localStorage` fake.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes fail, like Safari private mode or a full quota.
    #[must_use]
    pub fn read_only() -> Self {
        Self { items: RefCell::default(), read_only: true }
    }

    pub fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    /// Seed a value without going through [`Storage::set_item`].
    pub fn insert(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomError> {
        if self.read_only {
            return Err(DomError::Js("QuotaExceededError".to_owned()));
        }
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
