//! Browser-side assets for the blog theme.
//!
//! This crate is compiled to WebAssembly and loaded by every page of the
//! site. It owns two independent behaviours: the light/dark theme preference
//! (persisted, seeded from the platform color-scheme hint, reflected on the
//! `<html>` element and the navbar toggle) and lazy loading of third-party
//! comment widgets, which are only injected once their container nears the
//! viewport.
//!
//! Components talk to the page through the [`dom::Document`] and
//! [`dom::Storage`] traits. The `hydrate` feature provides the web-sys
//! implementations and the wasm entry points; [`memory`] provides in-memory
//! ones for tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`theme`] | Theme preference, toggle, and page-load initialization |
//! | [`lazy_load`] | One-shot deferred activation of a container |
//! | [`providers`] | Cusdis, Disqus, Giscus and Utterances script recipes |
//! | [`comments`] | Arms every provider container on the page |
//! | [`page`] | Page-load wiring that owns both components |
//! | [`config`] | Theme settings read from page globals |
//! | [`dom`] | Document and storage abstractions |
//! | [`memory`] | In-memory document and storage |
//! | [`consts`] | Storage keys, element ids, attribute names, URLs |
//! | `web` | web-sys bindings and wasm exports (`hydrate` only) |

pub mod comments;
pub mod config;
pub mod consts;
pub mod dom;
pub mod lazy_load;
pub mod memory;
pub mod page;
pub mod providers;
pub mod theme;
#[cfg(feature = "hydrate")]
pub mod web;

#[cfg(test)]
mod test_fixtures;
