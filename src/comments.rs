//! Lazy loading for every supported comment widget.
//!
//! SYSTEM CONTEXT
//! ==============
//! The post layout renders at most one container per provider, each tagged
//! `data-lazy-load="true"` when the site enables lazy comments. This module
//! arms each of them independently through [`arm_lazy_container`]; a provider
//! that fails to activate logs its error and leaves its siblings alone.

#[cfg(test)]
#[path = "comments_test.rs"]
mod comments_test;

use std::rc::Rc;

use crate::dom::Document;
use crate::lazy_load::{Arming, arm_lazy_container};
use crate::providers::Provider;

/// Arm the container of every known provider present on the page.
///
/// Returns one entry per provider, in [`Provider::ALL`] order.
pub fn arm_comment_widgets<D: Document + 'static>(document: &Rc<D>) -> Vec<(Provider, Arming)> {
    Provider::ALL
        .into_iter()
        .map(|provider| (provider, arm_provider(document, provider)))
        .collect()
}

/// Arm a single provider's container.
pub fn arm_provider<D: Document + 'static>(document: &Rc<D>, provider: Provider) -> Arming {
    arm_lazy_container(document, provider.container_id(), move |doc, container| {
        match provider.activate(doc, container) {
            Ok(()) => log::debug!("{} comments activated", provider.name()),
            Err(err) => log::error!("{err}"),
        }
    })
}
