//! Deferred activation of page widgets.
//!
//! DESIGN
//! ======
//! [`arm_lazy_container`] looks up a container, checks its
//! `data-lazy-load="true"` gate, and schedules a one-shot activation: when a
//! proximity watcher first reports the container near the viewport, or, on
//! runtimes without `IntersectionObserver`, when the page has loaded.
//!
//! The activation callback sits in an `Option` that is taken on first fire,
//! so duplicate notifications (or a watcher and a load event racing) can
//! never run it twice. Scheduled closures hold a `Weak` document handle; the
//! document owns the closures, and a strong handle would keep both alive
//! forever.

#[cfg(test)]
#[path = "lazy_load_test.rs"]
mod lazy_load_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::consts::{LAZY_LOAD_ATTRIBUTE, LOOK_AHEAD_MARGIN};
use crate::dom::{Document, ReadyState, WatchControl};

/// Callback run when a container activates.
pub type ActivationCallback<D> = Box<dyn FnOnce(&D, &<D as Document>::Element)>;

/// Why a container was left inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No element with the container id.
    MissingContainer,
    /// `data-lazy-load` is absent or not exactly `"true"`.
    NotLazy,
}

/// Outcome of [`arm_lazy_container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arming {
    /// Permanently inert for this page load.
    Skipped(SkipReason),
    /// A proximity watcher is waiting for the container.
    Watching,
    /// Proximity watching is unavailable and the page had already loaded, so
    /// the callback ran synchronously.
    Activated,
    /// Proximity watching is unavailable; the callback runs on `load`.
    AwaitingLoad,
}

impl Arming {
    /// Whether the container will (or already did) activate.
    #[must_use]
    pub fn is_armed(self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// A container plus the callback that activates it, fired at most once.
struct OneShot<D: Document> {
    container: D::Element,
    callback: RefCell<Option<ActivationCallback<D>>>,
}

impl<D: Document> OneShot<D> {
    /// Run the callback if it has not run yet. Returns whether it ran.
    fn fire(&self, document: &D) -> bool {
        let Some(callback) = self.callback.borrow_mut().take() else {
            return false;
        };
        callback(document, &self.container);
        true
    }

    fn fire_weak(&self, document: &Weak<D>) -> bool {
        document.upgrade().is_some_and(|doc| self.fire(&doc))
    }
}

/// Arm deferred activation for the container with id `container_id`.
///
/// `on_activate` receives the document and the container element, and runs
/// at most once per page load.
pub fn arm_lazy_container<D, F>(document: &Rc<D>, container_id: &str, on_activate: F) -> Arming
where
    D: Document + 'static,
    F: FnOnce(&D, &D::Element) + 'static,
{
    let Some(container) = document.element_by_id(container_id) else {
        return Arming::Skipped(SkipReason::MissingContainer);
    };
    if document.attribute(&container, LAZY_LOAD_ATTRIBUTE).as_deref() != Some("true") {
        log::debug!("#{container_id} is not lazy; leaving it inert");
        return Arming::Skipped(SkipReason::NotLazy);
    }

    let shot = Rc::new(OneShot::<D> {
        container: container.clone(),
        callback: RefCell::new(Some(Box::new(on_activate))),
    });

    if document.supports_proximity() {
        let weak = Rc::downgrade(document);
        let watched = Rc::clone(&shot);
        let watch = document.watch_proximity(
            &container,
            LOOK_AHEAD_MARGIN,
            Box::new(move |is_intersecting| {
                if !is_intersecting {
                    return WatchControl::Continue;
                }
                watched.fire_weak(&weak);
                WatchControl::Release
            }),
        );
        match watch {
            Ok(()) => {
                log::debug!("watching #{container_id}");
                return Arming::Watching;
            }
            Err(err) => log::warn!("cannot watch #{container_id}, falling back to load: {err}"),
        }
    }

    if document.ready_state() == ReadyState::Complete {
        shot.fire(document);
        return Arming::Activated;
    }

    let weak = Rc::downgrade(document);
    document.on_load(Box::new(move || {
        shot.fire_weak(&weak);
    }));
    Arming::AwaitingLoad
}
