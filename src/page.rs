//! Page-load wiring for both components.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`Page::start`] is what the wasm module runs on load: read the theme
//! settings, initialize the theme, bind the toggle, and arm the comment
//! containers. The returned [`Page`] owns the strong document and controller
//! handles; watcher, load and click closures only hold weak ones, so the page
//! must be kept for as long as those callbacks should keep working.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::rc::Rc;

use crate::comments::arm_comment_widgets;
use crate::config::ThemeSettings;
use crate::dom::{Document, Storage};
use crate::lazy_load::Arming;
use crate::providers::Provider;
use crate::theme::{Theme, ThemeController};

/// Everything started for one page load.
pub struct Page<D, S> {
    document: Rc<D>,
    theme: Rc<ThemeController<D, S>>,
    comments: Vec<(Provider, Arming)>,
}

impl<D: Document + 'static, S: Storage + 'static> Page<D, S> {
    pub fn start(document: Rc<D>, storage: S) -> Self {
        let settings = ThemeSettings::from_document(&*document);
        let theme = Rc::new(ThemeController::new(Rc::clone(&document), storage, settings));
        theme.initialize_theme();
        theme.bind_toggle();

        let comments = arm_comment_widgets(&document);
        for (provider, arming) in &comments {
            log::debug!("{}: {arming:?}", provider.name());
        }

        Self { document, theme, comments }
    }

    #[must_use]
    pub fn document(&self) -> &Rc<D> {
        &self.document
    }

    #[must_use]
    pub fn theme(&self) -> &Rc<ThemeController<D, S>> {
        &self.theme
    }

    /// How each provider's container was armed.
    #[must_use]
    pub fn comments(&self) -> &[(Provider, Arming)] {
        &self.comments
    }

    pub fn toggle_theme(&self) -> Theme {
        self.theme.toggle_theme()
    }
}
