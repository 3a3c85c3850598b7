//! Light/dark theme initialization and toggle.
//!
//! Reads the user's preference from storage and applies a `data-theme`
//! attribute to the `<html>` element. Toggling writes back to storage, updates
//! that attribute, and rewrites the navbar toggle so its label names the theme
//! a click would switch to.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort: a failed storage write is logged and the theme
//! is still applied to the current page. A missing toggle button is normal
//! (the navbar may not include it) and is skipped silently.
//!
//! Clicks reach the controller through exactly one path. Layouts that put an
//! `onclick` handler on the toggle call the exported `themeToggle` themselves,
//! so [`ThemeController::bind_toggle`] leaves those buttons alone.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use crate::config::ThemeSettings;
use crate::consts::{PREFERS_DARK_QUERY, THEME_ATTRIBUTE, THEME_STORAGE_KEY, THEME_TOGGLE_ID};
use crate::dom::{Document, Storage};

/// Display theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The theme a toggle switches to.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored value that names no known theme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0:?}")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

/// Inner markup of the toggle button while `theme` is active.
///
/// The label names the other theme, i.e. what clicking would do.
#[must_use]
pub fn toggle_markup(theme: Theme, settings: &ThemeSettings) -> String {
    match theme {
        Theme::Light => format!(
            r#"<i class="fas fa-adjust" aria-hidden="true"></i><span class="navbar-label-with-icon"> {}</span>"#,
            settings.dark_label
        ),
        Theme::Dark => format!(
            r#"<i class="fas fa-adjust fa-rotate-180" aria-hidden="true"></i><span class="navbar-label-with-icon"> {}</span>"#,
            settings.light_label
        ),
    }
}

/// Owns the persisted theme preference and its reflection in the page.
pub struct ThemeController<D, S> {
    document: Rc<D>,
    storage: S,
    settings: ThemeSettings,
}

impl<D: Document, S: Storage> ThemeController<D, S> {
    pub fn new(document: Rc<D>, storage: S, settings: ThemeSettings) -> Self {
        Self { document, storage, settings }
    }

    /// The persisted preference, or `None` if never set.
    ///
    /// An unrecognized stored value counts as unset.
    pub fn current_theme(&self) -> Option<Theme> {
        let raw = self.storage.get_item(THEME_STORAGE_KEY)?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(err) => {
                log::warn!("ignoring stored theme: {err}");
                None
            }
        }
    }

    /// Apply `theme` to the document, persist it, and relabel the toggle.
    pub fn apply_theme(&self, theme: Theme) {
        if let Some(root) = self.document.root_element() {
            if let Err(err) = self.document.set_attribute(&root, THEME_ATTRIBUTE, theme.as_str()) {
                log::warn!("failed to set {THEME_ATTRIBUTE}: {err}");
            }
        }

        if let Err(err) = self.storage.set_item(THEME_STORAGE_KEY, theme.as_str()) {
            log::warn!("failed to persist theme: {err}");
        }

        if let Some(toggle) = self.document.element_by_id(THEME_TOGGLE_ID) {
            self.document
                .set_inner_html(&toggle, &toggle_markup(theme, &self.settings));
        }
    }

    /// Switch to the opposite of the persisted theme (unset counts as light).
    /// Returns the theme now applied.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.current_theme().unwrap_or_default().opposite();
        self.apply_theme(next);
        next
    }

    /// Bind clicks on the navbar toggle to [`ThemeController::toggle_theme`].
    ///
    /// Returns whether a listener was added. Nothing is bound when the page
    /// has no toggle, or when the toggle already carries an `onclick`
    /// attribute. The listener holds a weak handle, so the caller keeps the
    /// controller alive for as long as clicks should work.
    pub fn bind_toggle(self: &Rc<Self>) -> bool
    where
        D: 'static,
        S: 'static,
    {
        let Some(toggle) = self.document.element_by_id(THEME_TOGGLE_ID) else {
            return false;
        };
        if self.document.attribute(&toggle, "onclick").is_some() {
            log::debug!("#{THEME_TOGGLE_ID} has an onclick handler; not binding");
            return false;
        }

        let controller: Weak<Self> = Rc::downgrade(self);
        let bound = self.document.on_click(
            &toggle,
            Box::new(move || {
                if let Some(controller) = controller.upgrade() {
                    controller.toggle_theme();
                }
            }),
        );
        match bound {
            Ok(()) => true,
            Err(err) => {
                log::warn!("failed to bind #{THEME_TOGGLE_ID}: {err}");
                false
            }
        }
    }

    /// Resolve and apply the theme for a fresh page load.
    ///
    /// Does nothing and returns `None` when the auto-theme setting is off.
    /// Otherwise an unset preference is seeded from the platform dark-mode
    /// hint, and the resolved theme is applied and returned.
    pub fn initialize_theme(&self) -> Option<Theme> {
        if !self.settings.auto_theme {
            log::debug!("auto theme disabled; leaving document theme unset");
            return None;
        }

        let theme = match self.current_theme() {
            Some(theme) => theme,
            None if self.document.matches_media(PREFERS_DARK_QUERY) => {
                if let Err(err) = self.storage.set_item(THEME_STORAGE_KEY, Theme::Dark.as_str()) {
                    log::warn!("failed to persist platform theme: {err}");
                }
                Theme::Dark
            }
            None => Theme::Light,
        };

        self.apply_theme(theme);
        Some(theme)
    }
}
