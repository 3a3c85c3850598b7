//! Fixed names shared between the page templates and this crate.

// ── Theme ───────────────────────────────────────────────────────

/// `localStorage` key holding `"light"` or `"dark"`.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Attribute on `<html>` read by the theme stylesheets.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Id of the navbar button whose markup the theme controller owns.
pub const THEME_TOGGLE_ID: &str = "theme-toggle";

/// Media query for the platform's dark color-scheme hint.
pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

// ── Page globals ────────────────────────────────────────────────

/// Global set by the layout when the site uses the automatic color theme.
pub const AUTO_THEME_GLOBAL: &str = "isAutoTheme";

/// Global holding the toggle label shown while the light theme is active.
pub const DARK_LABEL_GLOBAL: &str = "darkBtn";

/// Global holding the toggle label shown while the dark theme is active.
pub const LIGHT_LABEL_GLOBAL: &str = "lightBtn";

// ── Lazy loading ────────────────────────────────────────────────

/// Container attribute gating deferred activation. Only `"true"` arms.
pub const LAZY_LOAD_ATTRIBUTE: &str = "data-lazy-load";

/// Look-ahead margin handed to the proximity watcher.
pub const LOOK_AHEAD_MARGIN: &str = "400px";

// ── Comment providers ───────────────────────────────────────────

pub const CUSDIS_SCRIPT_URL: &str = "https://cusdis.com/js/cusdis.es.js";
pub const CUSDIS_LANG_URL_PREFIX: &str = "https://cusdis.com/js/widget/lang/";
pub const GISCUS_SCRIPT_URL: &str = "https://giscus.app/client.js";
pub const UTTERANCES_SCRIPT_URL: &str = "https://utteranc.es/client.js";

/// Global the Disqus embed script reads its site shortname from.
pub const DISQUS_SHORTNAME_GLOBAL: &str = "disqus_shortname";
