//! Helpers shared by the unit tests.
//!
//! Container builders append the element the post layout would render to the
//! document body; `lazy` is the `data-lazy-load` value and `None` omits it.
//! [`capture_logs`] routes `log` records into a per-thread buffer so a test
//! can assert on the diagnostics its own code emitted.

use std::cell::RefCell;
use std::sync::Once;

use crate::memory::{MemoryDocument, NodeId};

/// Append `<div id=.. data-lazy-load=..>` plus `attrs` to the body.
pub fn container(doc: &MemoryDocument, id: &str, lazy: Option<&str>, attrs: &[(&str, &str)]) -> NodeId {
    let mut all = vec![("id", id)];
    if let Some(lazy) = lazy {
        all.push(("data-lazy-load", lazy));
    }
    all.extend_from_slice(attrs);
    doc.append_element(doc.body(), "div", &all)
}

pub fn cusdis(doc: &MemoryDocument, lang: Option<&str>) -> NodeId {
    let attrs: Vec<(&str, &str)> = lang.map(|l| ("data-lang", l)).into_iter().collect();
    container(doc, "cusdis_thread", Some("true"), &attrs)
}

pub fn disqus(doc: &MemoryDocument, shortname: Option<&str>) -> NodeId {
    let attrs: Vec<(&str, &str)> = shortname.map(|s| ("data-shortname", s)).into_iter().collect();
    container(doc, "disqus_thread", Some("true"), &attrs)
}

pub fn giscus(doc: &MemoryDocument, attrs: &[(&str, &str)]) -> NodeId {
    container(doc, "giscus_thread", Some("true"), attrs)
}

pub fn utterances(doc: &MemoryDocument, attrs: &[(&str, &str)]) -> NodeId {
    container(doc, "utterances_thread", Some("true"), attrs)
}

/// Script `src` values currently in the document, in insertion order.
pub fn script_sources(doc: &MemoryDocument) -> Vec<String> {
    doc.scripts().into_iter().map(|s| s.tag.src).collect()
}

// ── Log capture ─────────────────────────────────────────────────

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Install the capturing logger (once per process) and clear this thread's
/// buffer.
pub fn capture_logs() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

/// Drain the records logged on this thread since [`capture_logs`].
pub fn take_logs() -> Vec<(log::Level, String)> {
    RECORDS.with(|r| std::mem::take(&mut *r.borrow_mut()))
}
