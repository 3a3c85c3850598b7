use super::*;
use crate::consts::{AUTO_THEME_GLOBAL, THEME_ATTRIBUTE, THEME_TOGGLE_ID};
use crate::memory::{MemoryDocument, MemoryStorage};
use crate::test_fixtures::{self, script_sources};

fn html_theme(doc: &MemoryDocument) -> Option<String> {
    doc.attribute(&doc.root_element().unwrap(), THEME_ATTRIBUTE)
}

// =============================================================
// Start
// =============================================================

#[test]
fn start_initializes_theme_and_arms_comments() {
    let doc = Rc::new(MemoryDocument::new());
    doc.set_bool_global(AUTO_THEME_GLOBAL, true);
    doc.append_element(doc.body(), "button", &[("id", THEME_TOGGLE_ID)]);
    test_fixtures::giscus(&doc, &[("data-repo", "user/repo")]);

    let page = Page::start(Rc::clone(&doc), MemoryStorage::new());
    assert_eq!(html_theme(&doc).as_deref(), Some("light"));
    assert!(
        page.comments()
            .iter()
            .any(|(p, a)| *p == Provider::Giscus && *a == Arming::Watching)
    );
    assert_eq!(page.comments().iter().filter(|(_, a)| a.is_armed()).count(), 1);
}

#[test]
fn start_without_auto_theme_leaves_root_alone() {
    let doc = Rc::new(MemoryDocument::new());
    let storage = Rc::new(MemoryStorage::new());
    Page::start(Rc::clone(&doc), Rc::clone(&storage));
    assert_eq!(html_theme(&doc), None);
    assert!(storage.is_empty());
}

#[test]
fn toggle_click_after_start_switches_once() {
    let doc = Rc::new(MemoryDocument::new());
    doc.set_bool_global(AUTO_THEME_GLOBAL, true);
    let toggle = doc.append_element(doc.body(), "button", &[("id", THEME_TOGGLE_ID)]);
    let page = Page::start(Rc::clone(&doc), MemoryStorage::new());

    doc.click(toggle);
    assert_eq!(html_theme(&doc).as_deref(), Some("dark"));
    assert_eq!(page.toggle_theme(), Theme::Light);
}

// =============================================================
// Lifetime
// =============================================================

#[test]
fn page_keeps_comment_activation_alive() {
    let doc = Rc::new(MemoryDocument::new());
    let el = test_fixtures::cusdis(&doc, None);
    let page = Page::start(doc, MemoryStorage::new());

    assert_eq!(Rc::strong_count(page.document()), 2);
    page.document().intersect(el, true);
    assert_eq!(script_sources(page.document()), vec!["https://cusdis.com/js/cusdis.es.js".to_owned()]);
}

#[test]
fn load_fallback_fires_while_page_is_held() {
    let doc = Rc::new(MemoryDocument::new());
    doc.set_proximity_supported(false);
    doc.set_ready_state(crate::dom::ReadyState::Loading);
    test_fixtures::disqus(&doc, Some("mysite"));
    let page = Page::start(doc, MemoryStorage::new());

    page.document().fire_load();
    assert_eq!(page.document().global("disqus_shortname").as_deref(), Some("mysite"));
    assert_eq!(Rc::strong_count(page.theme()), 1);
}
