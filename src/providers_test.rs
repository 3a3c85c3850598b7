use super::*;
use crate::memory::MemoryDocument;
use crate::test_fixtures;

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
        .collect()
}

// =============================================================
// Provider table
// =============================================================

#[test]
fn container_ids_match_layout() {
    let ids: Vec<&str> = Provider::ALL.iter().map(|p| p.container_id()).collect();
    assert_eq!(ids, vec!["cusdis_thread", "disqus_thread", "giscus_thread", "utterances_thread"]);
}

// =============================================================
// Cusdis
// =============================================================

#[test]
fn cusdis_injects_main_script_into_body() {
    let plan = Provider::Cusdis.plan(&attrs(&[("data-lazy-load", "true")])).unwrap();
    assert!(plan.globals.is_empty());
    assert_eq!(plan.scripts, vec![(Placement::Body, ScriptTag::asynchronous("https://cusdis.com/js/cusdis.es.js"))]);
}

#[test]
fn cusdis_language_script_comes_first() {
    let plan = Provider::Cusdis.plan(&attrs(&[("data-lang", "fr")])).unwrap();
    let sources: Vec<&str> = plan.scripts.iter().map(|(_, s)| s.src.as_str()).collect();
    assert_eq!(sources, vec!["https://cusdis.com/js/widget/lang/fr.js", "https://cusdis.com/js/cusdis.es.js"]);
    assert!(plan.scripts.iter().all(|(p, s)| *p == Placement::Body && s.is_async));
}

#[test]
fn cusdis_empty_language_is_ignored() {
    let plan = Provider::Cusdis.plan(&attrs(&[("data-lang", "")])).unwrap();
    assert_eq!(plan.scripts.len(), 1);
}

// =============================================================
// Disqus
// =============================================================

#[test]
fn disqus_sets_shortname_global_and_embed_script() {
    let plan = Provider::Disqus.plan(&attrs(&[("data-shortname", "mysite")])).unwrap();
    assert_eq!(plan.globals, vec![("disqus_shortname", "mysite".to_owned())]);

    let (placement, script) = &plan.scripts[0];
    assert_eq!(*placement, Placement::HeadOrBody);
    assert_eq!(script.src, "//mysite.disqus.com/embed.js");
    assert_eq!(script.script_type.as_deref(), Some("text/javascript"));
    assert!(script.is_async);
}

#[test]
fn disqus_without_shortname_fails() {
    for pairs in [&[][..], &[("data-shortname", "")][..]] {
        let err = Provider::Disqus.plan(&attrs(pairs)).unwrap_err();
        assert_eq!(err, ActivationError::MissingShortname);
        assert_eq!(err.to_string(), "Disqus shortname not provided");
    }
}

#[test]
fn disqus_activation_without_shortname_injects_nothing() {
    let doc = MemoryDocument::new();
    let el = test_fixtures::disqus(&doc, None);
    assert_eq!(Provider::Disqus.activate(&doc, &el), Err(ActivationError::MissingShortname));
    assert!(doc.scripts().is_empty());
    assert_eq!(doc.global("disqus_shortname"), None);
}

#[test]
fn disqus_activation_lands_in_head() {
    let doc = MemoryDocument::new();
    let el = test_fixtures::disqus(&doc, Some("mysite"));
    Provider::Disqus.activate(&doc, &el).unwrap();

    assert_eq!(doc.global("disqus_shortname").as_deref(), Some("mysite"));
    let head = doc.scripts_in(doc.head().unwrap());
    assert_eq!(head.len(), 1);
    assert!(head[0].src.contains("mysite.disqus.com/embed.js"));
}

#[test]
fn disqus_activation_uses_body_without_head() {
    let doc = MemoryDocument::without_head();
    let el = test_fixtures::disqus(&doc, Some("mysite"));
    Provider::Disqus.activate(&doc, &el).unwrap();
    assert_eq!(doc.scripts_in(doc.body()).len(), 1);
}

// =============================================================
// Giscus
// =============================================================

#[test]
fn giscus_copies_data_attributes_verbatim() {
    let doc = MemoryDocument::new();
    let el = test_fixtures::giscus(
        &doc,
        &[
            ("data-repo", "user/repo"),
            ("data-repo-id", "123"),
            ("data-category", "General"),
            ("data-mapping", "pathname"),
            ("data-theme", "light"),
            ("class", "comments"),
        ],
    );
    Provider::Giscus.activate(&doc, &el).unwrap();

    let scripts = doc.scripts_in(el);
    assert_eq!(scripts.len(), 1);
    let script = &scripts[0];
    assert_eq!(script.src, "https://giscus.app/client.js");
    assert!(script.is_async);
    assert_eq!(script.cross_origin.as_deref(), Some("anonymous"));
    assert_eq!(
        script.attributes,
        attrs(&[
            ("data-repo", "user/repo"),
            ("data-repo-id", "123"),
            ("data-category", "General"),
            ("data-mapping", "pathname"),
            ("data-theme", "light"),
        ])
    );
}

#[test]
fn giscus_drops_lazy_load_and_non_data_attributes() {
    let plan = Provider::Giscus
        .plan(&attrs(&[("id", "giscus_thread"), ("data-lazy-load", "true"), ("data-repo", "user/repo")]))
        .unwrap();
    let script = &plan.scripts[0].1;
    assert_eq!(script.attribute("data-lazy-load"), None);
    assert_eq!(script.attribute("id"), None);
    assert_eq!(script.attribute("data-repo"), Some("user/repo"));
}

#[test]
fn giscus_keeps_empty_values() {
    let plan = Provider::Giscus.plan(&attrs(&[("data-reactions-enabled", "")])).unwrap();
    assert_eq!(plan.scripts[0].1.attribute("data-reactions-enabled"), Some(""));
}

#[test]
fn giscus_reads_only_its_own_container() {
    let doc = MemoryDocument::new();
    test_fixtures::utterances(&doc, &[("data-repo", "other/repo"), ("data-label", "comments")]);
    let el = test_fixtures::giscus(&doc, &[("data-repo", "user/repo")]);
    Provider::Giscus.activate(&doc, &el).unwrap();

    let script = &doc.scripts_in(el)[0];
    assert_eq!(script.attributes, attrs(&[("data-repo", "user/repo")]));
}

// =============================================================
// Utterances
// =============================================================

#[test]
fn utterances_renames_attributes() {
    let doc = MemoryDocument::new();
    let el = test_fixtures::utterances(
        &doc,
        &[
            ("data-repo", "user/repo"),
            ("data-issue-term", "pathname"),
            ("data-theme", "github-light"),
            ("data-label", "comments"),
        ],
    );
    Provider::Utterances.activate(&doc, &el).unwrap();

    let script = &doc.scripts_in(el)[0];
    assert_eq!(script.src, "https://utteranc.es/client.js");
    assert!(script.is_async);
    assert_eq!(script.cross_origin.as_deref(), Some("anonymous"));
    assert_eq!(script.attribute("repo"), Some("user/repo"));
    assert_eq!(script.attribute("issue-term"), Some("pathname"));
    assert_eq!(script.attribute("theme"), Some("github-light"));
    assert_eq!(script.attribute("label"), Some("comments"));
    assert_eq!(script.attribute("data-repo"), None);
}

#[test]
fn utterances_omits_missing_and_empty_attributes() {
    let plan = Provider::Utterances
        .plan(&attrs(&[("data-repo", "user/repo"), ("data-issue-term", "pathname"), ("data-label", "")]))
        .unwrap();
    let script = &plan.scripts[0].1;
    assert_eq!(script.attributes, attrs(&[("repo", "user/repo"), ("issue-term", "pathname")]));
    assert_eq!(script.attribute("label"), None);
    assert_eq!(script.attribute("theme"), None);
}

// =============================================================
// Activation::apply
// =============================================================

#[test]
fn apply_stops_at_first_dom_failure() {
    let doc = MemoryDocument::new();
    let el = test_fixtures::giscus(&doc, &[("data-repo", "user/repo")]);
    doc.remove(el);

    let err = Provider::Giscus.activate(&doc, &el).unwrap_err();
    assert_eq!(err, ActivationError::Dom(DomError::Unavailable("script parent")));
    assert!(doc.scripts().is_empty());
}
