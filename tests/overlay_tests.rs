use std::collections::BTreeMap;
use std::fs;
use traffic_dashboard::cli::TranslateArgs;
use traffic_dashboard::overlay::{apply_translations, run};

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8" /><title>Guest House</title></head>
<body>
<h1 class="title">Welcome</h1>
<p class="intro">Our house sits in the <b>old town</b>.</p>
<a class="book" href="/en/book.html">Book now</a>
<div class="hero">intro text<p class="lead">Old lead</p><span class="cta big">Call us</span></div>
</body>
</html>
"#;

fn overlay(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn empty_overlay_is_a_serialization_fixpoint() {
    let once = apply_translations(PAGE, &BTreeMap::new()).unwrap();
    let twice = apply_translations(&once, &BTreeMap::new()).unwrap();
    assert_eq!(once, twice);
    assert!(once.contains("Welcome"));
    assert!(once.contains("Old lead"));
    assert!(once.contains(r#"href="/en/book.html""#));
}

#[test]
fn plain_selector_replaces_whole_content() {
    let out = overlay_applied(&[("h1.title", "Bienvenue")]).unwrap();
    assert!(out.contains("Bienvenue"));
    assert!(!out.contains("Welcome"));
}

// helper keeps the test bodies short
fn overlay_applied(pairs: &[(&str, &str)]) -> Result<String, anyhow::Error> {
    apply_translations(PAGE, &overlay(pairs))
}

#[test]
fn plain_selector_accepts_html_fragments() {
    let out = overlay_applied(&[("p.intro", "Notre maison est en <b>vieille ville</b>.")]).unwrap();
    assert!(out.contains("<b>vieille ville</b>"));
    assert!(!out.contains("old town"));
}

#[test]
fn attribute_key_sets_the_attribute() {
    let out = overlay_applied(&[("a.book@href", "/fr/book.html")]).unwrap();
    assert!(out.contains(r#"href="/fr/book.html""#));
    assert!(!out.contains("/en/book.html"));
    // element content untouched
    assert!(out.contains("Book now"));
}

#[test]
fn text_key_replaces_positional_text_node() {
    let out = overlay_applied(&[("div.hero.text[0]", "texte d'accueil")]).unwrap();
    assert!(out.contains("texte d'accueil"));
    assert!(!out.contains("intro text"));
    // the sibling element is untouched
    assert!(out.contains("Old lead"));
}

#[test]
fn child_key_replaces_child_element_content_as_html() {
    let out = overlay_applied(&[("div.hero>p[1].lead", "<em>Nouveau</em> texte")]).unwrap();
    assert!(out.contains("<em>Nouveau</em> texte"));
    assert!(!out.contains("Old lead"));
    // the positional text sibling is untouched
    assert!(out.contains("intro text"));
}

#[test]
fn child_key_with_wrong_index_is_a_no_op() {
    let out = overlay_applied(&[("div.hero>p[7].lead", "unused")]).unwrap();
    assert!(out.contains("Old lead"));
}

#[test]
fn child_key_with_wrong_class_is_a_no_op() {
    // a child whose class changed no longer matches its key
    let out = overlay_applied(&[("div.hero>p[1].headline", "unused")]).unwrap();
    assert!(out.contains("Old lead"));
    assert!(!out.contains("unused"));
}

#[test]
fn child_key_matches_multiple_classes_joined_with_dashes() {
    let out = overlay_applied(&[("div.hero>span[2].cta-big", "Appelez-nous")]).unwrap();
    assert!(out.contains("Appelez-nous"));
    assert!(!out.contains("Call us"));
}

#[test]
fn run_writes_one_page_per_language() {
    let dir = tempfile::tempdir().unwrap();
    let site_root = dir.path();
    fs::write(site_root.join("page.html"), PAGE).unwrap();
    fs::create_dir(site_root.join("translations")).unwrap();
    fs::write(
        site_root.join("translations/page.html.fr.json"),
        r#"{"h1.title": "Bienvenue", "a.book@href": "/fr/book.html"}"#,
    )
    .unwrap();
    // overlay without a matching page is skipped with a warning
    fs::write(
        site_root.join("translations/missing.html.fr.json"),
        r#"{"h1.title": "x"}"#,
    )
    .unwrap();

    let args = TranslateArgs {
        site_root: site_root.to_path_buf(),
        translations: None,
    };
    run(&args).unwrap();

    let translated = fs::read_to_string(site_root.join("fr/page.html")).unwrap();
    assert!(translated.contains("Bienvenue"));
    assert!(translated.contains(r#"href="/fr/book.html""#));
    assert!(!site_root.join("fr/missing.html").exists());
}
