//! # Overlay Module
//!
//! Applies per-fragment JSON translation overlays to static HTML pages.
//!
//! Overlay files are flat maps from selector key to replacement text. A key
//! is one of four shapes, parsed into [`OverlayKey`]:
//!
//! - `selector@attr` sets an attribute on every matching element
//! - `selector.text[idx]` replaces the idx-th content node when it is text
//! - `selector>tag[idx].class` replaces the content of the idx-th child
//!   element with a parsed HTML fragment
//! - a bare CSS selector replaces the whole element content with a parsed
//!   HTML fragment

use anyhow::{Context, Result, anyhow};
use ego_tree::{NodeId, NodeRef, Tree};
use html5ever::tendril::StrTendril;
use html5ever::{LocalName, QualName, namespace_url, ns};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::fs;
use walkdir::WalkDir;

use crate::cli::TranslateArgs;

// <page>.html.<lang>.json
static TRANSLATION_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<page>.+\.html)\.(?P<lang>\w+)\.json$").unwrap());

static TEXT_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<sel>.+)\.text\[(?P<idx>\d+)\]$").unwrap());

static CHILD_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<sel>[^>]+)>(?P<tag>[\w-]+)\[(?P<idx>\d+)\]\.(?P<class>.*)$").unwrap());

/// A parsed selector key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayKey {
    /// `selector@attr`
    SetAttribute { selector: String, attribute: String },
    /// `selector.text[idx]`
    ReplaceText { selector: String, index: usize },
    /// `selector>tag[idx].class`
    ReplaceChild {
        selector: String,
        tag: String,
        index: usize,
        class: String,
    },
    /// bare CSS selector
    ReplaceContent { selector: String },
}

impl OverlayKey {
    pub fn parse(raw: &str) -> Result<OverlayKey> {
        if let Some((sel, attr)) = raw.rsplit_once('@') {
            return Ok(OverlayKey::SetAttribute {
                selector: sel.trim().to_string(),
                attribute: attr.trim().to_string(),
            });
        }
        if let Some(caps) = TEXT_KEY_RE.captures(raw) {
            return Ok(OverlayKey::ReplaceText {
                selector: caps["sel"].to_string(),
                index: caps["idx"].parse().context("text index")?,
            });
        }
        if let Some(caps) = CHILD_KEY_RE.captures(raw) {
            return Ok(OverlayKey::ReplaceChild {
                selector: caps["sel"].to_string(),
                tag: caps["tag"].to_string(),
                index: caps["idx"].parse().context("child index")?,
                class: caps["class"].to_string(),
            });
        }
        Ok(OverlayKey::ReplaceContent {
            selector: raw.trim().to_string(),
        })
    }
}

/// Apply a full overlay map to an HTML document and re-serialize it. An
/// empty map returns the document unchanged apart from the whitespace
/// normalization inherent in parse-then-serialize.
pub fn apply_translations(html: &str, overlays: &BTreeMap<String, String>) -> Result<String> {
    let mut doc = Html::parse_document(html);
    for (raw, value) in overlays {
        let key = OverlayKey::parse(raw)?;
        apply_one(&mut doc, &key, value)?;
    }
    Ok(doc.html())
}

fn select_ids(doc: &Html, selector: &str) -> Result<Vec<NodeId>> {
    let sel =
        Selector::parse(selector).map_err(|e| anyhow!("invalid selector '{selector}': {e}"))?;
    Ok(doc.select(&sel).map(|el| el.id()).collect())
}

fn apply_one(doc: &mut Html, key: &OverlayKey, value: &str) -> Result<()> {
    match key {
        OverlayKey::SetAttribute {
            selector,
            attribute,
        } => {
            let ids = select_ids(doc, selector)?;
            let name = QualName::new(None, ns!(), LocalName::from(attribute.as_str()));
            for id in ids {
                if let Some(mut node) = doc.tree.get_mut(id) {
                    if let Node::Element(el) = node.value() {
                        el.attrs.insert(name.clone(), StrTendril::from(value));
                    }
                }
            }
        }
        OverlayKey::ReplaceContent { selector } => {
            let ids = select_ids(doc, selector)?;
            let fragment = Html::parse_fragment(value);
            for id in ids {
                clear_children(&mut doc.tree, id);
                append_fragment(&mut doc.tree, id, &fragment);
            }
        }
        OverlayKey::ReplaceText { selector, index } => {
            let ids = select_ids(doc, selector)?;
            for id in ids {
                let Some(child) = nth_content_node(&doc.tree, id, *index) else {
                    continue;
                };
                if let Some(mut node) = doc.tree.get_mut(child) {
                    if let Node::Text(t) = node.value() {
                        t.text = StrTendril::from(value);
                    }
                }
            }
        }
        OverlayKey::ReplaceChild {
            selector,
            tag,
            index,
            class,
        } => {
            let ids = select_ids(doc, selector)?;
            let fragment = Html::parse_fragment(value);
            for id in ids {
                let Some(child) = nth_content_node(&doc.tree, id, *index) else {
                    continue;
                };
                let matches = doc
                    .tree
                    .get(child)
                    .map(|n| match n.value() {
                        Node::Element(el) => {
                            el.name() == tag.as_str() && joined_classes(el) == *class
                        }
                        _ => false,
                    })
                    .unwrap_or(false);
                if matches {
                    clear_children(&mut doc.tree, child);
                    append_fragment(&mut doc.tree, child, &fragment);
                }
            }
        }
    }
    Ok(())
}

// The key carries the child's class list joined with `-`, empty when the
// element has none.
fn joined_classes(el: &scraper::node::Element) -> String {
    el.attr("class")
        .map(|c| c.split_whitespace().collect::<Vec<_>>().join("-"))
        .unwrap_or_default()
}

fn nth_content_node(tree: &Tree<Node>, parent: NodeId, index: usize) -> Option<NodeId> {
    tree.get(parent)?.children().nth(index).map(|n| n.id())
}

fn clear_children(tree: &mut Tree<Node>, parent: NodeId) {
    loop {
        let Some(mut node) = tree.get_mut(parent) else {
            return;
        };
        match node.first_child() {
            Some(mut child) => {
                child.detach();
            }
            None => return,
        }
    }
}

// Fragments parse wrapped in an <html> element; the real content is that
// element's children.
fn append_fragment(tree: &mut Tree<Node>, dest: NodeId, fragment: &Html) {
    let root = fragment.tree.root();
    let content: Vec<NodeRef<'_, Node>> = match root.children().find(|c| c.value().is_element()) {
        Some(wrapper) => wrapper.children().collect(),
        None => root.children().collect(),
    };
    for node in content {
        append_subtree(tree, dest, node);
    }
}

fn append_subtree(tree: &mut Tree<Node>, dest: NodeId, src: NodeRef<'_, Node>) {
    let new_id = match tree.get_mut(dest) {
        Some(mut parent) => parent.append(src.value().clone()).id(),
        None => return,
    };
    for child in src.children() {
        append_subtree(tree, new_id, child);
    }
}

/// Translate every page that has a `<page>.html.<lang>.json` overlay in the
/// translations directory, writing results under `<site-root>/<lang>/`.
pub fn run(args: &TranslateArgs) -> Result<()> {
    let translations_dir = args
        .translations
        .clone()
        .unwrap_or_else(|| args.site_root.join("translations"));

    let mut generated = 0usize;
    for entry in WalkDir::new(&translations_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("scan {}", translations_dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        let Some(caps) = TRANSLATION_FILE_RE.captures(&name) else {
            continue;
        };
        let page = caps["page"].to_string();
        let lang = caps["lang"].to_string();

        let page_path = args.site_root.join(&page);
        if !page_path.is_file() {
            log::warn!("HTML file not found for {name}");
            continue;
        }

        let html = fs::read_to_string(&page_path)
            .with_context(|| format!("read {}", page_path.display()))?;
        let raw = fs::read_to_string(entry.path())
            .with_context(|| format!("read {}", entry.path().display()))?;
        let overlays: BTreeMap<String, String> =
            serde_json::from_str(&raw).with_context(|| format!("parse {name}"))?;

        let translated = apply_translations(&html, &overlays)
            .with_context(|| format!("apply {name}"))?;

        let out_dir = args.site_root.join(&lang);
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("create {}", out_dir.display()))?;
        let out_path = out_dir.join(&page);
        if let Err(e) = fs::write(&out_path, translated) {
            log::error!("failed to write {}: {e}", out_path.display());
            return Err(e).with_context(|| format!("write {}", out_path.display()));
        }
        log::info!("generated {}", out_path.display());
        generated += 1;
    }

    log::info!("{generated} translated page(s) written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_keys_split_at_last_at_sign() {
        let key = OverlayKey::parse("a.booking @href").unwrap();
        assert_eq!(
            key,
            OverlayKey::SetAttribute {
                selector: "a.booking".to_string(),
                attribute: "href".to_string(),
            }
        );
    }

    #[test]
    fn text_keys_carry_the_content_index() {
        let key = OverlayKey::parse("div.intro.text[2]").unwrap();
        assert_eq!(
            key,
            OverlayKey::ReplaceText {
                selector: "div.intro".to_string(),
                index: 2,
            }
        );
    }

    #[test]
    fn child_keys_carry_tag_index_and_class() {
        let key = OverlayKey::parse("div.hero>p[1].lead").unwrap();
        assert_eq!(
            key,
            OverlayKey::ReplaceChild {
                selector: "div.hero".to_string(),
                tag: "p".to_string(),
                index: 1,
                class: "lead".to_string(),
            }
        );
    }

    #[test]
    fn plain_selectors_replace_whole_content() {
        let key = OverlayKey::parse("h1.title").unwrap();
        assert_eq!(
            key,
            OverlayKey::ReplaceContent {
                selector: "h1.title".to_string(),
            }
        );
    }
}
