//! Tests for the document tree, selector queries and the mutation journal.

use dom::{DOMUpdate, Document, NodeKey};

/// Helper: append a new element with the given class/id under `parent`.
fn element(doc: &mut Document, parent: NodeKey, tag: &str, attrs: &[(&str, &str)]) -> NodeKey {
    let node = doc.create_element(tag);
    for (name, value) in attrs {
        doc.set_attr(node, name, value);
    }
    doc.append_child(parent, node);
    node
}

/// A small navigation + hero + form page used by several tests.
struct Fixture {
    doc: Document,
    nav: NodeKey,
    links: Vec<NodeKey>,
    hero_img: NodeKey,
    logo_img: NodeKey,
    plain_img: NodeKey,
}

fn fixture() -> Fixture {
    let mut doc = Document::new();
    let body = doc.body();
    let nav = element(&mut doc, body, "nav", &[("class", "c-nav")]);
    let list = element(&mut doc, nav, "ul", &[("class", "c-nav__list")]);
    let mut links = Vec::new();
    for href in ["#about", "#services", "privacy.html"] {
        let item = element(&mut doc, list, "li", &[]);
        links.push(element(&mut doc, item, "a", &[("class", "c-nav__link"), ("href", href)]));
    }
    let logo_img = element(&mut doc, nav, "img", &[("class", "c-logo__img")]);
    let hero = element(&mut doc, body, "section", &[("class", "l-hero"), ("id", "hero")]);
    let hero_img = element(&mut doc, hero, "img", &[]);
    let plain_img = element(&mut doc, body, "img", &[("loading", "eager")]);
    doc.take_updates();
    Fixture {
        doc,
        nav,
        links,
        hero_img,
        logo_img,
        plain_img,
    }
}

#[test]
fn attribute_prefix_and_substring_queries_follow_document_order() {
    let fx = fixture();
    let anchors = fx.doc.query_selector_all(r##"a[href^="#"]"##);
    assert_eq!(anchors, fx.links[..2].to_vec(), "only in-page anchors should match");

    let privacy = fx.doc.query_selector_all(r#"a[href*="privacy"]"#);
    assert_eq!(privacy, vec![fx.links[2]]);
}

#[test]
fn negated_attribute_presence_excludes_marked_images() {
    let fx = fixture();
    let unmarked = fx.doc.query_selector_all("img:not([loading])");
    assert_eq!(unmarked, vec![fx.logo_img, fx.hero_img]);
    assert!(!unmarked.contains(&fx.plain_img));
}

#[test]
fn closest_walks_up_to_matching_ancestor() {
    let fx = fixture();
    assert!(fx.doc.closest(fx.hero_img, ".l-hero").is_some());
    assert_eq!(fx.doc.closest(fx.logo_img, ".l-hero"), None);
    assert_eq!(fx.doc.closest(fx.links[0], ".c-nav"), Some(fx.nav));
    assert!(fx.doc.contains(fx.nav, fx.links[1]));
    assert!(!fx.doc.contains(fx.links[1], fx.nav));
}

#[test]
fn descendant_and_child_combinators() {
    let fx = fixture();
    assert_eq!(fx.doc.query_selector_all(".c-nav .c-nav__link").len(), 3);
    assert_eq!(fx.doc.query_selector_all(".c-nav > .c-nav__link").len(), 0);
    assert_eq!(fx.doc.query_selector_all("li > a").len(), 3);
}

#[test]
fn class_helpers_rewrite_the_class_attribute() {
    let mut fx = fixture();
    let link = fx.links[0];
    fx.doc.add_class(link, "is-active");
    fx.doc.add_class(link, "is-active");
    assert_eq!(fx.doc.attr(link, "class"), Some("c-nav__link is-active"));
    fx.doc.remove_class(link, "is-active");
    assert_eq!(fx.doc.attr(link, "class"), Some("c-nav__link"));

    let updates = fx.doc.take_updates();
    assert_eq!(updates.len(), 2, "duplicate add must not write: {updates:?}");
}

#[test]
fn set_text_content_removes_children_then_inserts_text() {
    let mut doc = Document::new();
    let body = doc.body();
    let parent = element(&mut doc, body, "p", &[]);
    let child_a = element(&mut doc, parent, "span", &[]);
    let child_b = element(&mut doc, parent, "span", &[]);
    doc.take_updates();

    doc.set_text_content(parent, "Hello");
    let batch = doc.take_updates();
    assert_eq!(batch.len(), 3, "unexpected batch: {batch:?}");
    assert_eq!(batch[0], DOMUpdate::RemoveNode { node: child_a });
    assert_eq!(batch[1], DOMUpdate::RemoveNode { node: child_b });
    match &batch[2] {
        DOMUpdate::InsertText { parent: p, text, pos, .. } => {
            assert_eq!(*p, parent);
            assert_eq!(*pos, 0);
            assert_eq!(text, "Hello");
        }
        other => panic!("unexpected third update: {other:?}"),
    }
    assert_eq!(doc.text_content(parent), "Hello");
}

#[test]
fn removed_elements_leave_the_id_index() {
    let mut doc = Document::new();
    let body = doc.body();
    let banner = element(&mut doc, body, "div", &[("id", "cookie-banner")]);
    assert_eq!(doc.get_element_by_id("cookie-banner"), Some(banner));
    doc.remove(banner);
    assert_eq!(doc.get_element_by_id("cookie-banner"), None);
    assert!(!doc.exists(banner));
}

#[test]
fn checkbox_value_defaults_to_on() {
    let mut doc = Document::new();
    let body = doc.body();
    let checkbox = element(&mut doc, body, "input", &[("type", "checkbox"), ("required", "")]);
    assert_eq!(doc.value(checkbox), "on");
    assert!(!doc.checked(checkbox));
    doc.set_checked(checkbox, true);
    assert!(doc.checked(checkbox));
}

#[test]
fn select_value_comes_from_the_chosen_option() {
    let mut doc = Document::new();
    let body = doc.body();
    let select = element(&mut doc, body, "select", &[("name", "topic")]);
    assert_eq!(doc.value(select), "", "a select without options is empty");

    let first = element(&mut doc, select, "option", &[]);
    doc.set_text_content(first, "  Allgemein ");
    assert_eq!(doc.value(select), "Allgemein", "falls back to the first option's text");

    let group = element(&mut doc, select, "optgroup", &[]);
    let sales = element(&mut doc, group, "option", &[("value", "sales")]);
    assert_eq!(doc.value(select), "Allgemein");
    doc.set_attr(sales, "selected", "");
    assert_eq!(doc.value(select), "sales");

    doc.set_value(select, "press");
    assert_eq!(doc.value(select), "press", "an explicit value wins");
}
