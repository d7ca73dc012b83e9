use super::*;
use crate::dom::tree::{Element, NodeId, StaticDocument};

struct Page {
    doc: StaticDocument,
    list: NodeId,
    items: Vec<NodeId>,
    button: NodeId,
}

fn page() -> Page {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let body = doc.body_node();
    let content = doc.append(body, Element::new("div").id("content"));
    let list = doc.append(content, Element::new("ul").class("menu"));
    let items = (0..3)
        .map(|i| {
            let class = if i == 1 { "item active" } else { "item" };
            doc.append(list, Element::new("li").class(class))
        })
        .collect();
    let button = doc.append(
        content,
        Element::new("button").attr("data-testid", "submit-btn"),
    );
    Page {
        doc,
        list,
        items,
        button,
    }
}

fn select(doc: &StaticDocument, locator: &str) -> Vec<NodeId> {
    select_all(doc, &Locator::parse(locator).unwrap(), None)
}

#[test]
fn child_chain_with_nth_of_type() {
    let p = page();
    assert_eq!(
        select(&p.doc, "#content>ul.menu>li:nth-of-type(2)"),
        vec![p.items[1]]
    );
    assert_eq!(select(&p.doc, "#content>li"), Vec::<NodeId>::new());
}

#[test]
fn descendant_combinator_skips_levels() {
    let p = page();
    assert_eq!(select(&p.doc, "#content li"), p.items);
    assert_eq!(select(&p.doc, "body li.active"), vec![p.items[1]]);
}

#[test]
fn attribute_and_universal_tests() {
    let p = page();
    assert_eq!(
        select(&p.doc, r#"button[data-testid="submit-btn"]"#),
        vec![p.button]
    );
    assert_eq!(select(&p.doc, "*[data-testid]"), vec![p.button]);
    assert!(select(&p.doc, r#"button[data-testid="other"]"#).is_empty());
}

#[test]
fn scope_anchors_to_given_element() {
    let p = page();
    let loc = Locator::parse(":scope>li.item").unwrap();
    assert_eq!(select_all(&p.doc, &loc, Some(p.list)), p.items);
    assert!(select_all(&p.doc, &loc, None).is_empty());
}

#[test]
fn conflicting_ids_never_match() {
    let p = page();
    assert!(select(&p.doc, "#content#other").is_empty());
    assert_eq!(select(&p.doc, "#content#content").len(), 1);
}

#[test]
fn scoped_query_through_document_trait() {
    let p = page();
    assert_eq!(
        p.doc.query_children(p.list, "li.active").unwrap(),
        vec![p.items[1]]
    );
    assert_eq!(p.doc.query_children(p.list, "li.item").unwrap().len(), 3);
    assert!(p.doc.query_children(p.list, "li[[").is_err());
}

fn nested_divs(depth: usize) -> (StaticDocument, Vec<NodeId>) {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let mut parent = doc.append(doc.body_node(), Element::new("section"));
    let mut chain = Vec::with_capacity(depth);
    for _ in 0..depth {
        parent = doc.append(parent, Element::new("div"));
        chain.push(parent);
    }
    (doc, chain)
}

#[test]
fn descendant_chains_fail_fast_on_deep_trees() {
    let (doc, _) = nested_divs(64);
    let locator = format!("nope{}", " div".repeat(40));
    let started = std::time::Instant::now();
    assert!(select(&doc, &locator).is_empty());
    assert!(
        started.elapsed() < std::time::Duration::from_secs(2),
        "took {:?}",
        started.elapsed()
    );
}

#[test]
fn descendant_chains_still_match_deep_subjects() {
    let (doc, chain) = nested_divs(12);
    assert_eq!(select(&doc, "section div div div"), chain[2..].to_vec());
    assert_eq!(select(&doc, "section>div div>div"), chain[2..].to_vec());
    assert_eq!(select(&doc, "body>section>div>div"), vec![chain[1]]);
    assert!(select(&doc, "div section").is_empty());
}
