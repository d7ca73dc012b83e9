use super::*;
use crate::anchor::calculator::compute_anchor;
use crate::dom::tree::{Element, NodeId, StaticDocument};
use crate::foundation::core::{Rect, Vec2};

fn page() -> (StaticDocument, NodeId) {
    let mut doc = StaticDocument::new(1200.0, 3000.0);
    let body = doc.body_node();
    let main = doc.append(
        body,
        Element::new("main")
            .id("content")
            .rect(Rect::new(0.0, 0.0, 1200.0, 3000.0)),
    );
    let card = doc.append(
        main,
        Element::new("div")
            .class("card")
            .rect(Rect::new(100.0, 500.0, 500.0, 700.0)),
    );
    (doc, card)
}

fn anchored_pin(s: &str, ox: f64, oy: f64) -> Pin {
    Pin {
        id: 1,
        s: Some(s.to_owned()),
        ox: Some(ox),
        oy: Some(oy),
        fx: 11.0,
        fy: 22.0,
        text: "note".to_owned(),
        ..Pin::default()
    }
}

#[test]
fn applies_ratios_to_current_box() {
    let (doc, _) = page();
    let placement = resolve(&doc, &anchored_pin("#content>div.card", 0.25, 0.5));
    assert_eq!(
        placement,
        Placement {
            left: 200.0,
            top: 600.0,
            is_fallback: false,
        }
    );
}

#[test]
fn scroll_does_not_move_page_position() {
    let (mut doc, _) = page();
    let pin = anchored_pin("#content>div.card", 0.25, 0.5);
    let before = resolve(&doc, &pin);
    doc.set_scroll(Vec2::new(30.0, 450.0));
    assert_eq!(resolve(&doc, &pin), before);
}

#[test]
fn follows_element_after_reflow() {
    let (mut doc, card) = page();
    let anchor = compute_anchor(&mut doc, Point::new(200.0, 550.0), &[]);
    let pin = anchor.into_pin(1, None, "moved?");
    assert_eq!(resolve(&doc, &pin).position(), Point::new(200.0, 550.0));

    doc.set_rect(card, Rect::new(300.0, 900.0, 700.0, 1100.0));
    let after = resolve(&doc, &pin);
    assert_eq!(after.position(), Point::new(400.0, 950.0));
    assert!(!after.is_fallback);
}

#[test]
fn missing_element_falls_back_to_pixels() {
    let (mut doc, card) = page();
    let pin = anchored_pin("#content>div.card", 0.25, 0.5);
    doc.detach(card);
    assert_eq!(
        resolve(&doc, &pin),
        Placement {
            left: 11.0,
            top: 22.0,
            is_fallback: true,
        }
    );
}

#[test]
fn ambiguous_and_broken_locators_fall_back() {
    let (mut doc, _) = page();
    let body = doc.body_node();
    doc.append(body, Element::new("div").class("card"));

    let ambiguous = resolve(&doc, &anchored_pin("div.card", 0.5, 0.5));
    assert!(ambiguous.is_fallback);
    assert_eq!(ambiguous.position(), Point::new(11.0, 22.0));

    let broken = resolve(&doc, &anchored_pin("div[[", 0.5, 0.5));
    assert!(broken.is_fallback);
    assert_eq!(broken.position(), Point::new(11.0, 22.0));
}

#[test]
fn pixel_only_pin_is_not_a_fallback() {
    let (doc, _) = page();
    let pin = Pin {
        id: 3,
        fx: 40.0,
        fy: 80.0,
        ..Pin::default()
    };
    assert_eq!(
        resolve(&doc, &pin),
        Placement {
            left: 40.0,
            top: 80.0,
            is_fallback: false,
        }
    );
}

#[test]
fn missing_ratios_default_to_center() {
    let (doc, _) = page();
    let pin = Pin {
        ox: None,
        oy: None,
        ..anchored_pin("#content>div.card", 0.0, 0.0)
    };
    assert_eq!(resolve(&doc, &pin).position(), Point::new(300.0, 600.0));
}

#[test]
fn reposition_moves_marker() {
    let (mut doc, card) = page();
    let pin = anchored_pin("#content>div.card", 1.0, 1.0);
    let mut marker = PinMarker::default();

    let placement = reposition(&doc, &mut marker, &pin);
    assert_eq!(marker.position, Some(Point::new(500.0, 700.0)));
    assert_eq!(placement.position(), Point::new(500.0, 700.0));
    assert!(!marker.is_fallback);

    doc.detach(card);
    reposition(&doc, &mut marker, &pin);
    assert_eq!(marker.position, Some(Point::new(11.0, 22.0)));
    assert!(marker.is_fallback);
}

#[test]
fn resolve_all_keeps_order_and_flags() {
    let (doc, _) = page();
    let pins = vec![
        anchored_pin("#content>div.card", 0.0, 0.0),
        Pin {
            id: 2,
            fx: 5.0,
            fy: 6.0,
            ..Pin::default()
        },
        Pin {
            id: 3,
            ..anchored_pin("#gone", 0.5, 0.5)
        },
    ];
    let resolved = resolve_all(&doc, &pins);
    assert_eq!(
        resolved,
        vec![
            ResolvedPin {
                id: 1,
                position: Point::new(100.0, 500.0),
                anchored: true,
            },
            ResolvedPin {
                id: 2,
                position: Point::new(5.0, 6.0),
                anchored: false,
            },
            ResolvedPin {
                id: 3,
                position: Point::new(11.0, 22.0),
                anchored: false,
            },
        ]
    );
}

#[test]
fn crafted_descendant_locator_falls_back_promptly() {
    let (mut doc, card) = page();
    let mut parent = card;
    for _ in 0..48 {
        parent = doc.append(parent, Element::new("div"));
    }
    let locator = format!("nope{}", " div".repeat(24));
    let started = std::time::Instant::now();
    let placement = resolve(&doc, &anchored_pin(&locator, 0.5, 0.5));
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
    assert!(placement.is_fallback);
    assert_eq!(placement.position(), Point::new(11.0, 22.0));
}
