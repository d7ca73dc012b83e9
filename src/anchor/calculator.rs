use crate::dom::document::Viewport;
use crate::foundation::core::{Point, round_px, round_to, unit_ratio};
use crate::locator::synth::synthesize;
use crate::state::model::Pin;

/// Decimal places kept on offset ratios.
pub const RATIO_DECIMALS: u32 = 3;

/// Where a click landed, in durable form.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorData {
    /// Locator of the element under the click, `None` for pixel-only anchors.
    pub s: Option<String>,
    /// Horizontal position inside the element's box, `[0, 1]`.
    pub ox: Option<f64>,
    /// Vertical position inside the element's box, `[0, 1]`.
    pub oy: Option<f64>,
    /// Page x in integer pixels.
    pub fx: f64,
    /// Page y in integer pixels.
    pub fy: f64,
}

impl AnchorData {
    fn pixel_only(fx: f64, fy: f64) -> Self {
        Self {
            s: None,
            ox: None,
            oy: None,
            fx,
            fy,
        }
    }

    /// Whether the anchor carries a structural locator.
    pub fn is_anchored(&self) -> bool {
        self.s.is_some()
    }

    /// Turn the anchor into a new open pin.
    pub fn into_pin(self, id: u64, author: Option<String>, text: impl Into<String>) -> Pin {
        Pin {
            id,
            s: self.s,
            ox: self.ox,
            oy: self.oy,
            fx: self.fx,
            fy: self.fy,
            author,
            text: text.into(),
            c: None,
            resolved: None,
            replies: None,
        }
    }
}

/// Takes overlay elements out of hit testing for as long as it lives.
///
/// Each overlay gets back the interactivity it had before, in reverse order, when the guard is
/// dropped; that includes unwinding out of a panicking hit test.
pub struct OverlaySuppression<'a, V: Viewport + ?Sized> {
    doc: &'a mut V,
    saved: Vec<(V::Node, bool)>,
}

impl<'a, V: Viewport + ?Sized> OverlaySuppression<'a, V> {
    /// Disable hit testing on every node in `overlays`.
    pub fn new(doc: &'a mut V, overlays: &[V::Node]) -> Self {
        let saved = overlays
            .iter()
            .map(|&node| (node, doc.set_interactive(node, false)))
            .collect();
        Self { doc, saved }
    }

    /// The document with overlays suppressed.
    pub fn doc(&self) -> &V {
        &*self.doc
    }
}

impl<V: Viewport + ?Sized> Drop for OverlaySuppression<'_, V> {
    fn drop(&mut self) {
        for (node, interactive) in self.saved.drain(..).rev() {
            self.doc.set_interactive(node, interactive);
        }
    }
}

/// Compute anchor data for a click at `client` (viewport coordinates).
///
/// `overlays` are the annotation tool's own elements (pin layer, panels) that must not be picked
/// up by the hit test. A click that lands on nothing, or only on the body or document element,
/// yields a pixel-only anchor; so does an element for which no unique locator can be built.
#[tracing::instrument(level = "debug", skip(doc, overlays), fields(overlays = overlays.len()))]
pub fn compute_anchor<V: Viewport + ?Sized>(
    doc: &mut V,
    client: Point,
    overlays: &[V::Node],
) -> AnchorData {
    let hit = {
        let suppressed = OverlaySuppression::new(doc, overlays);
        suppressed.doc().hit_test(client)
    };

    let scroll = doc.scroll_offset();
    let fx = round_px(client.x + scroll.x);
    let fy = round_px(client.y + scroll.y);

    let Some(target) = hit.filter(|&n| !doc.is_boundary(n)) else {
        tracing::debug!(fx, fy, "no element under click, pixel-only anchor");
        return AnchorData::pixel_only(fx, fy);
    };

    let Some(locator) = synthesize(&*doc, target) else {
        tracing::debug!(?target, fx, fy, "no unique locator, pixel-only anchor");
        return AnchorData::pixel_only(fx, fy);
    };

    let rect = doc.bounding_box(target);
    let ox = round_to(unit_ratio(client.x - rect.x0, rect.width()), RATIO_DECIMALS);
    let oy = round_to(unit_ratio(client.y - rect.y0, rect.height()), RATIO_DECIMALS);

    AnchorData {
        s: Some(locator),
        ox: Some(ox),
        oy: Some(oy),
        fx,
        fy,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anchor/calculator.rs"]
mod tests;
