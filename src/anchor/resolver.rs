use crate::dom::document::Viewport;
use crate::foundation::core::Point;
use crate::state::model::Pin;

/// Ratio used when a pin has a locator but no stored offset.
pub const DEFAULT_RATIO: f64 = 0.5;

/// Page-pixel position computed for a pin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Page x.
    pub left: f64,
    /// Page y.
    pub top: f64,
    /// The pin had a locator that no longer finds exactly one element.
    pub is_fallback: bool,
}

impl Placement {
    /// `(left, top)` as a point.
    pub fn position(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// Something on screen that can be moved to a pin's placement.
pub trait Marker {
    /// Move to `position` (page pixels), flagging whether the pin lost its anchor.
    fn place(&mut self, position: Point, is_fallback: bool);
}

/// In-memory marker; records where it was last put.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PinMarker {
    /// Last placement, `None` until placed.
    pub position: Option<Point>,
    /// Whether the last placement was a fallback.
    pub is_fallback: bool,
}

impl Marker for PinMarker {
    fn place(&mut self, position: Point, is_fallback: bool) {
        self.position = Some(position);
        self.is_fallback = is_fallback;
    }
}

/// One pin of a state, placed against the current document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPin {
    /// Pin id.
    pub id: u64,
    /// Page-pixel position.
    pub position: Point,
    /// Placed through its locator rather than the stored pixel pair.
    pub anchored: bool,
}

/// Current page-pixel position of `pin`.
///
/// The locator is re-queried every call. It only counts as resolved when it finds exactly one
/// element; otherwise the stored `fx`/`fy` pair is used.
pub fn resolve<V: Viewport + ?Sized>(doc: &V, pin: &Pin) -> Placement {
    let fallback = |is_fallback| Placement {
        left: pin.fx,
        top: pin.fy,
        is_fallback,
    };

    let Some(locator) = pin.s.as_deref() else {
        return fallback(false);
    };

    let node = match doc.query_all(locator) {
        Ok(found) if found.len() == 1 => found[0],
        Ok(found) => {
            let matches = found.len();
            tracing::debug!(pin = pin.id, locator, matches, "locator did not resolve");
            return fallback(true);
        }
        Err(e) => {
            tracing::debug!(pin = pin.id, locator, error = %e, "locator query failed");
            return fallback(true);
        }
    };

    let rect = doc.bounding_box(node);
    let scroll = doc.scroll_offset();
    Placement {
        left: rect.x0 + scroll.x + pin.ox.unwrap_or(DEFAULT_RATIO) * rect.width(),
        top: rect.y0 + scroll.y + pin.oy.unwrap_or(DEFAULT_RATIO) * rect.height(),
        is_fallback: false,
    }
}

/// Resolve `pin` and move `marker` there.
pub fn reposition<V, M>(doc: &V, marker: &mut M, pin: &Pin) -> Placement
where
    V: Viewport + ?Sized,
    M: Marker + ?Sized,
{
    let placement = resolve(doc, pin);
    marker.place(placement.position(), placement.is_fallback);
    placement
}

/// Resolve every pin in order.
#[tracing::instrument(level = "debug", skip_all, fields(pins = pins.len()))]
pub fn resolve_all<V: Viewport + ?Sized>(doc: &V, pins: &[Pin]) -> Vec<ResolvedPin> {
    pins.iter()
        .map(|pin| {
            let placement = resolve(doc, pin);
            ResolvedPin {
                id: pin.id,
                position: placement.position(),
                anchored: pin.s.is_some() && !placement.is_fallback,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/anchor/resolver.rs"]
mod tests;
