pub use kurbo::{Point, Rect, Vec2};

/// Largest integer magnitude an `f64` represents exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Round to the nearest integer, ties toward positive infinity.
///
/// Browsers round page coordinates this way (`Math.round`), and pins captured there must land on
/// the same pixel here.
pub fn round_px(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Round to `decimals` fractional digits with the same tie rule as [`round_px`].
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    round_px(v * scale) / scale
}

/// Clamp into `[0, 1]`. NaN maps to the midpoint.
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        return 0.5;
    }
    v.clamp(0.0, 1.0)
}

/// Ratio of `offset` along an extent of `len`, clamped to `[0, 1]`.
///
/// Degenerate extents (zero or negative length) anchor at the midpoint.
pub(crate) fn unit_ratio(offset: f64, len: f64) -> f64 {
    if len <= 0.0 || !len.is_finite() {
        return 0.5;
    }
    clamp_unit(offset / len)
}

/// Serialize whole floats as JSON integers so payloads stay short (`200` rather than `200.0`).
pub(crate) fn compact_number<S>(v: &f64, ser: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT {
        ser.serialize_i64(*v as i64)
    } else {
        ser.serialize_f64(*v)
    }
}

/// [`compact_number`] for nullable fields; `None` stays `null`.
pub(crate) fn compact_opt_number<S>(v: &Option<f64>, ser: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match v {
        Some(v) => compact_number(v, ser),
        None => ser.serialize_none(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
