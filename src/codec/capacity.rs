use crate::codec::share::to_share_url;
use crate::foundation::core::round_px;
use crate::foundation::error::PinmentResult;
use crate::state::model::State;

/// Share URLs longer than this are unreliable across browsers and chat clients.
pub const MAX_URL_BYTES: usize = 8000;

/// Page that opens share URLs.
pub const DEFAULT_BASE_URL: &str = "https://khawkins98.github.io/pinment/";

/// UTF-8 length of the share URL for `state`.
pub fn estimate_bytes(state: &State, base_url: &str) -> PinmentResult<usize> {
    Ok(to_share_url(state, base_url)?.len())
}

/// How much of the URL budget a state uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityReport {
    /// Share URL length.
    pub bytes: usize,
    /// Budget it was measured against.
    pub limit: usize,
    /// `bytes` as a percentage of `limit`, capped at 100.
    pub percent: u8,
    /// Whether `bytes` exceeds `limit`.
    pub over_limit: bool,
}

impl CapacityReport {
    /// Report for a URL of `bytes` against `limit`.
    pub fn new(bytes: usize, limit: usize) -> Self {
        let percent = if limit == 0 {
            100
        } else {
            round_px(bytes as f64 * 100.0 / limit as f64).min(100.0) as u8
        };
        Self {
            bytes,
            limit,
            percent,
            over_limit: bytes > limit,
        }
    }
}

/// Measure `state` against `limit`.
pub fn capacity_report(
    state: &State,
    base_url: &str,
    limit: usize,
) -> PinmentResult<CapacityReport> {
    let bytes = estimate_bytes(state, base_url)?;
    let report = CapacityReport::new(bytes, limit);
    tracing::debug!(bytes, limit, percent = report.percent, "share URL capacity");
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/capacity.rs"]
mod tests;
