//! Heuristics for telling hand-written identifiers apart from generated ones.
//!
//! Build tools and component frameworks stamp elements with hashes and counters that change on
//! every deploy or render. A locator built on those breaks on the next page load, so the
//! synthesizer skips them. These are tuning knobs; the synthesis algorithm does not depend on
//! their exact thresholds.

use std::sync::LazyLock;

use regex::Regex;

static HEX_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9a-f]{8,}$").expect("valid regex"));

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

static CSS_IN_JS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(css|sc|emotion|styled)-").expect("valid regex"));

static SHORT_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{1,2}-[0-9a-z]{4,}$").expect("valid regex"));

/// Classes that only reflect transient interaction state.
pub const STATE_CLASSES: &[&str] = &[
    "hover",
    "active",
    "focus",
    "open",
    "hidden",
    "show",
    "visible",
    "is-open",
    "is-active",
    "is-hidden",
];

/// Whether an `id` attribute is likely to survive a reload.
///
/// Rejects hex hashes of 8+ characters, purely numeric ids and ids containing `:` or `.`
/// (React `useId`, Angular and similar generated ids).
pub fn is_stable_identifier(id: &str) -> bool {
    !id.is_empty()
        && !HEX_HASH_RE.is_match(id)
        && !NUMERIC_RE.is_match(id)
        && !id.contains([':', '.'])
}

/// Whether a class name is a meaningful, hand-written style hook.
pub fn is_stable_class(class: &str) -> bool {
    !class.is_empty()
        && !CSS_IN_JS_RE.is_match(class)
        && !SHORT_HASH_RE.is_match(class)
        && !STATE_CLASSES.contains(&class)
}

#[cfg(test)]
#[path = "../../tests/unit/locator/stability.rs"]
mod tests;
