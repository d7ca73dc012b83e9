//! Turning clicks into anchors and anchors back into positions.

/// Click to anchor.
pub mod calculator;
/// Anchor to page position.
pub mod resolver;
