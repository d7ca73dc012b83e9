//! Geometry, rounding and the crate error type.

/// Geometry re-exports and numeric helpers.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
