//! Wire formats: share URLs and exported JSON files.

/// URL budget measurement.
pub mod capacity;
/// Brotli plus URL-safe base64 transform.
pub mod compress;
/// Pretty JSON import and export.
pub mod json;
/// Share payloads and share URLs.
pub mod share;
