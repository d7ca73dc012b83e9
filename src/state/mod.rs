//! Versioned annotation state.
//!
//! Raw input (decoded share payloads, imported files) is untrusted JSON. It is checked against the
//! version it declares and migrated forward; only then does it become a [`model::State`].

/// Environment detection.
pub mod env;
/// Version 1 to version 2 migration.
pub mod migrate;
/// State, pin and environment types.
pub mod model;
/// Path-addressed schema validation.
pub mod validate;
/// Schema version dispatch.
pub mod version;
