//! Document access.
//!
//! The anchoring code never touches a concrete DOM. It talks to [`document::Document`] and
//! [`document::Viewport`], which a host binding implements over the live page; [`tree`] is the
//! in-memory implementation used offline and in tests.

/// Structure, query and layout traits.
pub mod document;
/// Arena-backed in-memory document.
pub mod tree;
