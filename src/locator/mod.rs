//! Structural locators: grammar, evaluation and synthesis.

/// Evaluating parsed locators against a document.
pub mod matcher;
/// Stable-identifier heuristics.
pub mod stability;
/// Escaping, lexing and parsing.
pub mod syntax;
/// Locator building for a target element.
pub mod synth;
