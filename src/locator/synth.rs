use std::fmt;

use crate::dom::document::Document;
use crate::locator::stability::{is_stable_class, is_stable_identifier};
use crate::locator::syntax::{escape_ident, quote_string};

/// Attribute that test suites put on elements they need to find again.
pub const TEST_ID_ATTRIBUTE: &str = "data-testid";

/// One `>`-separated piece of a synthesized locator.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Id(String),
    TestId { tag: String, value: String },
    Class { tag: String, class: String },
    NthOfType { tag: String, index: usize },
}

impl Segment {
    /// An id is assumed to be document-unique, so nothing above it is needed.
    fn is_terminal(&self) -> bool {
        matches!(self, Segment::Id(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Id(id) => write!(f, "#{}", escape_ident(id)),
            Segment::TestId { tag, value } => {
                write!(f, "{tag}[{TEST_ID_ATTRIBUTE}={}]", quote_string(value))
            }
            Segment::Class { tag, class } => write!(f, "{tag}.{}", escape_ident(class)),
            Segment::NthOfType { tag, index } => write!(f, "{tag}:nth-of-type({index})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    /// Ids, test ids and sibling-unique classes, falling back to position.
    Readable,
    /// Ids and positions only.
    Structural,
}

/// Build a locator that finds exactly `node` in `doc`, or `None` if no tier validates.
///
/// The readable tier is tried first; if the result is not unique (or fails to parse against the
/// host's query engine) the structural tier is tried. The document element and the body never get
/// a locator.
#[tracing::instrument(level = "trace", skip(doc))]
pub fn synthesize<D: Document + ?Sized>(doc: &D, node: D::Node) -> Option<String> {
    if doc.is_boundary(node) {
        return None;
    }

    let readable = build_path(doc, node, Tier::Readable);
    if validate_locator(doc, &readable, node) {
        return Some(readable);
    }
    tracing::debug!(locator = %readable, "readable locator not unique, using structural path");

    let structural = build_path(doc, node, Tier::Structural);
    if validate_locator(doc, &structural, node) {
        return Some(structural);
    }
    tracing::debug!(locator = %structural, "structural locator not unique, anchor unavailable");
    None
}

/// Whether `locator` resolves to exactly one element and that element is `expected`.
///
/// Query errors (unparsable locators, host engine failures) count as "does not validate".
pub fn validate_locator<D: Document + ?Sized>(doc: &D, locator: &str, expected: D::Node) -> bool {
    match doc.query_all(locator) {
        Ok(found) => found.len() == 1 && found[0] == expected,
        Err(e) => {
            tracing::trace!(locator, error = %e, "locator query failed");
            false
        }
    }
}

fn build_path<D: Document + ?Sized>(doc: &D, node: D::Node, tier: Tier) -> String {
    let mut segments = Vec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        if doc.is_boundary(n) {
            break;
        }
        let segment = build_segment(doc, n, tier);
        let terminal = segment.is_terminal();
        segments.push(segment);
        if terminal {
            break;
        }
        current = doc.parent(n);
    }

    segments
        .iter()
        .rev()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(">")
}

fn build_segment<D: Document + ?Sized>(doc: &D, node: D::Node, tier: Tier) -> Segment {
    if let Some(id) = doc.element_id(node)
        && is_stable_identifier(id)
    {
        return Segment::Id(id.to_owned());
    }

    let tag = doc.tag_name(node).to_owned();

    if tier == Tier::Readable {
        if let Some(value) = doc.attribute(node, TEST_ID_ATTRIBUTE)
            && !value.is_empty()
        {
            return Segment::TestId {
                tag,
                value: value.to_owned(),
            };
        }

        for class in doc.class_list(node) {
            if !is_stable_class(class) {
                continue;
            }
            let candidate = Segment::Class {
                tag: tag.clone(),
                class: class.to_owned(),
            };
            if unique_among_siblings(doc, node, &candidate.to_string()) {
                return candidate;
            }
        }
    }

    Segment::NthOfType {
        index: doc.nth_of_type_index(node),
        tag,
    }
}

fn unique_among_siblings<D: Document + ?Sized>(doc: &D, node: D::Node, segment: &str) -> bool {
    let Some(parent) = doc.parent(node) else {
        return false;
    };
    match doc.query_children(parent, segment) {
        Ok(found) => found.len() == 1 && found[0] == node,
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/locator/synth.rs"]
mod tests;
