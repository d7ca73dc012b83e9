use crate::dom::document::Document;
use crate::locator::syntax::{Combinator, Compound, Locator};

/// All elements of `doc` matched by `locator`, in document order.
///
/// `scope` is the element `:scope` refers to; `None` means the document element.
pub fn select_all<D: Document + ?Sized>(
    doc: &D,
    locator: &Locator,
    scope: Option<D::Node>,
) -> Vec<D::Node> {
    let mut out = Vec::new();
    let mut stack = vec![doc.document_element()];
    while let Some(node) = stack.pop() {
        if matches(doc, locator, node, scope) {
            out.push(node);
        }
        let children = doc.children(node);
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Whether `node` is matched by `locator`.
pub fn matches<D: Document + ?Sized>(
    doc: &D,
    locator: &Locator,
    node: D::Node,
    scope: Option<D::Node>,
) -> bool {
    let Some(last) = locator.steps.len().checked_sub(1) else {
        return false;
    };
    let scope = scope.unwrap_or_else(|| doc.document_element());
    match_step(doc, locator, last, node, scope) == StepMatch::Matched
}

/// Outcome of matching one step against one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepMatch {
    Matched,
    /// Failed here; a higher ancestor may still work for an enclosing descendant step.
    NotMatched,
    /// Failed and no higher ancestor can succeed either, so enclosing descendant steps stop.
    NotMatchedGlobally,
}

// Right-to-left: the subject must satisfy the last compound, then some ancestor chain the rest.
fn match_step<D: Document + ?Sized>(
    doc: &D,
    locator: &Locator,
    idx: usize,
    node: D::Node,
    scope: D::Node,
) -> StepMatch {
    let step = &locator.steps[idx];
    if !compound_matches(doc, &step.compound, node, scope) {
        return StepMatch::NotMatched;
    }
    if idx == 0 {
        return StepMatch::Matched;
    }
    match step.combinator {
        Some(Combinator::Child) => match doc.parent(node) {
            Some(parent) => match_step(doc, locator, idx - 1, parent, scope),
            None => StepMatch::NotMatchedGlobally,
        },
        Some(Combinator::Descendant) => {
            let mut current = doc.parent(node);
            while let Some(ancestor) = current {
                match match_step(doc, locator, idx - 1, ancestor, scope) {
                    StepMatch::NotMatched => current = doc.parent(ancestor),
                    done => return done,
                }
            }
            StepMatch::NotMatchedGlobally
        }
        None => StepMatch::NotMatchedGlobally,
    }
}

fn compound_matches<D: Document + ?Sized>(
    doc: &D,
    compound: &Compound,
    node: D::Node,
    scope: D::Node,
) -> bool {
    if compound.scope && node != scope {
        return false;
    }
    if let Some(tag) = &compound.tag
        && doc.tag_name(node) != tag
    {
        return false;
    }
    if !compound.ids.is_empty() {
        let Some(id) = doc.attribute(node, "id") else {
            return false;
        };
        if compound.ids.iter().any(|want| want != id) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let classes = doc.class_list(node);
        if !compound.classes.iter().all(|c| classes.contains(&c.as_str())) {
            return false;
        }
    }
    for test in &compound.attrs {
        match (doc.attribute(node, &test.name), &test.value) {
            (None, _) => return false,
            (Some(actual), Some(want)) if actual != want => return false,
            _ => {}
        }
    }
    if let Some(n) = compound.nth_of_type
        && doc.nth_of_type_index(node) != n
    {
        return false;
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/locator/matcher.rs"]
mod tests;
