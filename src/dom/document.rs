use std::fmt::Debug;

use crate::foundation::core::{Point, Rect, Vec2};
use crate::foundation::error::PinmentResult;
use crate::locator::matcher;
use crate::locator::syntax::Locator;

/// Read access to a live element tree plus the document-query primitive.
///
/// Only elements are modelled; text and comment nodes never carry anchors. Implementations hand
/// out cheap `Copy` node handles that stay meaningful only for the tree that produced them. The
/// anchor code never stores a handle across calls; it re-queries every time.
pub trait Document {
    /// Handle to one element in this document.
    type Node: Copy + Eq + Debug;

    /// The `<html>` element.
    fn document_element(&self) -> Self::Node;

    /// The `<body>` element, if the document has one.
    fn body(&self) -> Option<Self::Node>;

    /// Parent element, `None` for the document element and for detached nodes.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element children in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Lowercase tag name.
    fn tag_name(&self, node: Self::Node) -> &str;

    /// Attribute value by (lowercase) name.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Non-empty `id` attribute.
    fn element_id(&self, node: Self::Node) -> Option<&str> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    /// Whitespace-separated tokens of the `class` attribute.
    fn class_list(&self, node: Self::Node) -> Vec<&str> {
        self.attribute(node, "class")
            .map(|c| c.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether `node` is the document element or the body. Locators never name these.
    fn is_boundary(&self, node: Self::Node) -> bool {
        node == self.document_element() || Some(node) == self.body()
    }

    /// 1-based position of `node` among its same-tag siblings.
    fn nth_of_type_index(&self, node: Self::Node) -> usize {
        let Some(parent) = self.parent(node) else {
            return 1;
        };
        let tag = self.tag_name(node);
        let mut index = 1;
        for sibling in self.children(parent) {
            if sibling == node {
                break;
            }
            if self.tag_name(sibling) == tag {
                index += 1;
            }
        }
        index
    }

    /// Every element matching `locator`, in document order.
    ///
    /// The default implementation runs the built-in matcher over the whole tree. Hosts that have a
    /// native selector engine may override it.
    fn query_all(&self, locator: &str) -> PinmentResult<Vec<Self::Node>> {
        let parsed = Locator::parse(locator)?;
        Ok(matcher::select_all(self, &parsed, None))
    }

    /// Children of `parent` matching `locator` (the `:scope>` form of [`Document::query_all`]).
    fn query_children(&self, parent: Self::Node, locator: &str) -> PinmentResult<Vec<Self::Node>> {
        let parsed = Locator::parse(locator)?;
        Ok(self
            .children(parent)
            .into_iter()
            .filter(|&child| matcher::matches(self, &parsed, child, Some(parent)))
            .collect())
    }
}

/// Geometry, scrolling and hit testing of a rendered document.
pub trait Viewport: Document {
    /// Current border box of `node` in viewport (client) coordinates.
    fn bounding_box(&self, node: Self::Node) -> Rect;

    /// Current scroll offset of the page.
    fn scroll_offset(&self) -> Vec2;

    /// Topmost interactive element under `point` (client coordinates).
    fn hit_test(&self, point: Point) -> Option<Self::Node>;

    /// Set whether `node` takes part in hit testing. Returns the previous setting.
    fn set_interactive(&mut self, node: Self::Node, interactive: bool) -> bool;
}
