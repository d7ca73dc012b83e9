use crate::dom::document::{Document, Viewport};
use crate::foundation::core::{Point, Rect, Vec2};

/// Index of an element inside a [`StaticDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Description of an element to insert with [`StaticDocument::append`].
#[derive(Clone, Debug)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    rect: Rect,
}

impl Element {
    /// New element with no attributes and an empty box at the origin.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            rect: Rect::ZERO,
        }
    }

    /// Set an attribute (names are case-insensitive).
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Set the `id` attribute.
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Set the `class` attribute.
    pub fn class(self, classes: impl Into<String>) -> Self {
        self.attr("class", classes)
    }

    /// Layout box in page coordinates.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    interactive: bool,
}

/// Arena-backed element tree with precomputed layout boxes.
///
/// Boxes are stored in page coordinates; [`Viewport::bounding_box`] reports them relative to the
/// current scroll offset the way a browser does. The tree can be edited after construction
/// (moving boxes, changing attributes, detaching subtrees) to model a page that reflows or mutates
/// between anchoring and resolution.
#[derive(Clone, Debug)]
pub struct StaticDocument {
    nodes: Vec<NodeData>,
    body: NodeId,
    scroll: Vec2,
}

impl StaticDocument {
    /// Empty `<html><body></body></html>` document whose page is `width` x `height`.
    pub fn new(width: f64, height: f64) -> Self {
        let page = Rect::new(0.0, 0.0, width, height);
        let html = NodeData {
            tag: "html".to_owned(),
            attrs: Vec::new(),
            parent: None,
            children: vec![NodeId(1)],
            rect: page,
            interactive: true,
        };
        let body = NodeData {
            tag: "body".to_owned(),
            attrs: Vec::new(),
            parent: Some(NodeId(0)),
            children: Vec::new(),
            rect: page,
            interactive: true,
        };
        Self {
            nodes: vec![html, body],
            body: NodeId(1),
            scroll: Vec2::ZERO,
        }
    }

    /// The `<body>` element.
    pub fn body_node(&self) -> NodeId {
        self.body
    }

    /// Append `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: element.tag,
            attrs: element.attrs,
            parent: Some(parent),
            children: Vec::new(),
            rect: element.rect,
            interactive: true,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Insert `element` as a child of `parent` before position `index`.
    pub fn insert(&mut self, parent: NodeId, index: usize, element: Element) -> NodeId {
        let id = self.append(parent, element);
        let children = &mut self.nodes[parent.0].children;
        children.pop();
        let index = index.min(children.len());
        children.insert(index, id);
        id
    }

    /// Unlink `node` (and its subtree) from its parent. The handle stays valid but no query finds
    /// it any more.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Replace or add an attribute on an existing element.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        let attrs = &mut self.nodes[node.0].attrs;
        match attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => attrs.push((name, value)),
        }
    }

    /// Move or resize an element's page box.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.0].rect = rect;
    }

    /// Scroll the page.
    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.scroll = scroll;
    }

    /// Whether `node` currently takes part in hit testing.
    pub fn is_interactive(&self, node: NodeId) -> bool {
        self.nodes[node.0].interactive
    }

    /// Elements reachable from the document element, in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId(0)];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        out
    }

    fn hit_candidate(&self, node: NodeId, page_point: Point, out: &mut Option<NodeId>) {
        let data = &self.nodes[node.0];
        if !data.interactive {
            return;
        }
        if data.rect.contains(page_point) {
            *out = Some(node);
        }
        // Later siblings paint above earlier ones, children above their parent.
        for &child in &data.children {
            self.hit_candidate(child, page_point, out);
        }
    }
}

impl Document for StaticDocument {
    type Node = NodeId;

    fn document_element(&self) -> NodeId {
        NodeId(0)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn tag_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl Viewport for StaticDocument {
    fn bounding_box(&self, node: NodeId) -> Rect {
        self.nodes[node.0].rect - self.scroll
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }

    fn hit_test(&self, point: Point) -> Option<NodeId> {
        let page_point = point + self.scroll;
        let mut hit = None;
        self.hit_candidate(NodeId(0), page_point, &mut hit);
        hit
    }

    fn set_interactive(&mut self, node: NodeId, interactive: bool) -> bool {
        std::mem::replace(&mut self.nodes[node.0].interactive, interactive)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dom/tree.rs"]
mod tests;
