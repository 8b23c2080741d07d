//! Cursor-based pre-order walk over text nodes.

use crate::domain::entities::{Document, NodeData, NodeId};

/// Walks the text nodes below a root in document order.
///
/// Only the current position is stored; each step re-reads the live
/// document, so the tree may be mutated between steps. Nodes appended after
/// the current position are visited. If the current node gets detached the
/// walk ends early, so filters must not remove the node they are given.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: NodeId,
    current: NodeId,
}

impl TreeWalker {
    /// Creates a walker positioned on `root`.
    #[must_use]
    pub const fn new(root: NodeId) -> Self {
        Self {
            root,
            current: root,
        }
    }

    /// Returns the current position.
    #[must_use]
    pub const fn current(&self) -> NodeId {
        self.current
    }

    /// Advances to the next text node, or returns `None` when done.
    pub fn next_text(&mut self, document: &Document) -> Option<NodeId> {
        loop {
            let next = self.next_node(document)?;
            self.current = next;
            if matches!(document.data(next), Some(NodeData::Text(_))) {
                return Some(next);
            }
        }
    }

    fn next_node(&self, document: &Document) -> Option<NodeId> {
        if let Some(first) = document.children(self.current).first() {
            return Some(*first);
        }
        let mut node = self.current;
        loop {
            if node == self.root {
                return None;
            }
            if let Some(sibling) = document.next_sibling(node) {
                return Some(sibling);
            }
            node = document.parent(node)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Element;

    fn texts(document: &Document, root: NodeId) -> Vec<String> {
        let mut walker = TreeWalker::new(root);
        let mut out = Vec::new();
        while let Some(node) = walker.next_text(document) {
            out.extend(document.text_content(node));
        }
        out
    }

    #[test]
    fn test_visits_text_in_document_order() {
        let document = Document::from_plain_text("one\n\ntwo\n\nthree");
        assert_eq!(texts(&document, document.root()), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_stays_below_root() {
        let mut document = Document::new();
        let a = document.create_element(Element::new("div"));
        let b = document.create_element(Element::new("div"));
        document.append_child(document.root(), a);
        document.append_child(document.root(), b);
        let inside = document.create_text("inside");
        let outside = document.create_text("outside");
        document.append_child(a, inside);
        document.append_child(b, outside);

        assert_eq!(texts(&document, a), vec!["inside"]);
    }

    #[test]
    fn test_sees_nodes_appended_during_walk() {
        let mut document = Document::from_plain_text("first");
        let mut walker = TreeWalker::new(document.root());

        let first = walker.next_text(&document).expect("first text");
        let parent = document.parent(first).expect("paragraph");
        let appended = document.create_text("appended");
        document.append_child(parent, appended);

        assert_eq!(walker.next_text(&document), Some(appended));
        assert_eq!(walker.next_text(&document), None);
    }

    #[test]
    fn test_detaching_current_node_ends_walk() {
        let mut document = Document::from_plain_text("a\n\nb");
        let mut walker = TreeWalker::new(document.root());

        let first = walker.next_text(&document).expect("first text");
        document.detach(first);

        assert_eq!(walker.next_text(&document), None);
    }
}
