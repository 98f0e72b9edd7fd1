//! Document type and related utilities
//!
//! The root container for document trees, with query and traversal APIs.

use super::{Element, NodePath};

// =============================================================================
// Document
// =============================================================================

/// Root document container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Root element (typically <html>, <body> or a wrapper)
    pub root: Element,
}

impl Document {
    /// Create a new document with a root element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first element matching predicate (depth-first search)
    pub fn find_element<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.iter_elements().find(|e| predicate(e))
    }

    /// Find all elements matching predicate, in document order
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.iter_elements().filter(|e| predicate(e)).collect()
    }

    /// Path of the first element matching predicate (document order)
    pub fn path_of<F>(&self, predicate: F) -> Option<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        let mut path = NodePath::root();
        Self::find_path_in(&self.root, &predicate, &mut path).then_some(path)
    }

    fn find_path_in<F>(elem: &Element, predicate: &F, path: &mut NodePath) -> bool
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(elem) {
            return true;
        }
        for (index, child) in elem.children.iter().enumerate() {
            if let Some(child_elem) = child.as_element() {
                path.push(index);
                if Self::find_path_in(child_elem, predicate, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    /// Path of the element with the given `id` attribute
    pub fn path_of_id(&self, id: &str) -> Option<NodePath> {
        self.path_of(|e| e.id() == Some(id))
    }

    /// Element addressed by `path`, if the path resolves to one
    pub fn element_at(&self, path: &NodePath) -> Option<&Element> {
        let mut current = &self.root;
        for &index in path.indices() {
            current = current.children.get(index)?.as_element()?;
        }
        Some(current)
    }

    /// Mutable element addressed by `path`
    pub fn element_at_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        let mut current = &mut self.root;
        for &index in path.indices() {
            current = current.children.get_mut(index)?.as_element_mut()?;
        }
        Some(current)
    }

    /// Count total elements in document
    pub fn element_count(&self) -> usize {
        self.iter_elements().count()
    }

    /// Iterate over all elements (depth-first, document order)
    pub fn iter_elements(&self) -> ElementIterator<'_> {
        ElementIterator::new(&self.root)
    }
}

// =============================================================================
// ElementIterator - depth-first element traversal
// =============================================================================

/// Depth-first iterator over elements
pub struct ElementIterator<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> ElementIterator<'a> {
    fn new(root: &'a Element) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        for child in elem.children.iter().rev() {
            if let Some(child_elem) = child.as_element() {
                self.stack.push(child_elem);
            }
        }
        Some(elem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(
            Element::new("body")
                .text("intro")
                .child(Element::new("nav").with_id("toc"))
                .child(
                    Element::new("article")
                        .child(Element::new("h1").text("Title"))
                        .child(Element::new("p").text("Body")),
                ),
        )
    }

    #[test]
    fn test_document_find() {
        let doc = sample();
        assert_eq!(doc.element_count(), 5);
        assert!(doc.find_element(|e| e.tag == "h1").is_some());
        assert!(doc.find_element(|e| e.tag == "missing").is_none());
        assert_eq!(doc.find_all(|e| e.tag != "body").len(), 4);
    }

    #[test]
    fn test_elements_iterator_order() {
        let doc = sample();
        let tags: Vec<_> = doc.iter_elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["body", "nav", "article", "h1", "p"]);
    }

    #[test]
    fn test_paths_count_text_nodes() {
        let doc = sample();
        let nav = doc.path_of_id("toc").unwrap();
        assert_eq!(nav.indices(), &[1]);

        let h1 = doc.path_of(|e| e.tag == "h1").unwrap();
        assert_eq!(h1.indices(), &[2, 0]);
        assert_eq!(doc.element_at(&h1).unwrap().text_content(), "Title");

        // Index 0 is the text node, not an element
        assert!(doc.element_at(&NodePath::from_slice(&[0])).is_none());
        assert!(doc.element_at(&NodePath::from_slice(&[9])).is_none());
    }

    #[test]
    fn test_element_at_mut() {
        let mut doc = sample();
        let nav = doc.path_of_id("toc").unwrap();
        doc.element_at_mut(&nav).unwrap().push_text("contents");
        assert_eq!(doc.element_at(&nav).unwrap().text_content(), "contents");
    }
}
