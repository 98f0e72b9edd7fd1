//! Fluent chaining of document transforms.

use crate::node::Document;

use super::Transform;

// =============================================================================
// Pipeline
// =============================================================================

/// Wraps a [`Document`] and applies transforms in order.
///
/// ```
/// use tola_toc::node::{Document, Element};
/// use tola_toc::options::TocOptions;
/// use tola_toc::toc::TableOfContents;
/// use tola_toc::transform::Pipeline;
///
/// let doc = Document::new(Element::new("body").child(Element::new("h1").text("Intro")));
/// let doc = Pipeline::new(doc)
///     .pipe(TableOfContents::new(TocOptions::default()))
///     .into_inner();
///
/// let list = doc.root.children_elements().last().unwrap();
/// assert_eq!(list.tag, "ul");
/// ```
pub struct Pipeline {
    doc: Document,
}

impl Pipeline {
    #[inline]
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    /// Apply a transform to the document.
    #[inline]
    pub fn pipe<T: Transform>(self, transform: T) -> Self {
        Self {
            doc: transform.transform(self.doc),
        }
    }

    /// Consume the pipeline and return the document.
    #[inline]
    pub fn into_inner(self) -> Document {
        self.doc
    }
}
