//! Core transform trait.

use crate::node::Document;

/// Transform a document in place of the caller.
pub trait Transform: Sized {
    /// Transform the document.
    fn transform(self, doc: Document) -> Document;
}
