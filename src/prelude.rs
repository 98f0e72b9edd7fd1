//! Prelude module for common imports.
//!
//! ```
//! use tola_toc::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Document, Element, Node, NodePath, Text};

// Attributes
pub use crate::attr::{Attrs, AttrsExt};

// Transform
pub use crate::toc::TableOfContents;
pub use crate::transform::{Pipeline, Transform};

// Options
pub use crate::options::{Nesting, ResolvedOptions, TocOptions};
pub use crate::scan::DocumentOrder;
pub use crate::selector::{SelectorMap, SelectorSpec};

// Identifiers
pub use crate::registry::{IdentifierRegistry, SharedRegistry};
pub use crate::slug::{Slugifier, slugify};

// Scan
pub use crate::scan::{DocumentSource, HeadingSource};

// Output
pub use crate::tree::{ItemContent, TocItem, TocList};

// Render
pub use crate::render::{render_document, render_element, render_list};

// Error
pub use crate::error::{TocError, TocResult};
