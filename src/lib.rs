//! tola-toc - Table of contents generation for HTML documents
//!
//! ## Core Concepts
//!
//! **Headings by selector**: a selector-to-depth mapping (`"h1$1;h2$2"`)
//! decides which elements are headings and how deep each one sits.
//!
//! **Unique anchors**: every heading gets a URL-safe identifier derived from
//! its title; collisions within one registry are suffixed `-1`, `-2`, ...
//!
//! **Nested lists**: headings in document order become a `<ul>`/`<ol>`
//! tree, optionally capped at a nesting depth.
//!
//! ## Modules
//! - `node`: Document/Element/Text tree the transform works on
//! - `slug`: title → slug
//! - `registry`: unique identifiers per render or shared across renders
//! - `selector` / `matcher`: selector configuration and element matching
//! - `scan`: heading discovery in document order
//! - `tree`: nested list construction
//! - `options`: configuration and `data-toc-*` overrides
//! - `render`: list markup and HTML output
//! - `toc`: the `TableOfContents` transform
//! - `transform`: `Transform` trait and `Pipeline`
//!
//! ## Usage
//!
//! ```
//! use tola_toc::prelude::*;
//!
//! let doc = Document::new(
//!     Element::new("article")
//!         .child(Element::new("h1").text("Hello, World!"))
//!         .child(Element::new("h2").text("Details")),
//! );
//!
//! let doc = Pipeline::new(doc)
//!     .pipe(TableOfContents::new(TocOptions::default().with_anchors(false)))
//!     .into_inner();
//!
//! let html = render_document(&doc);
//! assert!(html.contains("<a href=\"#hello-world\" class=\"toc-link\">Hello, World!</a>"));
//! assert!(html.contains("<a href=\"#details\" class=\"toc-link\">Details</a>"));
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Node types: Document, Element, Node, Text
pub mod node;

/// Attribute types
pub mod attr;

/// Error types
pub mod error;

/// Slug generation
pub mod slug;

/// Identifier registry
pub mod registry;

/// Selector configuration
pub mod selector;

/// Element matchers
pub mod matcher;

/// Heading scan
pub mod scan;

/// List tree construction
pub mod tree;

/// Options and attribute overrides
pub mod options;

/// List markup and HTML rendering
pub mod render;

/// The table of contents transform
pub mod toc;

/// Document transforms and pipelines
pub mod transform;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Document, Element, Node, NodePath, Text};

// Transform
pub use toc::TableOfContents;
pub use transform::{Pipeline, Transform};

// Configuration
pub use options::{Nesting, ResolvedOptions, TocOptions};
pub use selector::{SelectorMap, SelectorSpec};

// Identifiers
pub use registry::{IdentifierRegistry, SharedRegistry};
pub use slug::{Slugifier, slugify};

// Output
pub use tree::{ItemContent, TocItem, TocList};

// Error types
pub use error::{TocError, TocResult};
