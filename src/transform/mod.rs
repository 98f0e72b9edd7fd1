//! Document transforms.
//!
//! - `Transform` - one step that takes a document and returns it changed
//! - `Pipeline` - fluent chaining of steps
//!
//! [`TableOfContents`](crate::toc::TableOfContents) is the transform this
//! crate provides. A `&mut TableOfContents` is one too, so an instance can
//! be piped into several documents and keep its identifiers.
//!
//! ```
//! use tola_toc::node::{Document, Element};
//! use tola_toc::options::TocOptions;
//! use tola_toc::toc::TableOfContents;
//! use tola_toc::transform::Pipeline;
//!
//! let mut toc = TableOfContents::new(TocOptions::default().with_anchors(false));
//! let page = || Document::new(Element::new("body").child(Element::new("h1").text("Intro")));
//!
//! Pipeline::new(page()).pipe(&mut toc).into_inner();
//! Pipeline::new(page()).pipe(&mut toc).into_inner();
//! assert_eq!(toc.identifiers()[1].identifier, "intro-1");
//! ```

mod core;
mod pipeline;

pub use core::Transform;
pub use pipeline::Pipeline;
