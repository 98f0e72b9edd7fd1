//! The table of contents transform.
//!
//! One invocation:
//!
//! 1. reads `data-toc-*` overrides from the context element and resolves
//!    the options
//! 2. scans the content target for headings ([`scan`])
//! 3. assigns every heading a unique identifier from the registry
//! 4. builds the nested list ([`TreeBuilder`])
//! 5. appends an anchor to each heading (when enabled) and the list to the
//!    context element
//!
//! ```
//! use tola_toc::node::{Document, Element, NodePath};
//! use tola_toc::options::TocOptions;
//! use tola_toc::render::render_element;
//! use tola_toc::toc::TableOfContents;
//!
//! let mut doc = Document::new(
//!     Element::new("body")
//!         .child(Element::new("nav"))
//!         .child(Element::new("h1").text("Hello, World!")),
//! );
//! let mut toc = TableOfContents::new(TocOptions::default().with_anchors(false))
//!     .with_context(NodePath::from_slice(&[0]));
//! let list = toc.apply(&mut doc).unwrap();
//!
//! assert_eq!(list.len(), 1);
//! assert_eq!(
//!     render_element(doc.root.first_child().unwrap()),
//!     "<nav><ul class=\"toc-list\"><li class=\"toc-item\">\
//!      <a href=\"#hello-world\" class=\"toc-link\">Hello, World!</a></li></ul></nav>"
//! );
//! ```

use compact_str::CompactString;

use crate::error::{TocError, TocResult};
use crate::node::{Document, NodePath};
use crate::options::{ResolvedOptions, TocOptions};
use crate::registry::{IdentifierRegistry, SharedRegistry, SlugRecord};
use crate::render::{anchor_element, list_element};
use crate::scan::{DocumentSource, HeadingSource, scan};
use crate::transform::Transform;
use crate::tree::{ItemContent, TocList, TreeBuilder};

// =============================================================================
// Registry handle
// =============================================================================

#[derive(Debug, Clone)]
enum Registry {
    Owned(IdentifierRegistry),
    Shared(SharedRegistry),
}

impl Registry {
    /// Run `f` with exclusive access; a shared registry stays locked for
    /// the whole call.
    fn with<R>(&mut self, f: impl FnOnce(&mut IdentifierRegistry) -> R) -> R {
        match self {
            Self::Owned(registry) => f(registry),
            Self::Shared(shared) => shared.with(f),
        }
    }
}

// =============================================================================
// Generated output
// =============================================================================

/// Identifier assigned to one heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor<H> {
    pub handle: H,
    pub identifier: CompactString,
    pub title: String,
}

/// Result of [`TableOfContents::generate`]: the list tree and the anchors
/// the caller should attach to the headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated<H> {
    pub list: TocList,
    pub anchors: Vec<Anchor<H>>,
}

// =============================================================================
// TableOfContents
// =============================================================================

/// Table of contents generator for a [`Document`].
///
/// Owns a fresh [`IdentifierRegistry`] unless given a [`SharedRegistry`]
/// with [`with_registry`](Self::with_registry). The registry is kept between
/// calls, so applying the same instance twice never reuses an identifier.
#[derive(Debug, Clone)]
pub struct TableOfContents {
    options: TocOptions,
    context: NodePath,
    registry: Registry,
}

impl TableOfContents {
    /// Generator attached to the document root.
    pub fn new(options: TocOptions) -> Self {
        Self {
            options,
            context: NodePath::root(),
            registry: Registry::Owned(IdentifierRegistry::new()),
        }
    }

    /// Element that receives the list and supplies `data-toc-*` overrides.
    pub fn with_context(mut self, context: NodePath) -> Self {
        self.context = context;
        self
    }

    /// Share identifiers with other generators on the same page.
    pub fn with_registry(mut self, registry: SharedRegistry) -> Self {
        self.registry = Registry::Shared(registry);
        self
    }

    pub fn options(&self) -> &TocOptions {
        &self.options
    }

    pub fn context(&self) -> &NodePath {
        &self.context
    }

    /// Identifiers assigned so far, in assignment order.
    pub fn identifiers(&self) -> Vec<SlugRecord> {
        match &self.registry {
            Registry::Owned(registry) => registry.records().to_vec(),
            Registry::Shared(shared) => shared.snapshot(),
        }
    }

    /// Scan `source` and build the list without touching any document.
    pub fn generate<S: HeadingSource>(
        &mut self,
        source: &S,
        resolved: &ResolvedOptions,
    ) -> Generated<S::Handle> {
        let headings = scan(source, &resolved.selectors, resolved.document_order);
        log::debug!("found {} heading(s)", headings.len());

        let slugifier = resolved.slugifier();
        let mut builder = TreeBuilder::new(resolved.nesting, resolved.ordered_list);
        let mut anchors = Vec::with_capacity(headings.len());

        self.registry.with(|registry| {
            for heading in headings {
                let identifier = registry.assign(&heading.title, &slugifier);
                log::trace!(
                    "heading at {} (depth {}) -> #{identifier}",
                    heading.key,
                    heading.depth
                );
                builder.push(
                    heading.depth,
                    ItemContent::link(heading.title.as_str(), format!("#{identifier}")),
                );
                anchors.push(Anchor {
                    handle: heading.handle,
                    identifier,
                    title: heading.title,
                });
            }
        });

        Generated {
            list: builder.finish(),
            anchors,
        }
    }

    /// Generate the table of contents for `doc` and attach it.
    ///
    /// Fails with [`TocError::NodeNotFound`] when the context path does not
    /// address an element of `doc`; the document is left untouched then.
    pub fn apply(&mut self, doc: &mut Document) -> TocResult<TocList> {
        let context = doc
            .element_at(&self.context)
            .ok_or_else(|| TocError::NodeNotFound(self.context.clone()))?;
        let resolved = self.options.resolve(&context.attrs);

        let generated = {
            let source = DocumentSource::from_target(doc, resolved.content_target.as_deref());
            self.generate(&source, &resolved)
        };

        // Appending only adds trailing children, so collected paths stay valid.
        if resolved.anchors {
            for anchor in &generated.anchors {
                if let Some(heading) = doc.element_at_mut(&anchor.handle) {
                    heading.push_elem(anchor_element(&anchor.identifier, &resolved.anchor_text));
                }
            }
        }

        let list = list_element(&generated.list);
        doc.element_at_mut(&self.context)
            .ok_or_else(|| TocError::NodeNotFound(self.context.clone()))?
            .push_elem(list);

        Ok(generated.list)
    }
}

impl Transform for TableOfContents {
    fn transform(mut self, doc: Document) -> Document {
        (&mut self).transform(doc)
    }
}

impl Transform for &mut TableOfContents {
    fn transform(self, mut doc: Document) -> Document {
        if let Err(err) = self.apply(&mut doc) {
            log::warn!("table of contents skipped: {err}");
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Element;
    use crate::render::render_element;
    use crate::scan::DomPath;

    static_assertions::assert_impl_all!(TableOfContents: Send, Sync);

    /// Headings given as (title, depth) pairs; matchers are ignored.
    struct Fixed(Vec<(&'static str, u32)>);

    impl HeadingSource for Fixed {
        type Handle = usize;

        fn find_all(&self, matcher: &str) -> TocResult<Vec<(DomPath, usize)>> {
            let depth: u32 = matcher.trim_start_matches('h').parse().unwrap_or(0);
            Ok(self
                .0
                .iter()
                .enumerate()
                .filter(|(_, (_, d))| *d == depth)
                .map(|(i, _)| (DomPath::from_slice(&[0, i]), i))
                .collect())
        }

        fn text_of(&self, handle: &usize) -> String {
            self.0[*handle].0.to_string()
        }
    }

    fn article(headings: &[(&str, &str)]) -> Document {
        let mut root = Element::new("article");
        for (tag, title) in headings {
            root.push_elem(Element::new(*tag).text(*title));
        }
        Document::new(root)
    }

    #[test]
    fn test_generate_from_custom_source() {
        let source = Fixed(vec![("Intro", 1), ("Intro", 2), ("", 1)]);
        let mut toc = TableOfContents::new(TocOptions::default());
        let generated = toc.generate(&source, &ResolvedOptions::default());

        let ids: Vec<_> = generated.anchors.iter().map(|a| a.identifier.as_str()).collect();
        assert_eq!(ids, ["intro", "intro-1", "toc"]);
        assert_eq!(generated.list.len(), 2);
        assert_eq!(toc.identifiers().len(), 3);
    }

    #[test]
    fn test_apply_appends_list_and_anchors() {
        let mut doc = article(&[("h1", "Intro"), ("h2", "Details")]);
        let mut toc = TableOfContents::new(TocOptions::default());
        let list = toc.apply(&mut doc).unwrap();

        assert_eq!(list.levels(), 2);
        assert_eq!(doc.root.len(), 3);
        assert_eq!(
            render_element(doc.root.children_elements().next().unwrap()),
            "<h1>Intro<a class=\"toc-anchor\" href=\"#intro\" id=\"intro\">#</a></h1>"
        );
        assert_eq!(doc.root.children_elements().last().unwrap().tag, "ul");
    }

    #[test]
    fn test_missing_context_is_error() {
        let mut doc = article(&[("h1", "Intro")]);
        let before = doc.clone();
        let mut toc = TableOfContents::new(TocOptions::default()).with_context(NodePath::from_slice(&[7]));

        let err = toc.apply(&mut doc).unwrap_err();
        assert_eq!(err, TocError::NodeNotFound(NodePath::from_slice(&[7])));
        assert_eq!(doc, before);
        assert!(toc.identifiers().is_empty());
    }

    #[test]
    fn test_transform_leaves_document_on_error() {
        let doc = article(&[("h1", "Intro")]);
        let toc = TableOfContents::new(TocOptions::default()).with_context(NodePath::from_slice(&[9]));
        assert_eq!(toc.transform(doc.clone()), doc);
    }

    #[test]
    fn test_reapplying_keeps_identifiers_unique() {
        let mut toc = TableOfContents::new(TocOptions::default().with_anchors(false));
        let mut first = article(&[("h1", "Intro")]);
        let mut second = article(&[("h1", "Intro")]);
        toc.apply(&mut first).unwrap();
        let list = toc.apply(&mut second).unwrap();

        assert_eq!(list.items[0].content, ItemContent::link("Intro", "#intro-1"));
    }
}
