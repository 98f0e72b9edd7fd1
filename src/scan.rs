//! Document scanning: matched headings in document order.
//!
//! The scanner only needs a [`HeadingSource`], a capability that can list
//! the nodes matching a selector together with their document-order key
//! and report a node's text. [`DocumentSource`] implements it for the
//! crate's own [`Document`] tree; tests and other hosts can supply
//! synthetic sources.
//!
//! # Ordering
//!
//! Matches from all selectors are merged and sorted by their [`DomPath`].
//! [`DocumentOrder::Lexicographic`] compares the dotted key strings
//! (`"0.2"` sorts after `"0.10"`), which is the historical behavior and
//! misorders siblings past index 9. [`DocumentOrder::Numeric`] compares the
//! index paths and always yields true document order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashSet;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::error::TocResult;
use crate::matcher::Matcher;
use crate::node::{Document, Element, NodePath};
use crate::selector::SelectorMap;

// =============================================================================
// DomPath
// =============================================================================

/// Document-order key: element-sibling index of every ancestor from the
/// document root down to the node itself. Text nodes are not counted.
///
/// Displays as the dotted key, e.g. `0.2.0.3`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomPath(SmallVec<[usize; 8]>);

impl DomPath {
    pub fn from_slice(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Compare two keys under `order`.
    pub fn compare(&self, other: &Self, order: DocumentOrder) -> Ordering {
        match order {
            DocumentOrder::Numeric => self.cmp(other),
            DocumentOrder::Lexicographic => self.to_string().cmp(&other.to_string()),
        }
    }

    fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for DomPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// How document-order keys are compared when merging matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentOrder {
    /// Compare dotted key strings
    #[default]
    Lexicographic,
    /// Compare index paths component-wise
    Numeric,
}

impl DocumentOrder {
    /// Parse an option value; unknown values keep the default.
    pub fn from_option(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "numeric" => Self::Numeric,
            _ => Self::Lexicographic,
        }
    }
}

// =============================================================================
// HeadingSource
// =============================================================================

/// Capability needed by the scanner: find matching nodes, read their text.
pub trait HeadingSource {
    /// Opaque reference to a matched node.
    type Handle: Clone + Eq + Hash;

    /// All nodes matching `matcher`, each with its document-order key.
    fn find_all(&self, matcher: &str) -> TocResult<Vec<(DomPath, Self::Handle)>>;

    /// Display text of a node.
    fn text_of(&self, handle: &Self::Handle) -> String;
}

/// A matched heading ready for identifier assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingItem<H> {
    pub key: DomPath,
    pub handle: H,
    pub title: String,
    pub depth: u32,
}

/// Collect headings for every selector and sort them into document order.
///
/// A node matched by several selectors keeps the depth of the first one in
/// resolution order. Selectors the source cannot evaluate are skipped.
pub fn scan<S: HeadingSource>(
    source: &S,
    selectors: &SelectorMap,
    order: DocumentOrder,
) -> Vec<HeadingItem<S::Handle>> {
    let mut seen: FxHashSet<S::Handle> = FxHashSet::default();
    let mut found: Vec<(DomPath, S::Handle, u32)> = Vec::new();

    for (matcher, depth) in selectors.iter() {
        let matches = match source.find_all(matcher) {
            Ok(matches) => matches,
            Err(err) => {
                log::warn!("skipping selector: {err}");
                continue;
            }
        };
        log::debug!("selector `{matcher}` (depth {depth}) matched {} node(s)", matches.len());
        for (key, handle) in matches {
            if seen.insert(handle.clone()) {
                found.push((key, handle, depth));
            }
        }
    }

    match order {
        DocumentOrder::Numeric => found.sort_by(|a, b| a.0.cmp(&b.0)),
        DocumentOrder::Lexicographic => found.sort_by_cached_key(|entry| entry.0.to_string()),
    }

    found
        .into_iter()
        .map(|(key, handle, depth)| {
            let title = source.text_of(&handle);
            HeadingItem { key, handle, title, depth }
        })
        .collect()
}

// =============================================================================
// DocumentSource
// =============================================================================

/// [`HeadingSource`] over a [`Document`], limited to the descendants of one
/// or more scope elements.
#[derive(Debug, Clone)]
pub struct DocumentSource<'a> {
    doc: &'a Document,
    scopes: Vec<NodePath>,
}

impl<'a> DocumentSource<'a> {
    /// Scan the whole document.
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            scopes: vec![NodePath::root()],
        }
    }

    /// Scan below the given scope elements.
    pub fn scoped(doc: &'a Document, scopes: Vec<NodePath>) -> Self {
        Self { doc, scopes }
    }

    /// Scope to every element matching `target`, or the whole document when
    /// `target` is missing or blank.
    ///
    /// An unparseable target falls back to the whole document. A target
    /// that matches nothing yields an empty scope.
    pub fn from_target(doc: &'a Document, target: Option<&str>) -> Self {
        let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::new(doc);
        };
        let matcher = match Matcher::parse(target) {
            Ok(matcher) => matcher,
            Err(err) => {
                log::warn!("content target ignored, scanning whole document: {err}");
                return Self::new(doc);
            }
        };

        let mut scopes: Vec<NodePath> = Vec::new();
        walk_document(doc, |elem, ancestors, path, _| {
            if matcher.matches(elem, ancestors) && !scopes.iter().any(|s| path.is_inside(s)) {
                scopes.push(path.clone());
            }
        });
        if scopes.is_empty() {
            log::debug!("content target `{target}` matched no element");
        }
        Self { doc, scopes }
    }

    pub fn scopes(&self) -> &[NodePath] {
        &self.scopes
    }

    fn in_scope(&self, path: &NodePath) -> bool {
        self.scopes.iter().any(|scope| path.is_inside(scope))
    }
}

impl HeadingSource for DocumentSource<'_> {
    type Handle = NodePath;

    fn find_all(&self, matcher: &str) -> TocResult<Vec<(DomPath, NodePath)>> {
        let matcher = Matcher::parse(matcher)?;
        let mut matches = Vec::new();
        walk_document(self.doc, |elem, ancestors, path, key| {
            if self.in_scope(path) && matcher.matches(elem, ancestors) {
                matches.push((key.clone(), path.clone()));
            }
        });
        Ok(matches)
    }

    fn text_of(&self, handle: &NodePath) -> String {
        self.doc
            .element_at(handle)
            .map(Element::text_content)
            .unwrap_or_default()
    }
}

/// Depth-first walk handing each element its ancestors (root first), its
/// [`NodePath`] and its [`DomPath`].
pub(crate) fn walk_document<'d, F>(doc: &'d Document, mut visit: F)
where
    F: FnMut(&'d Element, &[&'d Element], &NodePath, &DomPath),
{
    let mut ancestors = Vec::new();
    let mut path = NodePath::root();
    // The root element is the first (and only) child of the document.
    let mut key = DomPath::from_slice(&[0]);
    walk_element(&doc.root, &mut ancestors, &mut path, &mut key, &mut visit);
}

fn walk_element<'d, F>(
    elem: &'d Element,
    ancestors: &mut Vec<&'d Element>,
    path: &mut NodePath,
    key: &mut DomPath,
    visit: &mut F,
) where
    F: FnMut(&'d Element, &[&'d Element], &NodePath, &DomPath),
{
    visit(elem, ancestors, path, key);

    ancestors.push(elem);
    let mut element_index = 0;
    for (index, child) in elem.children.iter().enumerate() {
        if let Some(child_elem) = child.as_element() {
            path.push(index);
            key.push(element_index);
            walk_element(child_elem, ancestors, path, key, visit);
            key.pop();
            path.pop();
            element_index += 1;
        }
    }
    ancestors.pop();
}
