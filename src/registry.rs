//! Identifier registry: unique anchor ids for one page render.
//!
//! Every heading gets the slug of its title as identifier. When that slug
//! (with any trailing `-<number>` removed) was already handed out, the new
//! identifier is suffixed with one more than the highest numeral used so far
//! for that root:
//!
//! ```
//! use tola_toc::registry::IdentifierRegistry;
//! use tola_toc::slug::Slugifier;
//!
//! let mut registry = IdentifierRegistry::new();
//! let slugger = Slugifier::new();
//! assert_eq!(registry.assign("Hello, World!", &slugger), "hello-world");
//! assert_eq!(registry.assign("Hello, World!", &slugger), "hello-world-1");
//! assert_eq!(registry.assign("hello world", &slugger), "hello-world-2");
//! ```
//!
//! A registry lives as long as the caller keeps it. Renders that must not
//! collide with each other (several tables of contents on one page) share a
//! [`SharedRegistry`].

use std::sync::{Arc, LazyLock};

use compact_str::CompactString;
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;

use crate::slug::Slugifier;

/// Identifier used for an empty title.
pub const FALLBACK_ID: &str = "toc";

static NUMERAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-[0-9]+$").expect("static regex"));

// =============================================================================
// SlugRecord
// =============================================================================

/// A heading title and the identifier assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugRecord {
    pub title: String,
    pub identifier: CompactString,
}

// =============================================================================
// IdentifierRegistry
// =============================================================================

/// Append-only list of assigned identifiers.
#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    records: Vec<SlugRecord>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a unique identifier for `title` and record it.
    pub fn assign(&mut self, title: &str, slugifier: &Slugifier) -> CompactString {
        let slug = slugifier.slugify(title);
        let base = if title.is_empty() { FALLBACK_ID } else { slug.as_str() };
        let root = NUMERAL_SUFFIX.replace(base, "");

        let identifier = match self.highest_numeral(&root) {
            Some(numeral) => compact_str::format_compact!("{root}-{}", numeral.saturating_add(1)),
            None => CompactString::from(base),
        };

        log::trace!("assigned `{identifier}` to heading {title:?}");
        self.records.push(SlugRecord {
            title: title.to_string(),
            identifier: identifier.clone(),
        });
        identifier
    }

    /// Highest numeral among identifiers of the form `root` or `root-<n>`.
    ///
    /// A bare `root` counts as numeral 0. Comparison ignores ASCII case.
    fn highest_numeral(&self, root: &str) -> Option<u64> {
        self.records
            .iter()
            .filter_map(|record| numeral_for_root(&record.identifier, root))
            .max()
    }

    /// All records in assignment order.
    pub fn records(&self) -> &[SlugRecord] {
        &self.records
    }

    /// Check if `identifier` was already assigned.
    pub fn contains(&self, identifier: &str) -> bool {
        self.records.iter().any(|r| r.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forget every assignment.
    pub fn reset(&mut self) {
        self.records.clear();
    }
}

/// Match `identifier` against `^root(?:-(\d+))?$` case-insensitively.
fn numeral_for_root(identifier: &str, root: &str) -> Option<u64> {
    let head = identifier.get(..root.len())?;
    if !head.eq_ignore_ascii_case(root) {
        return None;
    }
    let rest = &identifier[root.len()..];
    if rest.is_empty() {
        return Some(0);
    }
    let digits = rest.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

// =============================================================================
// SharedRegistry
// =============================================================================

static GLOBAL: LazyLock<SharedRegistry> = LazyLock::new(SharedRegistry::new);

/// Thread-safe registry handle shared by several renders.
///
/// Uses `parking_lot::Mutex`; a render holds the lock for its whole run so
/// its identifiers are assigned without interleaving.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<IdentifierRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use and never reset
    /// implicitly.
    pub fn global() -> &'static SharedRegistry {
        &GLOBAL
    }

    /// Execute a closure with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut IdentifierRegistry) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn assign(&self, title: &str, slugifier: &Slugifier) -> CompactString {
        self.with(|r| r.assign(title, slugifier))
    }

    pub fn len(&self) -> usize {
        self.with(|r| r.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current records.
    pub fn snapshot(&self) -> Vec<SlugRecord> {
        self.with(|r| r.records().to_vec())
    }

    pub fn reset(&self) {
        self.with(|r| r.reset());
    }
}

// =============================================================================
// Tests
// =============================================================================
