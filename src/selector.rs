//! Selector/depth resolution.
//!
//! A selector specification maps matchers to nesting depths. It is written
//! either as one delimited string,
//!
//! ```text
//! h1$1; h2$2; .chapter > h3$3; aside h4
//! ```
//!
//! where an entry without a `$<depth>` suffix gets depth 1, or as an ordered
//! map (`{"h1": 1, "h2": "2"}`). Nothing here fails: empty entries are
//! dropped and unusable depths become 1.

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::sync::LazyLock;

/// Headings `h1`..`h6` at their natural depths.
pub const DEFAULT_SELECTORS: &str = "h1$1;h2$2;h3$3;h4$4;h5$5;h6$6;";

static DEPTH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([0-9]+)$").expect("static regex"));

// =============================================================================
// SelectorSpec
// =============================================================================

/// Selector configuration as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    /// `;`-separated `matcher$depth` entries
    Delimited(String),
    /// Matcher to depth, in declaration order
    Map(IndexMap<String, DepthValue>),
}

impl Default for SelectorSpec {
    fn default() -> Self {
        Self::Delimited(DEFAULT_SELECTORS.to_string())
    }
}

impl From<&str> for SelectorSpec {
    fn from(value: &str) -> Self {
        Self::Delimited(value.to_string())
    }
}

impl From<String> for SelectorSpec {
    fn from(value: String) -> Self {
        Self::Delimited(value)
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for SelectorSpec {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self::Map(
            iter.into_iter()
                .map(|(k, depth)| (k.into(), DepthValue::Number(i64::from(depth))))
                .collect(),
        )
    }
}

impl SelectorSpec {
    /// Resolve into a [`SelectorMap`].
    pub fn resolve(&self) -> SelectorMap {
        match self {
            Self::Delimited(text) => SelectorMap::parse(text),
            Self::Map(map) => {
                let mut resolved = SelectorMap::default();
                for (matcher, depth) in map {
                    resolved.insert(matcher, depth.coerce());
                }
                resolved
            }
        }
    }
}

// =============================================================================
// DepthValue
// =============================================================================

/// A depth as written in a structured selector map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DepthValue {
    Number(i64),
    Float(f64),
    Text(String),
}

impl DepthValue {
    /// Coerce to a positive depth; anything unusable becomes 1.
    pub fn coerce(&self) -> u32 {
        let parsed = match self {
            Self::Number(n) => Some(*n),
            Self::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(s) => leading_integer(s),
        };
        match parsed.and_then(|n| u32::try_from(n).ok()) {
            Some(depth) if depth > 0 => depth,
            _ => {
                log::debug!("depth {self:?} coerced to 1");
                1
            }
        }
    }
}

/// Parse an optionally signed integer prefix, ignoring leading whitespace
/// and any trailing garbage (`" 3px"` is 3).
pub(crate) fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

// =============================================================================
// SelectorMap
// =============================================================================

/// Ordered matcher → depth mapping.
///
/// Re-declaring a matcher replaces its depth but keeps the position of the
/// first declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorMap {
    entries: Vec<(String, u32)>,
    index: FxHashMap<String, usize>,
}

impl SelectorMap {
    /// Parse a `;`-delimited selector string.
    pub fn parse(text: &str) -> Self {
        let mut map = Self::default();
        for part in text.split(';').map(str::trim) {
            if part.is_empty() {
                continue;
            }
            let (matcher, depth) = match DEPTH_SUFFIX.captures(part) {
                Some(caps) => {
                    let depth = DepthValue::Text(caps[1].to_string()).coerce();
                    (part[..caps.get(0).map_or(part.len(), |m| m.start())].trim(), depth)
                }
                None => (part, 1),
            };
            map.insert(matcher, depth);
        }
        map
    }

    /// Insert or replace a matcher. Empty matchers are ignored.
    pub fn insert(&mut self, matcher: &str, depth: u32) {
        let matcher = matcher.trim();
        if matcher.is_empty() {
            log::warn!("dropping selector entry with empty matcher (depth {depth})");
            return;
        }
        let depth = depth.max(1);
        match self.index.get(matcher) {
            Some(&pos) => self.entries[pos].1 = depth,
            None => {
                self.index.insert(matcher.to_string(), self.entries.len());
                self.entries.push((matcher.to_string(), depth));
            }
        }
    }

    pub fn get(&self, matcher: &str) -> Option<u32> {
        self.index.get(matcher).map(|&pos| self.entries[pos].1)
    }

    /// Entries in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(m, d)| (m.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
