//! Table of contents configuration.
//!
//! Options come from three layers, later layers winning:
//!
//! 1. built-in defaults ([`TocOptions::default`])
//! 2. caller options (struct fields, builder methods or serde)
//! 3. `data-toc-*` attributes on the element the list is attached to,
//!    e.g. `data-toc-nesting-depth="2"` for `nestingDepth`
//!
//! [`TocOptions::resolve`] merges the layers and coerces every value. It
//! never fails: unusable values fall back to safe defaults.

use serde::Deserialize;

use crate::attr::{Attrs, AttrsExt};
use crate::scan::DocumentOrder;
use crate::selector::{SelectorMap, SelectorSpec};
use crate::slug::Slugifier;

/// Prefix of attribute overrides.
pub const DATA_PREFIX: &str = "data-toc-";

// =============================================================================
// TocOptions
// =============================================================================

/// Caller-supplied options. Every field is optional in serialized form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TocOptions {
    /// Selector for the subtree to scan; `None` or blank scans the document.
    pub content_target: Option<String>,
    /// Matcher to depth mapping.
    pub selectors: SelectorSpec,
    /// Negative: unlimited, 0: no nesting, positive: deepest nesting level.
    pub nesting_depth: i64,
    /// Maximum identifier length before suffixing, 0 or negative: unbounded.
    pub slug_length: i64,
    /// Append an anchor element to each heading.
    pub anchors: bool,
    /// Label of the heading anchors.
    pub anchor_text: String,
    /// Emit `<ol>` instead of `<ul>`.
    pub ordered_list: bool,
    /// How document-order keys are compared.
    pub document_order: DocumentOrder,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            content_target: None,
            selectors: SelectorSpec::default(),
            nesting_depth: -1,
            slug_length: 40,
            anchors: true,
            anchor_text: "#".to_string(),
            ordered_list: false,
            document_order: DocumentOrder::default(),
        }
    }
}

impl TocOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_target(mut self, target: impl Into<String>) -> Self {
        self.content_target = Some(target.into());
        self
    }

    pub fn with_selectors(mut self, selectors: impl Into<SelectorSpec>) -> Self {
        self.selectors = selectors.into();
        self
    }

    pub fn with_nesting_depth(mut self, depth: i64) -> Self {
        self.nesting_depth = depth;
        self
    }

    pub fn with_slug_length(mut self, length: i64) -> Self {
        self.slug_length = length;
        self
    }

    pub fn with_anchors(mut self, anchors: bool) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn with_anchor_text(mut self, text: impl Into<String>) -> Self {
        self.anchor_text = text.into();
        self
    }

    pub fn with_ordered_list(mut self, ordered: bool) -> Self {
        self.ordered_list = ordered;
        self
    }

    pub fn with_document_order(mut self, order: DocumentOrder) -> Self {
        self.document_order = order;
        self
    }

    /// Merge `data-toc-*` overrides from `attrs` and coerce all values.
    ///
    /// Attributes with an empty value are ignored.
    pub fn resolve(&self, attrs: &Attrs) -> ResolvedOptions {
        let lookup = |option: &str| {
            attrs
                .get_attr(&data_attr_name(option))
                .filter(|value| !value.is_empty())
        };

        let content_target = match lookup("contentTarget") {
            Some(value) => Some(value.to_string()),
            None => self.content_target.clone(),
        };
        let selectors = match lookup("selectors") {
            Some(value) => SelectorMap::parse(value),
            None => self.selectors.resolve(),
        };
        let nesting_depth = match lookup("nestingDepth") {
            Some(value) => parse_number(value).unwrap_or_else(|| {
                log::debug!("nesting depth {value:?} is not a number, nesting is disabled");
                0
            }),
            None => self.nesting_depth,
        };
        let slug_length = match lookup("slugLength") {
            Some(value) => parse_number(value).unwrap_or_else(|| {
                log::debug!("slug length {value:?} is not a number, slugs are unbounded");
                0
            }),
            None => self.slug_length,
        };

        ResolvedOptions {
            content_target,
            selectors,
            nesting: Nesting::from_depth(nesting_depth),
            slug_length: usize::try_from(slug_length).unwrap_or(0),
            anchors: lookup("anchors").map_or(self.anchors, parse_flag),
            anchor_text: lookup("anchorText").map_or_else(|| self.anchor_text.clone(), str::to_string),
            ordered_list: lookup("orderedList").map_or(self.ordered_list, parse_flag),
            document_order: lookup("documentOrder")
                .map_or(self.document_order, DocumentOrder::from_option),
        }
    }
}

/// Attribute carrying the override for `option` (`nestingDepth` →
/// `data-toc-nesting-depth`).
pub fn data_attr_name(option: &str) -> String {
    let mut kebab = String::with_capacity(option.len() + 4);
    for c in option.chars() {
        if c.is_ascii_uppercase() {
            kebab.push('-');
            kebab.push(c.to_ascii_lowercase());
        } else {
            kebab.push(c);
        }
    }
    format!("{DATA_PREFIX}{}", kebab.trim_matches('-'))
}

/// Lenient number parsing: integers, or decimals truncated toward zero.
fn parse_number(value: &str) -> Option<i64> {
    let value = value.trim();
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// `true`, `yes` and `1` (any case, surrounding whitespace ignored) are true.
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
}

// =============================================================================
// Nesting
// =============================================================================

/// Nesting ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    /// Nest as deep as the selector depths go
    Unlimited,
    /// Single flat list
    Disabled,
    /// Clamp increases beyond this depth
    Max(u32),
}

impl Nesting {
    /// Interpret a `nestingDepth` option value.
    pub fn from_depth(depth: i64) -> Self {
        match depth {
            d if d < 0 => Self::Unlimited,
            0 => Self::Disabled,
            d => Self::Max(u32::try_from(d).unwrap_or(u32::MAX)),
        }
    }

    /// Positive ceiling, if one is configured.
    pub fn ceiling(self) -> Option<u32> {
        match self {
            Self::Max(ceiling) => Some(ceiling),
            _ => None,
        }
    }
}

// =============================================================================
// ResolvedOptions
// =============================================================================

/// Fully merged and coerced options for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub content_target: Option<String>,
    pub selectors: SelectorMap,
    pub nesting: Nesting,
    /// 0 is unbounded
    pub slug_length: usize,
    pub anchors: bool,
    pub anchor_text: String,
    pub ordered_list: bool,
    pub document_order: DocumentOrder,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        TocOptions::default().resolve(&Attrs::new())
    }
}

impl ResolvedOptions {
    /// Slug generator honoring `slug_length`.
    pub fn slugifier(&self) -> Slugifier {
        Slugifier::new().with_max_len(self.slug_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attrs {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let resolved = ResolvedOptions::default();
        assert_eq!(resolved.content_target, None);
        assert_eq!(resolved.selectors.len(), 6);
        assert_eq!(resolved.nesting, Nesting::Unlimited);
        assert_eq!(resolved.slug_length, 40);
        assert!(resolved.anchors);
        assert_eq!(resolved.anchor_text, "#");
        assert!(!resolved.ordered_list);
        assert_eq!(resolved.document_order, DocumentOrder::Lexicographic);
    }

    #[test]
    fn test_data_attr_name() {
        assert_eq!(data_attr_name("nestingDepth"), "data-toc-nesting-depth");
        assert_eq!(data_attr_name("anchors"), "data-toc-anchors");
        assert_eq!(data_attr_name("contentTarget"), "data-toc-content-target");
        assert!(data_attr_name("documentOrder").starts_with(DATA_PREFIX));
    }

    #[test]
    fn test_attribute_overrides_win() {
        let options = TocOptions::new()
            .with_nesting_depth(3)
            .with_ordered_list(false)
            .with_anchor_text("¶");
        let resolved = options.resolve(&attrs(&[
            ("data-toc-nesting-depth", "1"),
            ("data-toc-ordered-list", " YES "),
            ("data-toc-selectors", "h2$1;h3$2"),
            ("data-toc-content-target", "article"),
            ("data-toc-document-order", "numeric"),
        ]));

        assert_eq!(resolved.nesting, Nesting::Max(1));
        assert!(resolved.ordered_list);
        assert_eq!(resolved.selectors.get("h2"), Some(1));
        assert_eq!(resolved.selectors.get("h1"), None);
        assert_eq!(resolved.content_target.as_deref(), Some("article"));
        assert_eq!(resolved.document_order, DocumentOrder::Numeric);
        // Not overridden
        assert_eq!(resolved.anchor_text, "¶");
    }

    #[test]
    fn test_empty_attribute_is_ignored() {
        let resolved = TocOptions::new()
            .with_slug_length(12)
            .resolve(&attrs(&[("data-toc-slug-length", "")]));
        assert_eq!(resolved.slug_length, 12);
    }

    #[test]
    fn test_number_coercion() {
        let resolved = TocOptions::new().resolve(&attrs(&[
            ("data-toc-nesting-depth", "lots"),
            ("data-toc-slug-length", "abc"),
        ]));
        assert_eq!(resolved.nesting, Nesting::Disabled);
        assert_eq!(resolved.slug_length, 0);

        let resolved = TocOptions::new().resolve(&attrs(&[
            ("data-toc-nesting-depth", " 0 "),
            ("data-toc-slug-length", "7.9"),
        ]));
        assert_eq!(resolved.nesting, Nesting::Disabled);
        assert_eq!(resolved.slug_length, 7);

        let resolved = TocOptions::new().with_slug_length(-5).resolve(&Attrs::new());
        assert_eq!(resolved.slug_length, 0);
    }

    #[test]
    fn test_flag_coercion() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag(" Yes"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag("on"));

        let resolved = TocOptions::new().resolve(&attrs(&[("data-toc-anchors", "false")]));
        assert!(!resolved.anchors);
    }

    #[test]
    fn test_nesting_from_depth() {
        assert_eq!(Nesting::from_depth(-1), Nesting::Unlimited);
        assert_eq!(Nesting::from_depth(-20), Nesting::Unlimited);
        assert_eq!(Nesting::from_depth(0), Nesting::Disabled);
        assert_eq!(Nesting::from_depth(2), Nesting::Max(2));
        assert_eq!(Nesting::Max(2).ceiling(), Some(2));
        assert_eq!(Nesting::Unlimited.ceiling(), None);
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: TocOptions = serde_json::from_str(
            r#"{"nestingDepth": 2, "selectors": {"h2": 1, "h3": "2"}, "documentOrder": "numeric"}"#,
        )
        .unwrap();
        assert_eq!(options.nesting_depth, 2);
        assert_eq!(options.slug_length, 40);
        assert_eq!(options.document_order, DocumentOrder::Numeric);

        let resolved = options.resolve(&Attrs::new());
        assert_eq!(resolved.selectors.get("h3"), Some(2));
        assert_eq!(resolved.slugifier().max_len(), 40);
    }
}
