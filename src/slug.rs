//! Slug generation for heading identifiers.
//!
//! Text is NFD-decomposed so accented letters keep their base letter, then
//! reduced to `[a-z0-9]` words joined by a separator:
//!
//! ```
//! use tola_toc::slug::{slugify, Slugifier};
//!
//! assert_eq!(slugify("Hello, World!"), "hello-world");
//! assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
//! assert_eq!(Slugifier::new().with_max_len(5).slugify("Hello World"), "hello");
//! ```

use unicode_normalization::UnicodeNormalization;

/// Separator placed between words.
pub const DEFAULT_SEPARATOR: char = '-';

/// Combining Diacritical Marks block, left behind by NFD decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Configurable slug generator.
///
/// `max_len == 0` means unbounded. Truncation is a hard cut on characters,
/// it does not look for word boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slugifier {
    separator: char,
    max_len: usize,
}

impl Default for Slugifier {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            max_len: 0,
        }
    }
}

impl Slugifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `separator` between words instead of `-`.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Cut slugs to at most `max_len` characters (0 = unbounded).
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Convert `text` into a slug. May return an empty string.
    pub fn slugify(&self, text: &str) -> String {
        let folded: String = text
            .nfd()
            .filter(|c| !COMBINING_MARKS.contains(c))
            .collect::<String>()
            .to_lowercase();

        let mut slug = String::with_capacity(folded.len());
        // Spaces survive filtering; every other char outside [a-z0-9] is
        // dropped before whitespace runs are collapsed.
        let mut pending_space = false;
        for c in folded.trim().chars() {
            match c {
                'a'..='z' | '0'..='9' => {
                    if pending_space {
                        slug.push(self.separator);
                        pending_space = false;
                    }
                    slug.push(c);
                }
                ' ' => pending_space = true,
                _ => {}
            }
        }
        if pending_space {
            slug.push(self.separator);
        }

        if self.max_len > 0
            && let Some((cut, _)) = slug.char_indices().nth(self.max_len)
        {
            slug.truncate(cut);
        }

        slug
    }
}

/// Slugify with the default separator and no length limit.
pub fn slugify(text: &str) -> String {
    Slugifier::default().slugify(text)
}
