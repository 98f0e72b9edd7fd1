//! Error types for tola-toc.
//!
//! Configuration is never rejected: bad option values are coerced and bad
//! selector entries are dropped. Errors only cover matcher syntax (reported
//! per matcher, then skipped by the scanner) and structural misuse of the
//! document API.

use thiserror::Error;

use crate::node::NodePath;

/// Errors that can occur while generating a table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TocError {
    /// A matcher string could not be parsed into a node predicate
    #[error("invalid matcher `{matcher}`: {reason}")]
    InvalidMatcher {
        /// The matcher as written in the selector configuration
        matcher: String,
        /// What the parser choked on
        reason: String,
    },

    /// A node path does not address an element in the document
    #[error("no element at path {0}")]
    NodeNotFound(NodePath),
}

/// Result type alias for TOC operations.
pub type TocResult<T> = Result<T, TocError>;

impl TocError {
    /// Create an invalid matcher error with a reason.
    pub fn invalid_matcher(matcher: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMatcher {
            matcher: matcher.into(),
            reason: reason.into(),
        }
    }
}
