//! Domain errors.
//!
//! Only configuration-supplied patterns can fail in the domain layer.
//! Missing text and unmatched sections are never errors: they degrade to
//! empty sections and placeholder cells.

use thiserror::Error;

/// Errors raised while compiling an assembly plan.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A regex from the configuration failed to compile.
    #[error("invalid {what} pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Which pattern (marker, excerpt start, ...).
        what: &'static str,
        /// The offending pattern text.
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The section marker pattern cannot yield a number and a name.
    #[error("marker pattern `{0}` needs two capture groups (number, name)")]
    MarkerGroups(String),
}

impl AssemblyError {
    pub(crate) fn invalid(what: &'static str, pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            what,
            pattern: pattern.to_string(),
            source,
        }
    }
}
