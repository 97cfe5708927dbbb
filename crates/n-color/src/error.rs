//! Error conditions raised by the palette core.
//!
//! Both are local and recoverable. The shell turns them into toasts; the
//! command line turns them into an exit code.

use thiserror::Error;

/// Failure of a core color operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The base color is not `#` followed by exactly six hex digits.
    #[error("invalid color format: {input:?} (expected #rrggbb)")]
    InvalidColorFormat {
        /// The rejected input, verbatim.
        input: String,
    },

    /// Export was requested before any palette was generated.
    #[error("no colors generated")]
    EmptyPalette,
}

impl ColorError {
    pub(crate) fn invalid(input: &str) -> Self {
        Self::InvalidColorFormat {
            input: input.to_owned(),
        }
    }
}
