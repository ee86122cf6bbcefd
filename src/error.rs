//! Error types.
//!
//! Invalid *data* never produces an error: every test returns `None` when
//! its input cannot support a result. [`Error`] is reserved for invalid
//! call shapes, such as an unrecognized method name handed through from
//! a command line.

use thiserror::Error;

/// Errors raised for invalid call shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Post-hoc method name not recognized.
    #[error("unknown post-hoc method '{0}' (expected 'tukey' or 'bonferroni')")]
    UnknownPostHocMethod(String),

    /// t-test kind not recognized.
    #[error("unknown t-test kind '{0}' (expected 'independent', 'paired' or 'one-sample')")]
    UnknownTTestKind(String),
}

/// Result alias for fallible call shapes.
pub type Result<T> = std::result::Result<T, Error>;
