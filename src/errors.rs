/*!
 * Error types for the haml-i18n-extract application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting translations from a template
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The splicer could not locate the candidate text in the scanned region
    #[error("could not locate {candidate:?} within {line:?}")]
    StructuralMatchFailure {
        /// The full line that was scanned
        line: String,
        /// The candidate text that should have been found
        candidate: String,
    },

    /// The input template failed structural validation before any rewriting
    #[error("invalid syntax for haml {path:?}: {reason}")]
    InvalidSyntax {
        /// Path of the offending template
        path: PathBuf,
        /// What the structural check objected to
        reason: String,
    },

    /// The rewritten template failed structural validation
    #[error("rewritten haml for {path:?} is structurally invalid: {reason}")]
    PostRewriteSyntaxInvalid {
        /// Path of the template being rewritten
        path: PathBuf,
        /// What the structural check objected to
        reason: String,
    },

    /// A directory operation was requested on something that is not a directory
    #[error("not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// Error from a file operation
    #[error("file error: {0}")]
    File(String),
}

impl From<std::io::Error> for ExtractorError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
