/*!
 * Error types for the qasplit application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. Structural problems
 * found while segmenting a document are not errors; they are reported as
 * `SegmentationWarning` values instead.
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::segmentation::patterns::MarkerKind;

/// Errors raised while compiling a pattern table.
///
/// These are configuration errors: they surface before any line is classified.
#[derive(Error, Debug)]
pub enum PatternError {
    /// The table does not contain a single rule
    #[error("Pattern table is empty")]
    EmptyTable,

    /// A rule's regular expression failed to compile
    #[error("Invalid {kind} pattern '{pattern}': {source}")]
    InvalidRegex {
        /// Marker family the rule belongs to
        kind: MarkerKind,
        /// Offending expression
        pattern: String,
        /// Compiler diagnostic
        #[source]
        source: regex::Error,
    },

    /// A rule was tagged with a family that cannot be configured
    #[error("Pattern '{pattern}' uses unsupported marker kind '{kind}'")]
    UnsupportedKind {
        /// Marker family the rule was tagged with
        kind: MarkerKind,
        /// Offending expression
        pattern: String,
    },

    /// A rule would recognize a blank line as a marker
    #[error("{kind} pattern '{pattern}' matches a blank line")]
    MatchesBlankLine {
        /// Marker family the rule belongs to
        kind: MarkerKind,
        /// Offending expression
        pattern: String,
    },
}

/// Errors that can occur while loading OCR output
#[derive(Error, Debug)]
pub enum InputError {
    /// The input path does not exist
    #[error("Input not found: {0}")]
    NotFound(PathBuf),

    /// The input exists but is neither a page directory, a text file nor a JSON file
    #[error("Unsupported input: {0}")]
    Unsupported(PathBuf),

    /// A page file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON page list could not be parsed
    #[error("Failed to parse page list {path}: {message}")]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },

    /// The input yielded no pages at all
    #[error("No OCR pages found in {0}")]
    NoPages(PathBuf),
}
