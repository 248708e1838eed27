//! Error types for registry scanning, population loading and export.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FantoirError>;

/// Errors raised while scanning, joining or exporting.
///
/// Every variant names the file involved, and the line or row where one
/// applies, so a failure can be checked against the fixed column layout.
#[derive(Debug, Error)]
pub enum FantoirError {
    #[error("cannot open {what} file '{}': {source}", path.display())]
    InputNotFound {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: line {line}: read failed: {source}", path.display())]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("{}: line {line}: not valid ASCII text", path.display())]
    Decode { path: PathBuf, line: usize },

    #[error(
        "{}: row {row}: expected at least 5 ';'-separated fields, found {found}",
        path.display()
    )]
    PopulationParse {
        path: PathBuf,
        row: usize,
        found: usize,
    },

    #[error("{}: malformed CSV framing: {source}", path.display())]
    PopulationCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write CSV to '{}': {source}", path.display())]
    OutputCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
