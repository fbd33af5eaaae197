use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading data or using a tree.
#[derive(Debug, Error)]
pub enum Id3Error {
    /// The input file could not be opened or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The CSV reader failed on a record.
    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
    /// Reading from an already opened source failed.
    #[error("Failed to read input: {0}")]
    Read(#[from] std::io::Error),
    /// The input holds no non-blank line to use as a header.
    #[error("No header line found.")]
    MissingHeader,
    /// The header names no attribute besides `class`.
    #[error("The header must name at least one attribute.")]
    NoAttributes,
    #[error("Attribute `{0}` is declared more than once.")]
    DuplicateAttribute(String),
    #[error("Line {line}: expected {expected} values, found {found}.")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A token is not an integer, or is an integer other than 0 or 1.
    #[error("Line {line}: `{token}` is not a binary value.")]
    InvalidValue { line: usize, token: String },
    #[error("The training set holds no instances.")]
    EmptyDataset,
    #[error("Tree wasn't built yet.")]
    NotFitted,
    #[error("Expected {expected} attributes, the dataset has {found}.")]
    AttributeMismatch { expected: usize, found: usize },
    #[error("Predictions and labels are of different sizes ({expected} vs {found}).")]
    LengthMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Id3Error>;
