//! Error module
//!
//! Defines the custom error type using `thiserror` for the pokedex API.
//! This module provides a unified error type that wraps all possible error
//! sources and implements the `From` trait for automatic conversion from
//! underlying error types.

use thiserror::Error;

/// Message carried by [`PokedexError::RecordNotFound`].
pub const RECORD_NOT_FOUND_MESSAGE: &str = "Record could not be found";

/// The main error type for the pokedex API.
///
/// Two variants are recoverable conditions surfaced to API clients as a
/// 400-status envelope:
///
/// - `RecordInvalid`: validation failed; the message is the comma-joined
///   list of field errors.
/// - `RecordNotFound`: a lookup by name completed without a match.
///
/// Everything else (I/O failures, malformed CSV) is unexpected: the store
/// assumes the backing file exists, is well-formed, and has no concurrent
/// writer, so these are never retried and the API layer reports them as a
/// generic 500.
///
/// # Example
///
/// ```rust,ignore
/// use pokedex_api::error::PokedexError;
///
/// fn example() -> Result<(), PokedexError> {
///     // Errors from underlying types are automatically converted
///     let file = std::fs::File::open("nonexistent.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum PokedexError {
    /// A record failed validation.
    ///
    /// The message is the comma-joined list of accumulated field errors,
    /// e.g. `"name can not be blank,hp must be a number"`.
    #[error("{0}")]
    RecordInvalid(String),

    /// A lookup by name scanned the whole file without finding a match.
    /// Display matches [`RECORD_NOT_FOUND_MESSAGE`].
    #[error("Record could not be found")]
    RecordNotFound,

    /// CSV parsing or writing error.
    ///
    /// This occurs when the backing file is malformed or a row cannot be
    /// written, including parse errors from the `csv` crate.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General I/O error.
    ///
    /// This occurs for file system operations like opening, appending, or
    /// renaming the backing file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A row in the backing file does not match the expected schema.
    ///
    /// The store assumes the backing file is well-formed; this error is
    /// treated as fatal by callers, never retried.
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    /// Invalid command-line argument error.
    ///
    /// This occurs when CLI arguments are invalid (e.g. the backing file
    /// does not exist).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl PokedexError {
    /// True for the two recoverable conditions the API layer maps to a
    /// 400-status envelope; false for unexpected errors (500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PokedexError::RecordInvalid(_) | PokedexError::RecordNotFound
        )
    }
}
