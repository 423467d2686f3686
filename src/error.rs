//! Error Types Module
//!
//! Structured error types shared across the crate. Built on `thiserror` so
//! that upstream errors convert automatically and messages stay uniform.
//!
//! Only *fatal* conditions live here. Per-row and per-verse problems are
//! collected as [`crate::report::Diagnostic`] values and never abort a run.

use thiserror::Error;

/// Fatal error type for the whole `darstex` crate.
///
/// Errors of this type abort the stage they occur in. Row-level validation
/// problems and failed verse lookups are deliberately *not* represented here;
/// they degrade the output and are reported through
/// [`crate::report::RunReport`].
///
/// # Example
///
/// ```rust,no_run
/// use darstex::DarsTexError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<(), DarsTexError> {
///     let _file = File::open(path)?; // io::Error converts automatically
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum DarsTexError {
    /// I/O failure while reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook (ODS/XLSX) parsing failure from calamine.
    #[error("Failed to parse workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// Flat XML spreadsheet parsing failure from quick-xml.
    #[error("Failed to parse XML spreadsheet: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8 conversion failure while decoding input text.
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid pipeline configuration, detected at `build()` time.
    ///
    /// Examples: enrichment enabled without an API token, or an empty
    /// translation request set.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A malformed record or unsupported character reached the renderer.
    ///
    /// This indicates a normalizer defect upstream and is fatal by design:
    /// the produced markup could not compile without manual correction.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
