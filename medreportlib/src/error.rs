//! Error types for medreportlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering or saving an export job
#[derive(Error, Debug)]
pub enum ReportError {
    /// The requested format string is not one of the supported formats
    #[error("unsupported export format: '{0}'")]
    UnsupportedFormat(String),

    /// The spreadsheet backend failed to build or serialize the workbook
    #[error("spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// The PDF backend failed to build or serialize the document
    #[error("pdf generation failed: {0}")]
    Pdf(String),

    /// The word-processor backend failed to build or serialize the document
    #[error("document generation failed: {0}")]
    Document(String),

    /// Failed to write the finished artifact to disk
    #[error("failed to write '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
