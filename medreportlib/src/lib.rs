//! # medreportlib
//!
//! Multi-format report export engine for clinic inventory and chart data.
//! One [`ExportJob`] in — spreadsheet, PDF, CSV, or word-processor document
//! out, with equivalent content across all four formats.
//!
//! ## Overview
//!
//! The engine renders one or more tabular datasets (each tied to a
//! department/classification and a precomputed statistics summary) through a
//! shared column schema into format-specific layouts: sheets for xlsx,
//! pages for PDF, labeled sections for CSV, and document table objects for
//! docx.
//!
//! The data pipeline is:
//! 1. [`ExportJob`] — format, payload (table list or the legacy flat shape),
//!    schema, flags
//! 2. [`assemble`] — payload normalized into a canonical table list,
//!    aggregate statistics computed
//! 3. [`format`] — raw cell values turned into display strings and semantic
//!    status colors
//! 4. [`render`] — four parallel renderers, one per format
//! 5. [`export`] — dispatch and file save
//!
//! Statistics are trusted as given: the engine displays the caller's
//! counters and never cross-checks them against row counts, and multi-table
//! aggregation is purely additive.
//!
//! ## Example
//!
//! ```rust
//! use medreportlib::{render_job, ColumnSpec, DataTable, ExportFormat, ExportJob, TableStats};
//!
//! let table = DataTable {
//!     id: "medical_Medicines".to_string(),
//!     department: "medical".to_string(),
//!     classification: "Medicines".to_string(),
//!     data: Vec::new(),
//!     stats: TableStats::default(),
//! };
//! let job = ExportJob::new(
//!     ExportFormat::Csv,
//!     "Inventory Report",
//!     "inventory",
//!     vec![ColumnSpec::new("generic_name", "Generic Name")],
//! )
//! .tables(vec![table]);
//!
//! let artifact = render_job(&job).unwrap();
//! assert_eq!(artifact.filename, "inventory.csv");
//! ```

pub mod assemble;
pub mod error;
pub mod export;
pub mod format;
pub mod job;
pub mod render;
pub mod schema;

pub use assemble::{aggregate_stats, normalize};
pub use error::ReportError;
pub use export::{export_job, render_job, Artifact};
pub use format::{
    apply_column, format_date, format_date_time, format_quantity, humanize_status, status_color,
    stringify, StatusColor,
};
pub use job::{
    timestamped_filename, DataTable, ExportFormat, ExportJob, JobPayload, Row, TableStats,
};
pub use schema::{inventory_columns, ColumnSpec, Formatter, DEFAULT_COLUMN_WIDTH};

/// Application name shown in document headers and generator attributions.
pub const APP_NAME: &str = "MedReport";

/// Result type for medreportlib operations
pub type Result<T> = std::result::Result<T, ReportError>;
