//! Export job data model.
//!
//! An [`ExportJob`] is the single input to the engine: a format, a payload of
//! one or more tables (or the legacy flat shape), a column schema, and a few
//! presentation flags. Jobs are constructed fresh per export action, consumed
//! by exactly one renderer invocation, and never persisted.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReportError;
use crate::schema::ColumnSpec;

/// One flat field-keyed record. Fields referenced by the schema may be
/// absent; absent and null both format as the empty string.
pub type Row = serde_json::Map<String, Value>;

/// Per-table summary counters, precomputed by the caller and trusted as
/// given. Display-only: the engine never cross-checks `total_items` against
/// the row count.
///
/// Serde names follow the camelCase convention of the upstream JSON
/// producers (`totalItems`, `lowStockItems`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableStats {
    pub total_items: u64,
    pub low_stock_items: u64,
    pub out_of_stock_items: u64,
    pub expired_items: u64,
    /// Only meaningful for equipment tables; missing counts as 0 when
    /// aggregating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_items: Option<u64>,
}

impl Add for TableStats {
    type Output = TableStats;

    fn add(self, other: TableStats) -> TableStats {
        TableStats {
            total_items: self.total_items + other.total_items,
            low_stock_items: self.low_stock_items + other.low_stock_items,
            out_of_stock_items: self.out_of_stock_items + other.out_of_stock_items,
            expired_items: self.expired_items + other.expired_items,
            maintenance_items: match (self.maintenance_items, other.maintenance_items) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(0) + b.unwrap_or(0)),
            },
        }
    }
}

impl AddAssign for TableStats {
    fn add_assign(&mut self, other: TableStats) {
        *self = *self + other;
    }
}

/// One named dataset within an export job: a department/classification pair,
/// an ordered row sequence, and its precomputed statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    pub id: String,
    pub department: String,
    pub classification: String,
    /// Row order is significant and preserved in every output format.
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default)]
    pub stats: TableStats,
}

/// Target output format of an export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Pdf,
    Csv,
    Docx,
}

impl ExportFormat {
    /// All supported formats, in dispatch order.
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Xlsx,
        ExportFormat::Pdf,
        ExportFormat::Csv,
        ExportFormat::Docx,
    ];

    /// File extension appended to the job's base filename.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
            ExportFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    /// Accepts the canonical names plus the aliases the web UI historically
    /// used. Anything else is a caller error and fails fast.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" | "excel" | "spreadsheet" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            "csv" => Ok(ExportFormat::Csv),
            "docx" | "word" | "document" => Ok(ExportFormat::Docx),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Job payload: either the canonical table list or the legacy flat shape.
///
/// The duality exists only at this boundary. The assembler resolves it into
/// a plain table list once, so no renderer ever branches on which shape it
/// received.
#[derive(Debug, Clone)]
pub enum JobPayload {
    /// Canonical shape: zero or more named tables.
    Tables(Vec<DataTable>),
    /// Legacy single-dataset shape, normalized into one synthesized table.
    Legacy {
        data: Vec<Row>,
        department: String,
        classification: String,
        stats: Option<TableStats>,
    },
}

impl Default for JobPayload {
    fn default() -> Self {
        JobPayload::Tables(Vec::new())
    }
}

/// One export request: format, payload, schema, and presentation flags.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub format: ExportFormat,
    /// Human-readable report title.
    pub title: String,
    /// Base filename; the renderer appends the format extension.
    pub filename: String,
    /// Column schema shared by every table in the job.
    pub columns: Vec<ColumnSpec>,
    pub payload: JobPayload,
    /// Emit per-table (and, for multi-table jobs, aggregate) statistics
    /// blocks.
    pub include_stats: bool,
    /// Stamped at construction; injectable for deterministic tests.
    pub generated_at: DateTime<Local>,
}

impl ExportJob {
    pub fn new(
        format: ExportFormat,
        title: impl Into<String>,
        filename: impl Into<String>,
        columns: Vec<ColumnSpec>,
    ) -> Self {
        ExportJob {
            format,
            title: title.into(),
            filename: filename.into(),
            columns,
            payload: JobPayload::default(),
            include_stats: false,
            generated_at: Local::now(),
        }
    }

    /// Builder: set the canonical table payload
    pub fn tables(mut self, tables: Vec<DataTable>) -> Self {
        self.payload = JobPayload::Tables(tables);
        self
    }

    /// Builder: set the legacy flat payload
    pub fn legacy(
        mut self,
        data: Vec<Row>,
        department: impl Into<String>,
        classification: impl Into<String>,
        stats: Option<TableStats>,
    ) -> Self {
        self.payload = JobPayload::Legacy {
            data,
            department: department.into(),
            classification: classification.into(),
            stats,
        };
        self
    }

    /// Builder: toggle statistics blocks
    pub fn include_stats(mut self, include: bool) -> Self {
        self.include_stats = include;
        self
    }

    /// Builder: override the generation timestamp
    pub fn generated_at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

/// Build a timestamped base filename: `{prefix}_{RFC3339 stamp}` with the
/// colons and dots of the stamp replaced by dashes so the name is safe on
/// every filesystem.
pub fn timestamped_filename(prefix: &str, now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-")
        .replace('.', "-");
    format!("{prefix}_{stamp}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!(
            "spreadsheet".parse::<ExportFormat>().unwrap(),
            ExportFormat::Xlsx
        );
        assert_eq!(
            "document".parse::<ExportFormat>().unwrap(),
            ExportFormat::Docx
        );
    }

    #[test]
    fn test_unsupported_format_is_named_in_error() {
        let err = "xml".parse::<ExportFormat>().unwrap_err();
        assert!(err.to_string().contains("xml"));
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn test_stats_addition() {
        let a = TableStats {
            total_items: 10,
            low_stock_items: 2,
            out_of_stock_items: 1,
            expired_items: 0,
            maintenance_items: None,
        };
        let b = TableStats {
            total_items: 5,
            low_stock_items: 0,
            out_of_stock_items: 3,
            expired_items: 2,
            maintenance_items: Some(4),
        };
        let sum = a + b;
        assert_eq!(sum.total_items, 15);
        assert_eq!(sum.low_stock_items, 2);
        assert_eq!(sum.out_of_stock_items, 4);
        assert_eq!(sum.expired_items, 2);
        // Missing maintenance counts as 0, presence is preserved
        assert_eq!(sum.maintenance_items, Some(4));
        assert_eq!((a + a).maintenance_items, None);
    }

    #[test]
    fn test_stats_camel_case_serde() {
        let json = r#"{"totalItems":3,"lowStockItems":1,"outOfStockItems":0,"expiredItems":2}"#;
        let stats: TableStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.expired_items, 2);
        assert_eq!(stats.maintenance_items, None);
    }

    #[test]
    fn test_timestamped_filename_has_no_reserved_chars() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 5).unwrap();
        let name = timestamped_filename("inventory_report", now);
        assert!(name.starts_with("inventory_report_2026-03-01"));
        assert!(!name.contains(':'));
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_job_builder() {
        let job = ExportJob::new(ExportFormat::Csv, "Report", "report", Vec::new())
            .include_stats(true);
        assert!(job.include_stats);
        assert!(matches!(&job.payload, JobPayload::Tables(t) if t.is_empty()));
    }
}
