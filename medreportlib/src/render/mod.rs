//! Per-format renderers: the final stage of the export pipeline.
//!
//! Four structurally parallel implementations of one contract,
//! `render(&ExportJob) -> Result<Vec<u8>>`:
//!
//! - **xlsx**: workbook with one sheet per table plus a summary sheet
//! - **pdf**: paginated document with striped tables and page footers
//! - **csv**: one flat text stream with labeled sections
//! - **docx**: word-processor document with real table objects
//!
//! The renderers share only the pure helpers below and the formatting and
//! assembly modules — by composition, never a common base type. A cell grid,
//! a flowed-text page, a line stream, and a document object model do not fit
//! one inheritance shape, so each module owns its layout logic outright.
//!
//! Every renderer handles the zero-table case by emitting a title-only
//! document rather than erroring.

pub mod csv;
pub mod docx;
pub mod pdf;
pub mod xlsx;

use crate::job::{DataTable, ExportJob, TableStats};

/// Display label for a table: `{department} - {classification}`.
pub(crate) fn table_label(table: &DataTable) -> String {
    format!("{} - {}", table.department, table.classification)
}

/// Generation timestamp shown in report headers.
pub(crate) fn generated_stamp(job: &ExportJob) -> String {
    job.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Label/value pairs for a statistics block, in display order. The
/// maintenance entry appears only when the counter is present.
pub(crate) fn stats_entries(stats: &TableStats) -> Vec<(String, String)> {
    let mut entries = vec![
        ("Total Items".to_string(), stats.total_items.to_string()),
        (
            "Low Stock Items".to_string(),
            stats.low_stock_items.to_string(),
        ),
        (
            "Out of Stock Items".to_string(),
            stats.out_of_stock_items.to_string(),
        ),
        ("Expired Items".to_string(), stats.expired_items.to_string()),
    ];
    if let Some(maintenance) = stats.maintenance_items {
        entries.push(("Under Maintenance".to_string(), maintenance.to_string()));
    }
    entries
}
