//! Table assembly: resolve a job payload into the canonical table list.
//!
//! This is the stage between the job boundary and the renderers. It has two
//! responsibilities:
//!
//! - **normalize**: collapse the legacy/canonical payload duality into a
//!   plain `Vec<DataTable>` so renderers never branch on input shape.
//! - **aggregate_stats**: sum per-table counters into the figures shown in
//!   the "Summary"/"Executive Summary" sections of multi-table exports.
//!
//! Aggregation is purely additive. Rows appearing in two tables are counted
//! twice; callers own deduplication if they care.

use crate::job::{DataTable, JobPayload, TableStats};

/// Resolve a payload into the canonical table list.
///
/// - Canonical table payloads pass through unchanged (including empty ones —
///   renderers degrade to a title-only document for those).
/// - The legacy flat shape synthesizes a single table with
///   `id = "{department}_{classification}"` and all-zero stats when none
///   were supplied.
pub fn normalize(payload: &JobPayload) -> Vec<DataTable> {
    match payload {
        JobPayload::Tables(tables) => tables.clone(),
        JobPayload::Legacy {
            data,
            department,
            classification,
            stats,
        } => vec![DataTable {
            id: format!("{department}_{classification}"),
            department: department.clone(),
            classification: classification.clone(),
            data: data.clone(),
            stats: stats.unwrap_or_default(),
        }],
    }
}

/// Sum counters across tables for the aggregate statistics block.
pub fn aggregate_stats(tables: &[DataTable]) -> TableStats {
    tables
        .iter()
        .fold(TableStats::default(), |acc, table| acc + table.stats)
}
