//! Word-processor renderer built on docx-rs.
//!
//! Emits a structured document with a running header (application name) and
//! footer (generation date + page marker), and real table objects rather
//! than drawn text. One helper builds a table from a row set and the column
//! schema; both the single- and multi-table paths go through it.
//!
//! Unlike the PDF renderer this format never caps rows; a word processor
//! handles long tables fine.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, Footer, Header, Paragraph, Run, ShdType, Shading, Table, TableCell,
    TableRow, WidthType,
};
use serde_json::Value;

use crate::assemble::{aggregate_stats, normalize};
use crate::error::ReportError;
use crate::format::{apply_column, status_color, stringify, StatusColor};
use crate::job::{DataTable, ExportJob, Row as JobRow, TableStats};
use crate::render::{generated_stamp, stats_entries, table_label};
use crate::schema::{ColumnSpec, DEFAULT_COLUMN_WIDTH};
use crate::{Result, APP_NAME};

const HEADER_FILL: &str = "2E86C1";
const BAND_FILL: &str = "F2F2F2";
const WARNING_HEX: &str = "E67E22";
const DANGER_HEX: &str = "E74C3C";
const POSITIVE_HEX: &str = "27AE60";

/// Total table width in twips (dxa); grid shares are carved out of this.
const TABLE_WIDTH_DXA: usize = 9360;

/// Render the job as a docx document.
pub fn render(job: &ExportJob) -> Result<Vec<u8>> {
    let tables = normalize(&job.payload);

    let mut docx = Docx::new()
        .header(
            Header::new().add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(APP_NAME).bold().size(20))
                    .align(AlignmentType::Center),
            ),
        )
        .footer(
            Footer::new().add_paragraph(
                Paragraph::new()
                    .add_run(
                        Run::new()
                            .add_text(format!("Generated {} | Page", generated_stamp(job)))
                            .size(16),
                    )
                    .align(AlignmentType::Center),
            ),
        );

    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text(job.title.as_str()).bold().size(32))
            .align(AlignmentType::Center),
    );

    match tables.as_slice() {
        [] => {}
        [table] => docx = add_single_table(docx, job, table),
        tables => docx = add_multi_table(docx, job, tables),
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ReportError::Document(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn add_single_table(mut docx: Docx, job: &ExportJob, table: &DataTable) -> Docx {
    docx = docx.add_paragraph(
        Paragraph::new().add_run(
            Run::new()
                .add_text(format!("Generated: {}", generated_stamp(job)))
                .size(18),
        ),
    );
    if job.include_stats {
        docx = docx.add_paragraph(stats_paragraph(&table.stats, 20));
    }
    docx.add_table(build_table(&job.columns, &table.data))
}

fn add_multi_table(mut docx: Docx, job: &ExportJob, tables: &[DataTable]) -> Docx {
    docx = docx.add_paragraph(
        Paragraph::new().add_run(
            Run::new()
                .add_text(format!(
                    "Generated: {} | Tables: {}",
                    generated_stamp(job),
                    tables.len()
                ))
                .size(18),
        ),
    );

    docx = docx.add_paragraph(heading("Executive Summary", 28));
    let aggregate = aggregate_stats(tables);
    for (text, color) in stat_segments(&aggregate) {
        let mut run = Run::new().add_text(text).size(20);
        if let Some(color) = color {
            run = run.color(color).bold();
        }
        docx = docx.add_paragraph(Paragraph::new().add_run(run));
    }

    for table in tables {
        docx = docx.add_paragraph(heading(&table_label(table), 24));
        docx = docx.add_paragraph(stats_paragraph(&table.stats, 18));
        docx = docx.add_table(build_table(&job.columns, &table.data));
    }
    docx
}

fn heading(text: &str, size: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(size))
}

/// Pipe-separated statistics line with color-coded inline spans: amber for
/// a nonzero low-stock/maintenance count, red for nonzero out-of-stock or
/// expired, green when the counter is clean.
fn stats_paragraph(stats: &TableStats, size: usize) -> Paragraph {
    let mut paragraph = Paragraph::new();
    for (i, (text, color)) in stat_segments(stats).into_iter().enumerate() {
        if i > 0 {
            paragraph = paragraph.add_run(Run::new().add_text(" | ").size(size));
        }
        let mut run = Run::new().add_text(text).size(size);
        if let Some(color) = color {
            run = run.color(color).bold();
        }
        paragraph = paragraph.add_run(run);
    }
    paragraph
}

/// Statistics text segments with their span color; the total is left in the
/// default ink.
fn stat_segments(stats: &TableStats) -> Vec<(String, Option<&'static str>)> {
    stats_entries(stats)
        .into_iter()
        .map(|(label, value)| {
            let count: u64 = value.parse().unwrap_or(0);
            let color = match label.as_str() {
                "Total Items" => None,
                "Low Stock Items" | "Under Maintenance" => {
                    Some(if count > 0 { WARNING_HEX } else { POSITIVE_HEX })
                }
                _ => Some(if count > 0 { DANGER_HEX } else { POSITIVE_HEX }),
            };
            (format!("{label}: {value}"), color)
        })
        .collect()
}

/// Build one table object from a row set and the column schema: colored
/// header row, zebra-striped body, status cells inked per the status color
/// mapping. Shared by the single- and multi-table paths.
fn build_table(columns: &[ColumnSpec], rows: &[JobRow]) -> Table {
    let grid = column_grid(columns);

    let header_cells: Vec<TableCell> = columns
        .iter()
        .zip(&grid)
        .map(|(column, width)| {
            TableCell::new()
                .add_paragraph(
                    Paragraph::new().add_run(
                        Run::new()
                            .add_text(column.header.as_str())
                            .bold()
                            .color("FFFFFF")
                            .size(18),
                    ),
                )
                .width(*width, WidthType::Dxa)
                .shading(Shading::new().shd_type(ShdType::Clear).fill(HEADER_FILL))
        })
        .collect();

    let mut table_rows = Vec::with_capacity(rows.len() + 1);
    table_rows.push(TableRow::new(header_cells));

    for (i, record) in rows.iter().enumerate() {
        let banded = i % 2 == 1;
        let cells: Vec<TableCell> = columns
            .iter()
            .zip(&grid)
            .map(|(column, width)| {
                let raw = record.get(&column.key).unwrap_or(&Value::Null);
                let mut run = Run::new().add_text(apply_column(column, raw)).size(18);
                if column.key == "status" {
                    run = run.color(status_hex(&stringify(raw))).bold();
                }
                let mut cell = TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(run))
                    .width(*width, WidthType::Dxa);
                if banded {
                    cell = cell.shading(Shading::new().shd_type(ShdType::Clear).fill(BAND_FILL));
                }
                cell
            })
            .collect();
        table_rows.push(TableRow::new(cells));
    }

    Table::new(table_rows).set_grid(grid)
}

/// Carve the fixed table width into per-column twip shares proportional to
/// the schema's width hints.
fn column_grid(columns: &[ColumnSpec]) -> Vec<usize> {
    let total: f64 = columns
        .iter()
        .map(|c| c.width.unwrap_or(DEFAULT_COLUMN_WIDTH))
        .sum();
    columns
        .iter()
        .map(|c| {
            let share = c.width.unwrap_or(DEFAULT_COLUMN_WIDTH) / total.max(1.0);
            (share * TABLE_WIDTH_DXA as f64) as usize
        })
        .collect()
}

fn status_hex(raw_status: &str) -> &'static str {
    match status_color(raw_status) {
        StatusColor::Warning => WARNING_HEX,
        StatusColor::Danger => DANGER_HEX,
        StatusColor::Positive => POSITIVE_HEX,
    }
}
