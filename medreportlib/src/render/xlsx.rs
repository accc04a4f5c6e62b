//! Spreadsheet renderer built on rust_xlsxwriter.
//!
//! Single-table jobs become one sheet: title block, context lines, optional
//! statistics, header row, data rows. Multi-table jobs get a "Summary" sheet
//! first (generation info, aggregate statistics, one line per table), then
//! one sheet per table laid out like the single-table case.
//!
//! The workbook is built fully in memory and serialized in one step, so a
//! failure anywhere leaves no partial artifact.

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};
use serde_json::Value;

use crate::assemble::{aggregate_stats, normalize};
use crate::format::{apply_column, status_color, stringify, StatusColor};
use crate::job::{DataTable, ExportJob};
use crate::render::{generated_stamp, stats_entries, table_label};
use crate::schema::DEFAULT_COLUMN_WIDTH;
use crate::Result;

/// Hard limit of the xlsx format; longer names are silently truncated.
const SHEET_NAME_LIMIT: usize = 31;

const TITLE_FILL: u32 = 0xDDEBF7;
const HEADER_FILL: u32 = 0x2E86C1;
const WARNING_RGB: u32 = 0xE67E22;
const DANGER_RGB: u32 = 0xE74C3C;
const POSITIVE_RGB: u32 = 0x27AE60;

/// Render the job as an xlsx workbook.
pub fn render(job: &ExportJob) -> Result<Vec<u8>> {
    let tables = normalize(&job.payload);
    let mut workbook = Workbook::new();

    match tables.as_slice() {
        [] => {
            let sheet = workbook.add_worksheet();
            sheet.write_string_with_format(0, 0, &job.title, &title_format())?;
        }
        [table] => {
            write_table_sheet(workbook.add_worksheet(), job, table)?;
        }
        tables => {
            write_summary_sheet(workbook.add_worksheet(), job, tables)?;
            let mut used_names: Vec<String> = vec!["Summary".to_string()];
            for (index, table) in tables.iter().enumerate() {
                let name = sheet_name(table, index, &used_names);
                used_names.push(name.clone());
                let sheet = workbook.add_worksheet();
                sheet.set_name(&name)?;
                write_table_sheet(sheet, job, table)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Derive a sheet name from the table's department and classification,
/// truncated to the format's 31-character limit. Characters the format
/// forbids are replaced, and a name collision falls back to a positional
/// name because the workbook requires uniqueness.
fn sheet_name(table: &DataTable, index: usize, used: &[String]) -> String {
    let candidate: String = format!("{} {}", table.department, table.classification)
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => ' ',
            other => other,
        })
        .take(SHEET_NAME_LIMIT)
        .collect();
    if candidate.trim().is_empty() || used.contains(&candidate) {
        format!("Table {}", index + 1)
    } else {
        candidate
    }
}

fn title_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(TITLE_FILL))
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
}

fn status_format(raw_status: &str) -> Format {
    let rgb = match status_color(raw_status) {
        StatusColor::Warning => WARNING_RGB,
        StatusColor::Danger => DANGER_RGB,
        StatusColor::Positive => POSITIVE_RGB,
    };
    Format::new().set_bold().set_font_color(Color::RGB(rgb))
}

/// Write the title cell, merged across the job's data columns.
fn write_title(sheet: &mut Worksheet, job: &ExportJob, span: u16) -> Result<()> {
    if span > 1 {
        sheet.merge_range(0, 0, 0, span - 1, &job.title, &title_format())?;
    } else {
        sheet.write_string_with_format(0, 0, &job.title, &title_format())?;
    }
    Ok(())
}

/// Lay out one table on one sheet: title, context lines, optional stats,
/// header row, data rows.
fn write_table_sheet(sheet: &mut Worksheet, job: &ExportJob, table: &DataTable) -> Result<()> {
    for (i, column) in job.columns.iter().enumerate() {
        sheet.set_column_width(i as u16, column.width.unwrap_or(DEFAULT_COLUMN_WIDTH))?;
    }
    write_title(sheet, job, job.columns.len().max(1) as u16)?;

    let mut row: u32 = 2;
    sheet.write_string(row, 0, format!("Department: {}", table.department))?;
    row += 1;
    sheet.write_string(row, 0, format!("Classification: {}", table.classification))?;
    row += 1;
    sheet.write_string(row, 0, format!("Generated: {}", generated_stamp(job)))?;
    row += 1;
    sheet.write_string(row, 0, format!("Total Items: {}", table.data.len()))?;
    row += 1;

    if job.include_stats {
        row += 1;
        row = write_stats_block(sheet, row, &table.stats)?;
    }

    row += 1;
    let header = header_format();
    for (i, column) in job.columns.iter().enumerate() {
        sheet.write_string_with_format(row, i as u16, &column.header, &header)?;
    }
    row += 1;

    for record in &table.data {
        for (i, column) in job.columns.iter().enumerate() {
            let raw = record.get(&column.key).unwrap_or(&Value::Null);
            let text = apply_column(column, raw);
            if column.key == "status" {
                sheet.write_string_with_format(row, i as u16, text, &status_format(&stringify(raw)))?;
            } else {
                sheet.write_string(row, i as u16, text)?;
            }
        }
        row += 1;
    }
    Ok(())
}

/// Write a label/value statistics block starting at `row`; returns the row
/// after the block.
fn write_stats_block(
    sheet: &mut Worksheet,
    start_row: u32,
    stats: &crate::job::TableStats,
) -> Result<u32> {
    let mut row = start_row;
    sheet.write_string_with_format(row, 0, "Statistics", &Format::new().set_bold())?;
    row += 1;
    for (label, value) in stats_entries(stats) {
        sheet.write_string(row, 0, label)?;
        sheet.write_string(row, 1, value)?;
        row += 1;
    }
    Ok(row)
}

/// First sheet of a multi-table workbook: generation info, optional
/// aggregate statistics, and one line per table with its item count.
fn write_summary_sheet(sheet: &mut Worksheet, job: &ExportJob, tables: &[DataTable]) -> Result<()> {
    sheet.set_name("Summary")?;
    sheet.set_column_width(0, 40)?;
    sheet.set_column_width(1, 18)?;
    write_title(sheet, job, 2)?;

    let mut row: u32 = 2;
    sheet.write_string(row, 0, format!("Generated: {}", generated_stamp(job)))?;
    row += 1;
    sheet.write_string(row, 0, format!("Tables: {}", tables.len()))?;
    row += 1;

    if job.include_stats {
        row += 1;
        row = write_stats_block(sheet, row, &aggregate_stats(tables))?;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Table Breakdown", &Format::new().set_bold())?;
    row += 1;
    for table in tables {
        sheet.write_string(row, 0, table_label(table))?;
        sheet.write_string(row, 1, format!("{} items", table.data.len()))?;
        row += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{ExportFormat, Row, TableStats};
    use crate::schema::ColumnSpec;
    use serde_json::json;

    fn table(department: &str, classification: &str, rows: usize) -> DataTable {
        let data = (0..rows)
            .map(|i| {
                let mut row = Row::new();
                row.insert("generic_name".to_string(), json!(format!("Item {i}")));
                row.insert("status".to_string(), json!("low_stock"));
                row
            })
            .collect();
        DataTable {
            id: format!("{department}_{classification}"),
            department: department.to_string(),
            classification: classification.to_string(),
            data,
            stats: TableStats::default(),
        }
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("generic_name", "Generic Name").width(25.0),
            ColumnSpec::new("status", "Status"),
        ]
    }

    #[test]
    fn test_sheet_name_truncates_to_limit() {
        let long = table(
            "rehabilitation medicine",
            "Orthopedic Support Equipment",
            0,
        );
        let name = sheet_name(&long, 0, &[]);
        assert_eq!(name.chars().count(), 31);
    }

    #[test]
    fn test_sheet_name_sanitizes_and_deduplicates() {
        let tricky = table("med/surg", "IV: Fluids", 0);
        let name = sheet_name(&tricky, 0, &[]);
        assert!(!name.contains('/'));
        assert!(!name.contains(':'));

        let duplicate = sheet_name(&tricky, 3, &[name.clone()]);
        assert_eq!(duplicate, "Table 4");
    }

    #[test]
    fn test_single_table_workbook_is_valid_zip() {
        let job = ExportJob::new(ExportFormat::Xlsx, "Inventory", "inv", columns())
            .tables(vec![table("medical", "Medicines", 3)])
            .include_stats(true);
        let bytes = render(&job).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_multi_table_workbook_renders() {
        let job = ExportJob::new(ExportFormat::Xlsx, "Inventory", "inv", columns()).tables(vec![
            table("medical", "Medicines", 2),
            table("dental", "Supplies", 1),
        ]);
        let bytes = render(&job).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_long_sheet_names_do_not_error() {
        let job = ExportJob::new(ExportFormat::Xlsx, "Inventory", "inv", columns()).tables(vec![
            table("rehabilitation medicine", "Orthopedic Support Equipment", 1),
            table("rehabilitation medicine", "Orthopedic Support Extras", 1),
        ]);
        assert!(render(&job).is_ok());
    }

    #[test]
    fn test_empty_job_renders_title_only_workbook() {
        let job = ExportJob::new(ExportFormat::Xlsx, "Nothing Here", "empty", columns());
        let bytes = render(&job).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
