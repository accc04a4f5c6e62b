//! CSV renderer: one flat UTF-8 text stream.
//!
//! CSV has no sheets or pages, so multi-table jobs become sequential labeled
//! sections in a single stream, separated by blank lines. Structural quoting
//! (RFC 4180) is enforced here on every formatted cell regardless of what a
//! caller-supplied formatter produced — this is the one place cell text is
//! not taken verbatim.

use serde_json::Value;

use crate::assemble::{aggregate_stats, normalize};
use crate::format::apply_column;
use crate::job::{DataTable, ExportJob};
use crate::render::{generated_stamp, stats_entries};
use crate::Result;

/// Render the job as CSV text.
pub fn render(job: &ExportJob) -> Result<Vec<u8>> {
    let tables = normalize(&job.payload);
    let mut out = String::new();
    match tables.as_slice() {
        [] => {
            out.push_str(&job.title);
            out.push('\n');
        }
        [table] => render_single(&mut out, job, table),
        tables => render_multi(&mut out, job, tables),
    }
    Ok(out.into_bytes())
}

fn render_single(out: &mut String, job: &ExportJob, table: &DataTable) {
    out.push_str(&job.title);
    out.push('\n');
    out.push_str(&format!("Generated: {}\n", generated_stamp(job)));
    out.push_str(&format!("Total Items: {}\n", table.data.len()));
    if job.include_stats {
        // The total line is already above; emit the remaining counters
        for (label, value) in stats_entries(&table.stats).into_iter().skip(1) {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }
    out.push('\n');
    push_header_line(out, job);
    push_data_lines(out, job, table);
}

fn render_multi(out: &mut String, job: &ExportJob, tables: &[DataTable]) {
    out.push_str(&job.title);
    out.push('\n');
    out.push_str(&format!("Generated: {}\n", generated_stamp(job)));
    out.push_str(&format!("Tables: {}\n", tables.len()));
    if job.include_stats {
        for (label, value) in stats_entries(&aggregate_stats(tables)) {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }
    for table in tables {
        out.push('\n');
        out.push_str(&format!(
            "=== {} - {} ===\n",
            table.department, table.classification
        ));
        out.push_str(&format!("Items: {}\n", table.data.len()));
        push_header_line(out, job);
        push_data_lines(out, job, table);
    }
}

fn push_header_line(out: &mut String, job: &ExportJob) {
    let headers: Vec<String> = job
        .columns
        .iter()
        .map(|col| escape_cell(&col.header))
        .collect();
    out.push_str(&headers.join(","));
    out.push('\n');
}

fn push_data_lines(out: &mut String, job: &ExportJob, table: &DataTable) {
    for record in &table.data {
        let cells: Vec<String> = job
            .columns
            .iter()
            .map(|col| {
                let raw = record.get(&col.key).unwrap_or(&Value::Null);
                escape_cell(&apply_column(col, raw))
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
}

/// RFC 4180 quoting: wrap in double quotes when the value contains a comma,
/// a quote, or a newline, doubling any embedded quotes.
fn escape_cell(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
