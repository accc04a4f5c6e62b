//! # medreport
//!
//! CLI front end for the medreportlib export engine: load an export job
//! described in a JSON file, render it into one of the supported formats,
//! and save the artifact.
//!
//! ## Usage
//!
//! ```bash
//! # Render a job file (format taken from the file)
//! medreport export inventory-job.json
//!
//! # Render the same job as a PDF into ./reports
//! medreport export inventory-job.json --format pdf --out-dir reports
//!
//! # Apply the timestamped filename convention
//! medreport export inventory-job.json --stamp
//!
//! # List supported formats
//! medreport formats
//! ```
//!
//! ## Job files
//!
//! Job files use camelCase keys and accept either a `tables` list or the
//! legacy flat shape (`data` + `department` + `classification` + `stats`).
//! Columns come from an inline `columns` list (with optional named
//! formatters `date`, `datetime`, `quantity`) or from a built-in schema via
//! `"schema": "inventory"`.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use console::Style;
use medreportlib::{
    export_job, format_date, format_date_time, format_quantity, inventory_columns,
    timestamped_filename, ColumnSpec, DataTable, ExportFormat, ExportJob, Row, TableStats,
};
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "medreport",
    version,
    about = "Render clinic report export jobs into xlsx, pdf, csv, or docx files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JSON job file into a report document
    Export {
        /// Path to the job file
        job: PathBuf,
        /// Directory the artifact is written into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Override the job file's format (xlsx, pdf, csv, docx)
        #[arg(long)]
        format: Option<String>,
        /// Append the timestamp suffix to the base filename
        #[arg(long)]
        stamp: bool,
    },
    /// List supported output formats
    Formats,
}

/// On-disk job description. Mirrors the camelCase JSON the web callers
/// produce; converted into a library [`ExportJob`] before rendering.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobFile {
    format: String,
    title: String,
    filename: String,
    #[serde(default)]
    include_stats: bool,
    /// Built-in schema name; inline `columns` take precedence
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    columns: Option<Vec<ColumnDef>>,
    #[serde(default)]
    tables: Option<Vec<DataTable>>,
    // Legacy flat shape
    #[serde(default)]
    data: Option<Vec<Row>>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    classification: Option<String>,
    #[serde(default)]
    stats: Option<TableStats>,
}

#[derive(Debug, Deserialize)]
struct ColumnDef {
    key: String,
    header: String,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    format: Option<NamedFormat>,
}

/// Named formatters a job file can attach to a column.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NamedFormat {
    Date,
    Datetime,
    Quantity,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", Style::new().red().bold().apply_to("Error:"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Export {
            job,
            out_dir,
            format,
            stamp,
        } => cmd_export(&job, &out_dir, format.as_deref(), stamp),
        Command::Formats => {
            cmd_formats();
            Ok(())
        }
    }
}

fn cmd_export(
    job_path: &std::path::Path,
    out_dir: &std::path::Path,
    format_override: Option<&str>,
    stamp: bool,
) -> anyhow::Result<()> {
    let raw = fs::read_to_string(job_path)
        .with_context(|| format!("failed to read job file '{}'", job_path.display()))?;
    let file: JobFile = serde_json::from_str(&raw)
        .with_context(|| format!("invalid job file '{}'", job_path.display()))?;

    let format: ExportFormat = format_override.unwrap_or(&file.format).parse()?;
    let columns = build_columns(&file)?;
    let filename = if stamp {
        timestamped_filename(&file.filename, Utc::now())
    } else {
        file.filename.clone()
    };

    let mut job = ExportJob::new(format, file.title.clone(), filename, columns)
        .include_stats(file.include_stats);
    job = apply_payload(job, file);

    let path = export_job(&job, out_dir)?;
    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Saved"),
        path.display()
    );
    Ok(())
}

fn cmd_formats() {
    for format in ExportFormat::ALL {
        let description = match format {
            ExportFormat::Xlsx => "spreadsheet workbook, one sheet per table",
            ExportFormat::Pdf => "paginated print document, 50-row cap per table",
            ExportFormat::Csv => "flat comma-separated text with labeled sections",
            ExportFormat::Docx => "word-processor document with real tables",
        };
        println!(".{:<5} {}", format.extension(), description);
    }
}

/// Resolve the job file's column configuration: inline columns win, then a
/// named built-in schema.
fn build_columns(file: &JobFile) -> anyhow::Result<Vec<ColumnSpec>> {
    if let Some(defs) = &file.columns {
        return Ok(defs.iter().map(to_column_spec).collect());
    }
    match file.schema.as_deref() {
        Some("inventory") => Ok(inventory_columns()),
        Some(other) => bail!("unknown schema '{other}' (available: inventory)"),
        None => bail!("job file must supply either 'columns' or 'schema'"),
    }
}

fn to_column_spec(def: &ColumnDef) -> ColumnSpec {
    let mut spec = ColumnSpec::new(def.key.clone(), def.header.clone());
    if let Some(width) = def.width {
        spec = spec.width(width);
    }
    match def.format {
        Some(NamedFormat::Date) => spec.formatter(format_date),
        Some(NamedFormat::Datetime) => spec.formatter(format_date_time),
        Some(NamedFormat::Quantity) => spec.formatter(format_quantity),
        None => spec,
    }
}

/// Attach whichever payload shape the job file carried. The library's
/// assembler resolves the legacy shape; an entirely payload-free file
/// renders as a title-only document.
fn apply_payload(job: ExportJob, file: JobFile) -> ExportJob {
    if let Some(tables) = file.tables {
        return job.tables(tables);
    }
    if let Some(data) = file.data {
        return job.legacy(
            data,
            file.department.unwrap_or_default(),
            file.classification.unwrap_or_default(),
            file.stats,
        );
    }
    job
}
