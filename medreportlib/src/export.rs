//! Export orchestration: dispatch one job to its renderer and save the
//! artifact.
//!
//! This is the single entry point callers use. Dispatch is a pure match on
//! the job's format; renderer errors propagate unchanged — no retry, no
//! fallback format, no partial-success state. Each call is one synchronous
//! unit of work that owns its job and the in-memory document derived from
//! it, so concurrent calls never share state.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::ReportError;
use crate::job::{ExportFormat, ExportJob};
use crate::render;
use crate::Result;

/// A finished export: the final filename (extension included) and the file
/// bytes, fully built in memory before any save step runs.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Render a job into an in-memory artifact.
pub fn render_job(job: &ExportJob) -> Result<Artifact> {
    debug!("rendering '{}' as {}", job.title, job.format);
    let bytes = match job.format {
        ExportFormat::Xlsx => render::xlsx::render(job)?,
        ExportFormat::Pdf => render::pdf::render(job)?,
        ExportFormat::Csv => render::csv::render(job)?,
        ExportFormat::Docx => render::docx::render(job)?,
    };
    Ok(Artifact {
        filename: format!("{}.{}", job.filename, job.format.extension()),
        bytes,
    })
}

/// Render a job and write the artifact into `out_dir`. Returns the path of
/// the saved file.
///
/// A failure while rendering leaves nothing on disk; the save itself is a
/// single write of the complete byte buffer.
pub fn export_job(job: &ExportJob, out_dir: &Path) -> Result<PathBuf> {
    let artifact = render_job(job)?;
    let path = out_dir.join(&artifact.filename);
    fs::write(&path, &artifact.bytes).map_err(|source| ReportError::FileWrite {
        path: path.clone(),
        source,
    })?;
    debug!("wrote {} bytes to {}", artifact.bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{DataTable, Row, TableStats};
    use crate::schema::ColumnSpec;
    use serde_json::json;

    fn sample_job(format: ExportFormat) -> ExportJob {
        let mut row = Row::new();
        row.insert("generic_name".to_string(), json!("Paracetamol"));
        row.insert("status".to_string(), json!("low_stock"));
        let table = DataTable {
            id: "t1".to_string(),
            department: "medical".to_string(),
            classification: "Medicines".to_string(),
            data: vec![row],
            stats: TableStats::default(),
        };
        ExportJob::new(
            format,
            "Test Report",
            "test",
            vec![
                ColumnSpec::new("generic_name", "Generic Name"),
                ColumnSpec::new("status", "Status"),
            ],
        )
        .tables(vec![table])
    }

    #[test]
    fn test_artifact_filename_carries_extension() {
        for format in ExportFormat::ALL {
            let artifact = render_job(&sample_job(format)).unwrap();
            assert_eq!(artifact.filename, format!("test.{}", format.extension()));
            assert!(!artifact.bytes.is_empty());
        }
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_job(&sample_job(ExportFormat::Csv), dir.path()).unwrap();
        assert!(path.ends_with("test.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Paracetamol,Low Stock"));
    }

    #[test]
    fn test_export_to_missing_directory_fails_with_path() {
        let err = export_job(
            &sample_job(ExportFormat::Csv),
            Path::new("/definitely/not/a/dir"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("test.csv"));
    }
}
