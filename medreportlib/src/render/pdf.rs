//! PDF renderer built on printpdf.
//!
//! A4 portrait with the built-in Helvetica faces, laid out with a manual
//! y-cursor. Tables are striped (banded fills, white-on-blue header) and
//! auto-paginate; every page gets a footer with its page number and the
//! generator attribution.
//!
//! Print-specific policy lives here and nowhere else: multi-table jobs cap
//! each table at [`PDF_ROW_LIMIT`] data rows with an explicit omission note,
//! and a new page starts proactively when less than
//! [`PAGE_BREAK_THRESHOLD_MM`] of vertical space remains for a heading.
//! Both are deliberate readability tradeoffs for print media, kept as named
//! constants rather than fixed behavior.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Rect, Rgb,
};
use serde_json::Value;

use crate::assemble::{aggregate_stats, normalize};
use crate::error::ReportError;
use crate::format::{apply_column, status_color, stringify, StatusColor};
use crate::job::{DataTable, ExportJob, TableStats};
use crate::render::{generated_stamp, stats_entries, table_label};
use crate::schema::{ColumnSpec, DEFAULT_COLUMN_WIDTH};
use crate::{Result, APP_NAME};

/// Maximum data rows per table in multi-table PDF exports. The other
/// renderers never truncate.
pub const PDF_ROW_LIMIT: usize = 50;

/// Remaining vertical space below which a new table section starts on a
/// fresh page instead.
pub const PAGE_BREAK_THRESHOLD_MM: f32 = 35.0;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const FOOTER_Y: f32 = 8.0;
const ROW_HEIGHT: f32 = 6.5;
const LINE_HEIGHT: f32 = 5.5;

/// Render the job as a paginated PDF document.
pub fn render(job: &ExportJob) -> Result<Vec<u8>> {
    let tables = normalize(&job.payload);
    let mut writer = PdfWriter::new(&job.title)?;

    match tables.as_slice() {
        [] => {
            writer.centered_text(&job.title, 16.0, true);
        }
        [table] => render_single(&mut writer, job, table),
        tables => render_multi(&mut writer, job, tables),
    }

    writer.finish()
}

fn render_single(w: &mut PdfWriter, job: &ExportJob, table: &DataTable) {
    w.centered_text(&job.title, 16.0, true);
    w.advance(10.0);
    w.text(&format!("Department: {}", table.department), 12.0, MARGIN, true);
    w.advance(7.0);
    w.text(
        &format!("Classification: {}", table.classification),
        10.0,
        MARGIN,
        false,
    );
    w.advance(LINE_HEIGHT);
    w.text(&format!("Generated: {}", generated_stamp(job)), 10.0, MARGIN, false);
    w.advance(LINE_HEIGHT);
    w.text(
        &format!("Total Items: {}", table.data.len()),
        10.0,
        MARGIN,
        false,
    );
    w.advance(LINE_HEIGHT + 2.0);

    if job.include_stats {
        stats_block(w, &table.stats);
        w.advance(2.0);
    }

    draw_table(w, &job.columns, &table.data, None);
}

fn render_multi(w: &mut PdfWriter, job: &ExportJob, tables: &[DataTable]) {
    w.centered_text(&job.title, 16.0, true);
    w.advance(10.0);
    w.text(&format!("Generated: {}", generated_stamp(job)), 10.0, MARGIN, false);
    w.advance(LINE_HEIGHT);
    w.text(&format!("Tables: {}", tables.len()), 10.0, MARGIN, false);
    w.advance(LINE_HEIGHT + 2.0);

    if job.include_stats {
        w.text("Summary", 12.0, MARGIN, true);
        w.advance(7.0);
        stats_block(w, &aggregate_stats(tables));
        w.advance(2.0);
    }

    w.text("Table Breakdown", 12.0, MARGIN, true);
    w.advance(7.0);
    for table in tables {
        w.ensure_space(LINE_HEIGHT);
        w.text(
            &format!("{}: {} items", table_label(table), table.data.len()),
            10.0,
            MARGIN + 2.0,
            false,
        );
        w.advance(LINE_HEIGHT);
    }
    w.advance(4.0);

    for table in tables {
        // Do not start a section that cannot fit a heading plus a few rows
        if w.y - MARGIN < PAGE_BREAK_THRESHOLD_MM {
            w.new_page();
        }
        w.text(&table_label(table), 12.0, MARGIN, true);
        w.advance(8.0);
        draw_table(w, &job.columns, &table.data, Some(PDF_ROW_LIMIT));
        w.advance(6.0);
    }
}

/// Two-column label/value statistics block.
fn stats_block(w: &mut PdfWriter, stats: &TableStats) {
    let mid = PAGE_WIDTH / 2.0;
    for pair in stats_entries(stats).chunks(2) {
        w.ensure_space(LINE_HEIGHT);
        w.text(&format!("{}: {}", pair[0].0, pair[0].1), 10.0, MARGIN, false);
        if let Some((label, value)) = pair.get(1) {
            w.text(&format!("{label}: {value}"), 10.0, mid, false);
        }
        w.advance(LINE_HEIGHT);
    }
}

/// Draw one striped table at the cursor, paginating as needed. When `limit`
/// is set and the table is longer, only the first `limit` rows are drawn,
/// followed by an omission note.
fn draw_table(w: &mut PdfWriter, columns: &[ColumnSpec], rows: &[crate::job::Row], limit: Option<usize>) {
    let layout = column_layout(columns);
    let shown = capped_len(rows.len(), limit);

    w.ensure_space(ROW_HEIGHT * 3.0);
    draw_header_row(w, columns, &layout);

    for (i, record) in rows[..shown].iter().enumerate() {
        if w.y - ROW_HEIGHT < MARGIN {
            w.new_page();
            draw_header_row(w, columns, &layout);
        }
        if i % 2 == 1 {
            w.fill_rect(MARGIN, w.y - ROW_HEIGHT, PAGE_WIDTH - 2.0 * MARGIN, ROW_HEIGHT, band_fill());
        }
        for (column, (x, width)) in columns.iter().zip(&layout) {
            let raw = record.get(&column.key).unwrap_or(&Value::Null);
            let text = fit_text(&apply_column(column, raw), *width - 3.0, 9.0);
            if column.key == "status" {
                w.set_text_color(status_fill(&stringify(raw)));
                w.text_at(&text, 9.0, x + 1.5, w.y - ROW_HEIGHT + 2.0, true);
                w.set_text_color(black());
            } else {
                w.text_at(&text, 9.0, x + 1.5, w.y - ROW_HEIGHT + 2.0, false);
            }
        }
        w.advance(ROW_HEIGHT);
    }

    if shown < rows.len() {
        w.advance(2.0);
        w.ensure_space(LINE_HEIGHT);
        w.text(&truncation_note(shown, rows.len()), 9.0, MARGIN, false);
        w.advance(LINE_HEIGHT);
    }
}

fn draw_header_row(w: &mut PdfWriter, columns: &[ColumnSpec], layout: &[(f32, f32)]) {
    w.fill_rect(
        MARGIN,
        w.y - ROW_HEIGHT,
        PAGE_WIDTH - 2.0 * MARGIN,
        ROW_HEIGHT,
        header_fill(),
    );
    w.set_text_color(white());
    for (column, (x, width)) in columns.iter().zip(layout) {
        let text = fit_text(&column.header, *width - 3.0, 9.0);
        w.text_at(&text, 9.0, x + 1.5, w.y - ROW_HEIGHT + 2.0, true);
    }
    w.set_text_color(black());
    w.advance(ROW_HEIGHT);
}

/// Number of rows actually drawn under an optional cap.
fn capped_len(total: usize, limit: Option<usize>) -> usize {
    match limit {
        Some(limit) => total.min(limit),
        None => total,
    }
}

/// Note appended when a table was cut at the row cap.
fn truncation_note(shown: usize, total: usize) -> String {
    format!("Showing first {shown} of {total} items. Full data is available in the spreadsheet export.")
}

/// Distribute the printable width across columns proportionally to their
/// width hints. Returns `(x, width)` in mm per column.
fn column_layout(columns: &[ColumnSpec]) -> Vec<(f32, f32)> {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    let total: f64 = columns
        .iter()
        .map(|c| c.width.unwrap_or(DEFAULT_COLUMN_WIDTH))
        .sum();
    let mut x = MARGIN;
    columns
        .iter()
        .map(|c| {
            let share = (c.width.unwrap_or(DEFAULT_COLUMN_WIDTH) / total.max(1.0)) as f32;
            let width = share * usable;
            let position = (x, width);
            x += width;
            position
        })
        .collect()
}

/// Truncate text to the given width with a ".." marker. Width estimation
/// uses the average Helvetica advance (about half an em), the same
/// heuristic used for centering; built-in fonts expose no metrics.
fn fit_text(text: &str, width_mm: f32, size: f32) -> String {
    let max_chars = (width_mm / char_width_mm(size)).max(2.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(2)).collect();
    format!("{kept}..")
}

fn char_width_mm(size: f32) -> f32 {
    // 1 pt = 0.3528 mm
    size * 0.5 * 0.3528
}

fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * char_width_mm(size)
}

fn mm(v: f32) -> Mm {
    Mm(v as _)
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r as _, g as _, b as _, None))
}

fn black() -> Color {
    rgb(0.1, 0.1, 0.1)
}

fn white() -> Color {
    rgb(1.0, 1.0, 1.0)
}

fn header_fill() -> Color {
    rgb(0.18, 0.53, 0.76)
}

fn band_fill() -> Color {
    rgb(0.93, 0.94, 0.95)
}

fn status_fill(raw_status: &str) -> Color {
    match status_color(raw_status) {
        StatusColor::Warning => rgb(0.90, 0.49, 0.13),
        StatusColor::Danger => rgb(0.91, 0.30, 0.24),
        StatusColor::Positive => rgb(0.15, 0.68, 0.38),
    }
}

/// Document, cursor, and page bookkeeping for one render call. Owned
/// exclusively by that call; nothing here outlives the returned bytes.
struct PdfWriter {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let layer_ref = doc.get_page(page).get_layer(layer);
        Ok(PdfWriter {
            doc,
            pages: vec![(page, layer)],
            layer: layer_ref,
            font,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        self.pages.push((page, layer));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            self.new_page();
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// Text at the cursor line.
    fn text(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        self.text_at(text, size, x, self.y, bold);
    }

    fn text_at(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size as _, mm(x), mm(y), font);
    }

    fn centered_text(&mut self, text: &str, size: f32, bold: bool) {
        let x = ((PAGE_WIDTH - text_width_mm(text, size)) / 2.0).max(MARGIN);
        self.text(text, size, x, bold);
    }

    fn set_text_color(&self, color: Color) {
        self.layer.set_fill_color(color);
    }

    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.layer.set_fill_color(color);
        let rect = Rect::new(mm(x), mm(y), mm(x + width), mm(y + height))
            .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
        self.layer.set_fill_color(black());
    }

    /// Stamp footers on every page, then serialize the document.
    fn finish(self) -> Result<Vec<u8>> {
        let total = self.pages.len();
        let attribution = format!("Generated by {APP_NAME}");
        let attribution_x = PAGE_WIDTH - MARGIN - text_width_mm(&attribution, 8.0);
        for (i, (page, layer)) in self.pages.iter().enumerate() {
            let footer = self.doc.get_page(*page).get_layer(*layer);
            footer.use_text(
                format!("Page {} of {}", i + 1, total),
                8.0,
                mm(MARGIN),
                mm(FOOTER_Y),
                &self.font,
            );
            footer.use_text(&attribution, 8.0, mm(attribution_x), mm(FOOTER_Y), &self.font);
        }
        self.doc
            .save_to_bytes()
            .map_err(|e| ReportError::Pdf(e.to_string()))
    }
}
