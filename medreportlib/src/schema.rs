//! Column schemas: which fields a report shows, and how.
//!
//! A schema is an ordered list of [`ColumnSpec`]s shared by every table in an
//! export job. Schemas are plain owned data supplied by the caller and are
//! never mutated once a job is built.

use serde_json::Value;

use crate::format::{format_date, format_date_time, format_quantity};

/// A caller-supplied pure formatting function for one column.
pub type Formatter = fn(&Value) -> String;

/// Default column width (in spreadsheet character units) when a column gives
/// no hint.
pub const DEFAULT_COLUMN_WIDTH: f64 = 15.0;

/// One exportable column: field key, display header, optional layout hint,
/// optional value formatter.
///
/// `key` must be non-empty and unique within a schema; this is trusted, not
/// validated. How `width` is interpreted is renderer-specific (character
/// units in spreadsheets, a proportional weight elsewhere).
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    pub width: Option<f64>,
    pub formatter: Option<Formatter>,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        ColumnSpec {
            key: key.into(),
            header: header.into(),
            width: None,
            formatter: None,
        }
    }

    /// Builder: set the layout width hint
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Builder: set the value formatter
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

/// The fixed 12-column inventory report schema.
///
/// Dates and quantities carry explicit formatters; the status column relies
/// on the default status humanization.
pub fn inventory_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("code", "Code").width(12.0),
        ColumnSpec::new("generic_name", "Generic Name").width(25.0),
        ColumnSpec::new("brand_name", "Brand Name").width(25.0),
        ColumnSpec::new("category", "Category").width(15.0),
        ColumnSpec::new("stock_quantity", "Stock Quantity")
            .width(14.0)
            .formatter(format_quantity),
        ColumnSpec::new("stock_threshold", "Stock Threshold")
            .width(14.0)
            .formatter(format_quantity),
        ColumnSpec::new("unit", "Unit").width(10.0),
        ColumnSpec::new("expiration_date", "Expiration Date")
            .width(16.0)
            .formatter(format_date),
        ColumnSpec::new("status", "Status").width(15.0),
        ColumnSpec::new("notes", "Notes").width(30.0),
        ColumnSpec::new("created_at", "Created Date")
            .width(18.0)
            .formatter(format_date_time),
        ColumnSpec::new("updated_at", "Updated Date")
            .width(18.0)
            .formatter(format_date_time),
    ]
}
