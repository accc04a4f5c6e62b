//! Pure value formatting shared by every renderer.
//!
//! This module is the first stage of cell rendering: it turns raw field
//! values into display-ready strings and maps status values to semantic
//! colors. Everything here is a free function or a fixed lookup — no state,
//! no I/O — so the same `(column, value)` pair always produces the same
//! string regardless of which renderer asked.
//!
//! Escaping is deliberately NOT done here. The CSV renderer applies its own
//! structural quoting on top of these strings; the binary formats take them
//! verbatim.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::schema::ColumnSpec;

/// Semantic highlight color for a status value.
///
/// Renderers translate this into their own color representation (RGB ints
/// for spreadsheets, float triples for PDF, hex strings for documents).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    /// Amber: needs attention soon (low stock, under maintenance)
    Warning,
    /// Red: needs attention now (out of stock, expired)
    Danger,
    /// Green: nothing wrong
    Positive,
}

/// Map a raw status value to its semantic color.
///
/// Unknown statuses are treated as healthy rather than alarming.
pub fn status_color(raw_status: &str) -> StatusColor {
    match raw_status {
        "low_stock" | "maintenance" => StatusColor::Warning,
        "out_of_stock" | "expired" => StatusColor::Danger,
        _ => StatusColor::Positive,
    }
}

/// Format one cell: apply the column's formatter, or fall back to the
/// default stringification rules.
///
/// - A caller-supplied formatter wins outright and its output is used
///   verbatim.
/// - The `status` column humanizes enum-style values (`out_of_stock` →
///   `Out Of Stock`).
/// - Everything else is stringified, with null/missing becoming `""`.
pub fn apply_column(column: &ColumnSpec, value: &Value) -> String {
    if let Some(formatter) = column.formatter {
        return formatter(value);
    }
    if column.key == "status" {
        return humanize_status(&stringify(value));
    }
    stringify(value)
}

/// Turn an enum-style status value into a display string: underscores to
/// spaces, each word title-cased.
pub fn humanize_status(raw: &str) -> String {
    raw.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Default stringification for raw cell values.
///
/// Null maps to the empty string; strings pass through without their JSON
/// quotes; anything else renders as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Date formatter for the inventory schema (`2026-03-01` → `Mar 01, 2026`).
///
/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates; anything that
/// does not parse passes through unchanged so bad data stays visible.
pub fn format_date(value: &Value) -> String {
    let raw = stringify(value);
    if raw.is_empty() {
        return raw;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return dt.format("%b %d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return date.format("%b %d, %Y").to_string();
    }
    raw
}

/// Timestamp formatter for the inventory schema, with a time-of-day part.
pub fn format_date_time(value: &Value) -> String {
    let raw = stringify(value);
    if raw.is_empty() {
        return raw;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return dt.format("%b %d, %Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%b %d, %Y %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return date.format("%b %d, %Y").to_string();
    }
    raw
}

/// Quantity formatter for the inventory schema: numbers render as whole
/// units, everything else passes through.
pub fn format_quantity(value: &Value) -> String {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64() {
                format!("{}", f.round() as i64)
            } else {
                n.to_string()
            }
        }
        other => stringify(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain(key: &str) -> ColumnSpec {
        ColumnSpec::new(key, "Header")
    }

    #[test]
    fn test_apply_column_is_deterministic() {
        let col = plain("generic_name");
        let value = json!("Paracetamol");
        assert_eq!(apply_column(&col, &value), apply_column(&col, &value));

        let status = plain("status");
        let null = Value::Null;
        assert_eq!(apply_column(&status, &null), apply_column(&status, &null));
    }

    #[test]
    fn test_apply_column_null_and_missing() {
        let col = plain("notes");
        assert_eq!(apply_column(&col, &Value::Null), "");
    }

    #[test]
    fn test_apply_column_numbers_and_bools() {
        let col = plain("stock_quantity");
        assert_eq!(apply_column(&col, &json!(42)), "42");
        assert_eq!(apply_column(&col, &json!(true)), "true");
    }

    #[test]
    fn test_apply_column_formatter_wins() {
        fn shout(_: &Value) -> String {
            "LOUD".to_string()
        }
        let col = plain("status").formatter(shout);
        assert_eq!(apply_column(&col, &json!("out_of_stock")), "LOUD");
    }

    #[test]
    fn test_status_humanization() {
        let col = plain("status");
        assert_eq!(apply_column(&col, &json!("out_of_stock")), "Out Of Stock");
        assert_eq!(apply_column(&col, &json!("active")), "Active");
        assert_eq!(apply_column(&col, &json!("low_stock")), "Low Stock");
    }

    #[test]
    fn test_humanize_status_empty() {
        assert_eq!(humanize_status(""), "");
    }

    #[test]
    fn test_status_color_table() {
        assert_eq!(status_color("low_stock"), StatusColor::Warning);
        assert_eq!(status_color("maintenance"), StatusColor::Warning);
        assert_eq!(status_color("out_of_stock"), StatusColor::Danger);
        assert_eq!(status_color("expired"), StatusColor::Danger);
        assert_eq!(status_color("active"), StatusColor::Positive);
        assert_eq!(status_color(""), StatusColor::Positive);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&json!("2026-03-01")), "Mar 01, 2026");
        assert_eq!(
            format_date(&json!("2026-03-01T10:30:00+00:00")),
            "Mar 01, 2026"
        );
        // Unparseable input stays visible
        assert_eq!(format_date(&json!("soon")), "soon");
        assert_eq!(format_date(&Value::Null), "");
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(
            format_date_time(&json!("2026-03-01T10:30:00+00:00")),
            "Mar 01, 2026 10:30"
        );
        assert_eq!(
            format_date_time(&json!("2026-03-01 10:30:00")),
            "Mar 01, 2026 10:30"
        );
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(&json!(120)), "120");
        assert_eq!(format_quantity(&json!(120.4)), "120");
        assert_eq!(format_quantity(&json!("n/a")), "n/a");
    }

    #[test]
    fn test_stringify_nested_values() {
        assert_eq!(stringify(&json!(["a", "b"])), r#"["a","b"]"#);
    }
}
