//! Rendering of query results.

use crate::executor::ResultTable;
use anyhow::Result;
use clap::ValueEnum;
use comfy_table::{Cell, ContentArrangement, Table};

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted table output.
    #[default]
    Table,
    /// JSON output.
    Json,
}

/// Formats a result according to the specified format.
pub fn format_result(result: &ResultTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(result)),
        OutputFormat::Json => format_json(result),
    }
}

/// Formats the result as a table.
pub fn format_table(result: &ResultTable) -> String {
    let mut table = Table::new();

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    if !result.columns.is_empty() {
        table.set_header(result.columns.iter().map(Cell::new));
    }

    for row in &result.rows {
        table.add_row(row.iter().map(|v| Cell::new(v.to_string())));
    }

    table.to_string()
}

/// Formats the result as `{"columns": [...], "rows": [[...], ...]}`.
pub fn format_json(result: &ResultTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Value;
    use chrono::DateTime;

    fn sample() -> ResultTable {
        ResultTable::new(
            vec!["hash".to_string(), "date".to_string()],
            vec![vec![
                Value::from("a1"),
                Value::from(DateTime::parse_from_rfc3339("2023-01-15T10:30:00+02:00").unwrap()),
            ]],
        )
    }

    #[test]
    fn test_format_table() {
        let text = format_table(&sample());
        assert!(text.contains("hash"));
        assert!(text.contains("date"));
        assert!(text.contains("a1"));
        assert!(text.contains("2023-01-15 10:30:00 +0200"));
    }

    #[test]
    fn test_format_json() -> Result<()> {
        let text = format_result(&sample(), OutputFormat::Json)?;
        let parsed: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(
            parsed,
            serde_json::json!({
                "columns": ["hash", "date"],
                "rows": [["a1", "2023-01-15T10:30:00+02:00"]]
            })
        );
        Ok(())
    }

    #[test]
    fn test_format_json_numbers() -> Result<()> {
        let table = ResultTable::new(
            vec!["n".to_string(), "f".to_string()],
            vec![vec![Value::UInt64(3), Value::Float64(1.5)]],
        );
        let parsed: serde_json::Value = serde_json::from_str(&format_json(&table)?)?;
        assert_eq!(parsed["rows"][0][0], serde_json::json!(3));
        assert_eq!(parsed["rows"][0][1], serde_json::json!(1.5));
        Ok(())
    }

    #[test]
    fn test_format_empty_table() {
        let table = ResultTable::new(vec!["hash".to_string()], vec![]);
        assert!(format_table(&table).contains("hash"));
    }
}
