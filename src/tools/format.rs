//! Output formatting for tabular tool results.
//!
//! query_data can return its preview as structured JSON, an ASCII table, or a
//! markdown table. The rendered footer always shows the true total row count
//! so a truncated preview cannot be mistaken for the full result.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use unicode_width::UnicodeWidthStr;

/// Output format for query previews.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// ASCII table format (like the DuckDB CLI)
    Table,
    /// Markdown table format
    Markdown,
}

pub fn format_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(arr) => serde_json::to_string(arr).unwrap_or_default(),
        JsonValue::Object(obj) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

fn footer(total_rows: usize, shown: usize) -> String {
    let row_text = if total_rows == 1 { "row" } else { "rows" };
    if shown < total_rows {
        format!("{total_rows} {row_text} ({shown} shown)")
    } else {
        format!("{total_rows} {row_text}")
    }
}

/// Render a preview as an ASCII table.
pub fn format_as_table(
    columns: &[String],
    rows: &[serde_json::Map<String, JsonValue>],
    total_rows: usize,
) -> String {
    if columns.is_empty() {
        return "Empty set".to_string();
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.width()).collect();
    for row in rows {
        for (i, col) in columns.iter().enumerate() {
            if let Some(value) = row.get(col) {
                widths[i] = widths[i].max(format_value(value).width());
            }
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    let mut output = String::new();
    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("| {:^width$} ", col, width = w))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);
    output.push_str(&separator);

    for row in rows {
        let row_str: String = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| {
                let value = row.get(col).cloned().unwrap_or(JsonValue::Null);
                let formatted = format_value(&value);
                // Right-align numbers, left-align everything else
                if matches!(value, JsonValue::Number(_)) {
                    format!("| {formatted:>width$} ", width = w)
                } else {
                    format!("| {formatted:<width$} ", width = w)
                }
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&separator);
    output.push_str(&footer(total_rows, rows.len()));
    output.push('\n');
    output
}

/// Render a preview as a Markdown table.
pub fn format_as_markdown(
    columns: &[String],
    rows: &[serde_json::Map<String, JsonValue>],
    total_rows: usize,
) -> String {
    if columns.is_empty() {
        return "*Empty set*".to_string();
    }

    let mut output = String::new();

    let header: String = columns
        .iter()
        .map(|c| format!("| {c} "))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);

    let sep: String = columns.iter().map(|_| "|---").collect::<String>() + "|\n";
    output.push_str(&sep);

    for row in rows {
        let row_str: String = columns
            .iter()
            .map(|col| {
                let value = row.get(col).cloned().unwrap_or(JsonValue::Null);
                format!("| {} ", format_value(&value))
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&format!("\n*{}*", footer(total_rows, rows.len())));
    output
}
