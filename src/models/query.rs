//! Query-related data models.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Default number of preview rows returned by query_data.
pub const DEFAULT_PREVIEW_ROWS: u32 = 100;

/// Maximum allowed preview rows.
pub const MAX_PREVIEW_ROWS: u32 = 1000;

/// Number of sample rows returned by describe_table.
pub const SAMPLE_ROWS: usize = 5;

/// Result of one statement execution, already shaped for the protocol:
/// a bounded preview plus the true total row count.
///
/// The preview is row-count-bounded to keep response sizes in check; the
/// full result is never retained across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPreview {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Preview rows as key-value maps, at most the requested cap
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    /// True total number of rows the query produced
    pub total_rows: usize,
    /// True if total_rows exceeds the preview cap
    pub truncated: bool,
    /// Statement execution time in milliseconds
    pub execution_time_ms: u64,
}

impl QueryPreview {
    /// Number of rows in the preview (not the total).
    pub fn preview_count(&self) -> usize {
        self.rows.len()
    }
}
