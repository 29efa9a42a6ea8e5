//! DuckDB value to JSON conversion.
//!
//! Query results cross the protocol boundary as JSON, so every DuckDB value
//! needs a JSON rendering: text stays text, blobs are base64-encoded, temporal
//! types are formatted via chrono, and values JSON numbers cannot represent
//! exactly (decimals, 128-bit integers) become strings.

use crate::error::GatewayResult;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use duckdb::Row;
use duckdb::types::{TimeUnit, ValueRef};
use serde_json::{Map, Number, Value as JsonValue};

/// Convert one DuckDB value to its JSON representation.
pub fn value_ref_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Boolean(b) => JsonValue::Bool(b),
        ValueRef::TinyInt(i) => JsonValue::from(i),
        ValueRef::SmallInt(i) => JsonValue::from(i),
        ValueRef::Int(i) => JsonValue::from(i),
        ValueRef::BigInt(i) => JsonValue::from(i),
        ValueRef::HugeInt(i) => huge_int_to_json(i),
        ValueRef::UTinyInt(i) => JsonValue::from(i),
        ValueRef::USmallInt(i) => JsonValue::from(i),
        ValueRef::UInt(i) => JsonValue::from(i),
        ValueRef::UBigInt(i) => JsonValue::from(i),
        ValueRef::Float(f) => float_to_json(f as f64),
        ValueRef::Double(f) => float_to_json(f),
        // JSON numbers lose decimal precision, keep the exact text
        ValueRef::Decimal(d) => JsonValue::String(d.to_string()),
        ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => JsonValue::String(BASE64.encode(bytes)),
        ValueRef::Date32(days) => date_to_json(days),
        ValueRef::Time64(unit, value) => time_to_json(unit, value),
        ValueRef::Timestamp(unit, value) => timestamp_to_json(unit, value),
        // Nested and exotic types (lists, structs, intervals, ...) are
        // rendered as display text; the analyst can cast in SQL if needed
        other => JsonValue::String(format!("{other:?}")),
    }
}

/// Convert a whole row to a JSON object keyed by column name.
pub fn row_to_json_map(
    row: &Row<'_>,
    columns: &[String],
) -> GatewayResult<Map<String, JsonValue>> {
    let mut map = Map::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        let value = row.get_ref(idx)?;
        map.insert(name.clone(), value_ref_to_json(value));
    }
    Ok(map)
}

fn float_to_json(f: f64) -> JsonValue {
    // NaN and infinities have no JSON number form
    Number::from_f64(f).map(JsonValue::Number).unwrap_or(JsonValue::Null)
}

fn huge_int_to_json(i: i128) -> JsonValue {
    match i64::try_from(i) {
        Ok(v) => JsonValue::from(v),
        Err(_) => JsonValue::String(i.to_string()),
    }
}

fn unit_to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

fn date_to_json(days_since_epoch: i32) -> JsonValue {
    // 719_163 = proleptic Gregorian ordinal of 1970-01-01
    match chrono::NaiveDate::from_num_days_from_ce_opt(days_since_epoch + 719_163) {
        Some(date) => JsonValue::String(date.to_string()),
        None => JsonValue::from(days_since_epoch),
    }
}

fn time_to_json(unit: TimeUnit, value: i64) -> JsonValue {
    let micros = unit_to_micros(unit, value);
    let secs = (micros / 1_000_000) as u32;
    let nanos = ((micros % 1_000_000) * 1_000) as u32;
    match chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos) {
        Some(time) => JsonValue::String(time.to_string()),
        None => JsonValue::from(value),
    }
}

fn timestamp_to_json(unit: TimeUnit, value: i64) -> JsonValue {
    let micros = unit_to_micros(unit, value);
    match chrono::DateTime::from_timestamp_micros(micros) {
        Some(ts) => JsonValue::String(ts.to_rfc3339()),
        None => JsonValue::from(value),
    }
}
