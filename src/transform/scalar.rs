//! Scalar statistics: counters, flags and numbers encoded as strings.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::tables::{
    LOAD_STATUS_KEY, LOAD_STATUS_STABLE, LOAD_STATUS_STABLE_TEXT, LOAD_STATUS_UNKNOWN, TABLES,
};
use super::Emitter;

static TABLE_COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"table(\d)Count").unwrap());

static LETTERS_AND_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z\s]+").unwrap());

/// Why a scalar value could not be turned into a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Nothing was left after stripping letters and whitespace.
    #[error("no numeric content in {0:?}")]
    Empty(String),

    /// The remainder did not parse as a number.
    #[error("{0:?} is not numeric")]
    NotNumeric(String),

    /// The remainder parsed to infinity or NaN.
    #[error("{0:?} is out of range")]
    NonFinite(String),

    /// Null, array or object where a scalar was expected.
    #[error("unsupported {0} value")]
    Unsupported(&'static str),
}

/// Strip ASCII letters and whitespace, then parse the rest as a float.
///
/// Decodes values such as `"12 files"` or `"0.31s"`.
pub fn coerce_numeric_string(s: &str) -> Result<f64, DecodeError> {
    let stripped = LETTERS_AND_WHITESPACE.replace_all(s, "");
    if stripped.is_empty() {
        return Err(DecodeError::Empty(s.to_string()));
    }

    let value: f64 = stripped
        .parse()
        .map_err(|_| DecodeError::NotNumeric(s.to_string()))?;

    if !value.is_finite() {
        return Err(DecodeError::NonFinite(s.to_string()));
    }
    Ok(value)
}

/// Decode the value of an ordinary (non table-count) scalar key.
pub fn decode_scalar_value(key: &str, value: &Value) -> Result<f64, DecodeError> {
    match value {
        Value::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
        Value::Number(n) => number(n),
        Value::String(s) if s.is_empty() => Ok(0.0),
        Value::String(s) if key == LOAD_STATUS_KEY => Ok(load_status(s)),
        Value::String(s) => coerce_numeric_string(s),
        Value::Null => Err(DecodeError::Unsupported("null")),
        Value::Array(_) => Err(DecodeError::Unsupported("array")),
        Value::Object(_) => Err(DecodeError::Unsupported("object")),
    }
}

/// Emit the point for one top-level scalar key, or log why it was skipped.
pub(super) fn decode_scalar(key: &str, value: &Value, out: &mut Emitter<'_>) {
    if let Some(index) = table_index(key) {
        decode_table_count(key, index, value, out);
        return;
    }

    match decode_scalar_value(key, value) {
        Ok(number) => {
            let tags = out.tags(key);
            out.emit(tags, number);
        }
        Err(e) => warn!(key, error = %e, "Skipping statistic"),
    }
}

fn decode_table_count(key: &str, index: usize, value: &Value, out: &mut Emitter<'_>) {
    let Value::Number(n) = value else {
        debug!(key, "Skipping non-numeric table count");
        return;
    };
    let Some(table) = TABLES.get(index) else {
        warn!(key, index, "No table name for index");
        return;
    };

    match number(n) {
        Ok(count) => {
            let tags = out.tags(table);
            out.emit(tags, count);
        }
        Err(e) => warn!(key, error = %e, "Skipping table count"),
    }
}

/// The digit N of a `table<N>Count` key.
fn table_index(key: &str) -> Option<usize> {
    let captures = TABLE_COUNT.captures(key)?;
    captures[1].parse().ok()
}

fn load_status(s: &str) -> f64 {
    if s == LOAD_STATUS_STABLE_TEXT {
        LOAD_STATUS_STABLE
    } else {
        LOAD_STATUS_UNKNOWN
    }
}

pub(super) fn number(n: &Number) -> Result<f64, DecodeError> {
    n.as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::NotNumeric(n.to_string()))
}
