//! Decoding of literal tokens into typed values.

use crate::access::Value;
use crate::error::{QueryError, QueryResult};
use crate::expression::Literal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-only literal format, e.g. `2023-01-15`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time literal format, e.g. `2023-01-15 10:30:00`
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a literal token into a typed value.
///
/// A string that parses as a date or date-time always becomes a timestamp
/// (interpreted as UTC), even when it is later compared against a text
/// field. Integers must fit an unsigned 64-bit value; negative tokens fail.
pub fn decode_literal(lit: &Literal) -> QueryResult<Value> {
    match lit {
        Literal::String(s) => Ok(parse_timestamp(s)
            .map(Value::Timestamp)
            .unwrap_or_else(|| Value::String(s.clone()))),
        Literal::Integer(s) => s
            .parse::<u64>()
            .map(Value::UInt64)
            .map_err(|e| QueryError::decode(lit.kind(), s.as_str(), e)),
        Literal::Float(s) => s
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| QueryError::decode(lit.kind(), s.as_str(), e)),
        Literal::Boolean(_) | Literal::Null => Err(QueryError::decode(
            lit.kind(),
            lit.to_string(),
            "unsupported value type",
        )),
    }
}

/// Decode a literal that must be a non-negative integer, such as a LIMIT
pub fn decode_unsigned(lit: &Literal) -> QueryResult<u64> {
    match decode_literal(lit)? {
        Value::UInt64(n) => Ok(n),
        other => Err(QueryError::decode(
            lit.kind(),
            lit.to_string(),
            format!("expected an unsigned integer, got {}", other.data_type()),
        )),
    }
}

/// Parse `s` as a date or date-time. Fields must be zero-padded to their
/// full width with nothing around them, so the parsed value has to print
/// back as exactly `s`.
fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::default()))
        .ok()
        .filter(|naive| naive.format(DATE_FORMAT).to_string() == s)
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .ok()
                .filter(|naive| naive.format(DATETIME_FORMAT).to_string() == s)
        })?;
    Some(naive.and_utc().fixed_offset())
}
