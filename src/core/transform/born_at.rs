//! Birth timestamp normalization
//!
//! Numbers and numeric strings are epoch milliseconds. Other strings are
//! tried as RFC 3339, then as naive date-times (taken as UTC), then as a bare
//! date at midnight UTC. Output is always RFC 3339 UTC with millisecond
//! precision, e.g. `2020-01-01T00:00:00.000Z`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a raw `born_at` value
///
/// Returns `Ok(None)` for a missing, null or blank value, and `Err` with a
/// reason when a value is present but cannot be interpreted.
pub fn parse_born_at(value: Option<&Value>) -> Result<Option<DateTime<Utc>>, String> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => {
            if let Some(millis) = number.as_i64() {
                from_epoch_millis(millis)
            } else if let Some(millis) = number.as_f64() {
                from_epoch_millis_f64(millis)
            } else {
                Err(format!("numeric value {number} is out of range"))
            }
        }
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            parse_text(text)
        }
        Some(other) => Err(format!("unsupported value type: {other}")),
    }?;

    if !(0..=9999).contains(&parsed.year()) {
        return Err(format!("year {} is out of range", parsed.year()));
    }

    Ok(Some(parsed))
}

/// Format a timestamp the way it is loaded to the destination
pub fn format_born_at(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_text(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(millis) = text.parse::<i64>() {
        return from_epoch_millis(millis);
    }
    if let Ok(millis) = text.parse::<f64>() {
        return from_epoch_millis_f64(millis);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(format!("unrecognized timestamp '{text}'"))
}

fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| format!("epoch milliseconds {millis} are out of range"))
}

fn from_epoch_millis_f64(millis: f64) -> Result<DateTime<Utc>, String> {
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(format!("epoch milliseconds {millis} are out of range"));
    }
    from_epoch_millis(millis.floor() as i64)
}
