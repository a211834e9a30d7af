//! Display-time normalization for alert timestamps.
//!
//! Alert sources send start/end times as Unix seconds, Unix milliseconds or
//! free-form date strings. Everything is rendered in Beijing time as
//! `YYYY-MM-DD HH:MM:SS`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

pub const UNSPECIFIED: &str = "未指定";
pub const INVALID_TIME: &str = "时间格式异常";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const BEIJING_OFFSET_SECS: i32 = 8 * 3600;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// How a raw time value was interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    Missing,
    UnixSeconds(i64),
    UnixMillis(i64),
    DateString(String),
    Invalid,
}

impl TimeInput {
    /// Classify a raw string.
    ///
    /// An integer whose decimal form is exactly 10 characters long is taken
    /// as seconds, any other number as milliseconds. This means a 10 digit
    /// millisecond value (anything before 1970-04-27) is read as seconds and
    /// lands far in the future; senders are expected to use 13 digits.
    pub fn classify(raw: &str) -> Self {
        if raw.is_empty() {
            return TimeInput::Missing;
        }

        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::from_integer(n);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if !f.is_finite() {
                return TimeInput::Invalid;
            }
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                return Self::from_integer(f as i64);
            }
            return TimeInput::UnixMillis(f.trunc() as i64);
        }

        TimeInput::DateString(raw.to_string())
    }

    /// Classify a JSON field. Falsy values (`null`, `false`, `0`, `""`) count
    /// as missing.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => TimeInput::Missing,
            Some(Value::String(s)) => Self::classify(s),
            Some(Value::Number(n)) => {
                if n.as_f64() == Some(0.0) {
                    TimeInput::Missing
                } else {
                    Self::classify(&n.to_string())
                }
            }
            Some(_) => TimeInput::Invalid,
        }
    }

    fn from_integer(n: i64) -> Self {
        if n.to_string().len() == 10 {
            TimeInput::UnixSeconds(n)
        } else {
            TimeInput::UnixMillis(n)
        }
    }

    /// Resolve to an instant, `None` if the value cannot be placed on the timeline.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            TimeInput::UnixSeconds(s) => {
                s.checked_mul(1000).and_then(DateTime::from_timestamp_millis)
            }
            TimeInput::UnixMillis(ms) => DateTime::from_timestamp_millis(*ms),
            TimeInput::DateString(s) => parse_date_string(s),
            TimeInput::Missing | TimeInput::Invalid => None,
        }
    }

    pub fn to_display(&self) -> String {
        if *self == TimeInput::Missing {
            return UNSPECIFIED.to_string();
        }
        match self.to_instant() {
            Some(instant) => format_beijing(instant),
            None => INVALID_TIME.to_string(),
        }
    }
}

pub fn to_display_time(raw: &str) -> String {
    TimeInput::classify(raw).to_display()
}

// JSON alert fields may carry the time as a string or a bare number
pub fn json_display_time(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => to_display_time(s),
        other => TimeInput::from_json(other).to_display(),
    }
}

fn format_beijing(instant: DateTime<Utc>) -> String {
    // +08:00 is always in range
    match FixedOffset::east_opt(BEIJING_OFFSET_SECS) {
        Some(tz) => instant.with_timezone(&tz).format(DISPLAY_FORMAT).to_string(),
        None => INVALID_TIME.to_string(),
    }
}

// strings without an offset are taken as UTC
fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
