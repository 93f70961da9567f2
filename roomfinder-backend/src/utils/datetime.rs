//! Date/time serde helpers
//!
//! - Serialize: `DateTime<Utc>` -> RFC3339 string
//! - Deserialize: RFC3339 string, MySQL `YYYY-MM-DD HH:MM:SS` string (legacy API),
//!   or Unix timestamp -> `DateTime<Utc>`

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const MYSQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialize `Option<DateTime<Utc>>` as an optional RFC3339 string
#[allow(clippy::ref_option)]
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize from RFC3339, MySQL datetime, or a Unix timestamp (seconds or millis)
///
/// Empty strings and the MySQL zero date become `None`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OptionalTimestamp {
        String(String),
        I64(i64),
        U64(u64),
    }

    match Option::<OptionalTimestamp>::deserialize(deserializer)? {
        Some(OptionalTimestamp::String(s)) => parse_datetime_str(&s)
            .map_err(|()| Error::custom(format!("Invalid timestamp: {s}"))),
        Some(OptionalTimestamp::I64(ts)) => parse_unix_timestamp(ts)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        Some(OptionalTimestamp::U64(ts)) => i64::try_from(ts)
            .ok()
            .and_then(parse_unix_timestamp)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        None => Ok(None),
    }
}

fn parse_datetime_str(s: &str) -> Result<Option<DateTime<Utc>>, ()> {
    let s = s.trim();
    if s.is_empty() || s.starts_with("0000-00-00") {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(s, MYSQL_DATETIME_FORMAT)
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| ())
}

/// Parse a timestamp string outside of serde.
///
/// Accepts the same formats as [`deserialize`] plus a bare `YYYY-MM-DD` date
/// (midnight UTC). Returns `None` for empty, zero or unparseable input.
pub fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    parse_datetime_str(s).ok().flatten().or_else(|| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|n| n.and_utc())
    })
}

/// Parse a Unix timestamp, treating values above 10^11 as milliseconds
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
