//! Timestamp normalization shared by the add and delete paths.

use crate::error::{NoticalError, NoticalResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

// Accepted naive forms, tried in order after RFC 3339 fails.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO-8601 string into the configured timezone.
///
/// A string carrying an offset is converted into `tz`; one without is taken
/// as local to `tz`. Date-only input means local midnight. Anything
/// malformed, or a local time that does not exist or is ambiguous around a
/// DST transition, is an `InvalidTimestamp` carrying the offending literal.
pub fn normalize_timestamp(value: &str, tz: Tz) -> NoticalResult<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&tz));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| NoticalError::InvalidTimestamp {
            value: value.to_string(),
        })?;

    tz.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| NoticalError::InvalidTimestamp {
            value: value.to_string(),
        })
}
