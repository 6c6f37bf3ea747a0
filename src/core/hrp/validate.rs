//! Timestamp checks for submitted HRP clock events.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Local, NaiveDateTime};

/// Look-ahead accepted when no configuration overrides it.
pub const DEFAULT_LOOKAHEAD_MINUTES: i64 = 45;

/// Largest configurable look-ahead (one day).
pub const MAX_LOOKAHEAD_MINUTES: i64 = 24 * 60;

/// Reject look-ahead values outside `0..=MAX_LOOKAHEAD_MINUTES`.
pub fn check_lookahead(minutes: i64) -> AppResult<Duration> {
    if !(0..=MAX_LOOKAHEAD_MINUTES).contains(&minutes) {
        return Err(AppError::Config(format!(
            "hrp_lookahead_minutes must lie between 0 and {}, got {}",
            MAX_LOOKAHEAD_MINUTES, minutes
        )));
    }
    Duration::try_minutes(minutes)
        .ok_or_else(|| AppError::Config(format!("hrp_lookahead_minutes {} overflows", minutes)))
}

/// Wall-clock layouts accepted besides RFC 3339; read as local time.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a submitted timestamp into a local instant.
pub fn parse_timestamp(input: &str) -> AppResult<DateTime<Local>> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AppError::EmptyInput);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local));
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        // a wall-clock time skipped by a DST jump does not exist
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .ok_or_else(|| AppError::MalformedTimestamp(s.to_string()))
}

/// Validate `input` against an explicit clock.
///
/// Fails with `EmptyInput`, `MalformedTimestamp`, or `TooFarInFuture`
/// when the instant lies strictly after `now + lookahead_minutes`. An
/// out-of-range look-ahead is a `Config` error.
pub fn validate_timestamp_at(
    input: &str,
    now: DateTime<Local>,
    lookahead_minutes: i64,
) -> AppResult<DateTime<Local>> {
    let lookahead = check_lookahead(lookahead_minutes)?;
    let ts = parse_timestamp(input)?;

    let limit = now
        .checked_add_signed(lookahead)
        .ok_or_else(|| AppError::InvalidDate(now.to_rfc3339()))?;
    if ts > limit {
        return Err(AppError::TooFarInFuture(ts.to_rfc3339()));
    }

    Ok(ts)
}

/// Validate `input` against the current time and the default look-ahead.
pub fn validate_timestamp(input: &str) -> AppResult<DateTime<Local>> {
    validate_timestamp_at(input, Local::now(), DEFAULT_LOOKAHEAD_MINUTES)
}
