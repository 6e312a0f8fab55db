use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

use super::LedgerError;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parses a wall-clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(raw: &str) -> Result<NaiveTime, LedgerError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| LedgerError::InvalidClock(raw.to_string()))
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its calendar date is
/// taken as written, without shifting time zones).
pub fn parse_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}

/// Lower bound of a date filter. Entries are dated at midnight UTC, so a
/// timestamp past midnight only admits the following days.
pub fn parse_start_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    let (date, past_midnight) = parse_bound(raw)?;
    if past_midnight {
        date.succ_opt()
            .ok_or_else(|| LedgerError::InvalidDate(raw.to_string()))
    } else {
        Ok(date)
    }
}

/// Upper bound of a date filter: the UTC date of the instant.
pub fn parse_end_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    parse_bound(raw).map(|(date, _)| date)
}

fn parse_bound(raw: &str) -> Result<(NaiveDate, bool), LedgerError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok((date, false));
    }
    let instant = DateTime::parse_from_rfc3339(trimmed)
        .map_err(|_| LedgerError::InvalidDate(raw.to_string()))?
        .with_timezone(&Utc);
    let past_midnight = instant.num_seconds_from_midnight() > 0 || instant.nanosecond() > 0;
    Ok((instant.date_naive(), past_midnight))
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(raw: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidMonth(raw.to_string()))
}

/// Minutes worked between two clock times. Seconds are ignored and an end
/// before the start rolls over midnight.
pub fn shift_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let start = i64::from(start.hour()) * 60 + i64::from(start.minute());
    let end = i64::from(end.hour()) * 60 + i64::from(end.minute());
    let diff = end - start;
    if diff < 0 { diff + MINUTES_PER_DAY } else { diff }
}

pub fn shift_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    round2(shift_minutes(start, end) as f64 / 60.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
