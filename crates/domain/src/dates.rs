// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Instant normalization.
//!
//! Every timestamp the engine stores is a UTC instant rendered as
//! `YYYY-MM-DDTHH:MM:SS.mmmZ`. Client input is more varied, so it is parsed
//! leniently here and always re-rendered in the canonical form.

use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// How far back a new date may move relative to the stored one.
///
/// Clients in different timezones routinely send dates that are a few hours
/// "earlier" than what the server recorded.
pub const DATE_DRIFT_TOLERANCE: Duration = Duration::hours(24);

const CANONICAL: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);
const NAIVE_FRACTIONAL: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const NAIVE_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_MINUTES: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DATE_ONLY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Failure to interpret a date input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// The input was empty.
    #[error("no date provided")]
    Empty,
    /// None of the accepted layouts matched.
    #[error("unrecognized date format")]
    Unrecognized,
    /// The instant could not be rendered.
    #[error("date cannot be represented: {0}")]
    Unrepresentable(String),
}

/// Parses a client-supplied date into a UTC instant.
///
/// Accepted layouts:
/// - RFC 3339 with an offset (`2026-03-01T10:00:00-03:00`)
/// - a naive date-time, with `T` or a space separator, read as UTC
/// - a bare date, read as midnight UTC
///
/// # Errors
///
/// Returns `DateParseError` if the input is empty or matches no layout.
pub fn parse_instant(input: &str) -> Result<OffsetDateTime, DateParseError> {
    let trimmed: &str = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(instant) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return to_utc(instant);
    }

    let naive: String = trimmed.replacen(' ', "T", 1);
    for layout in [NAIVE_FRACTIONAL, NAIVE_SECONDS, NAIVE_MINUTES] {
        if let Ok(value) = PrimitiveDateTime::parse(&naive, layout) {
            return Ok(value.assume_utc());
        }
    }

    Date::parse(trimmed, DATE_ONLY)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| DateParseError::Unrecognized)
}

/// Shifts an instant to UTC. Offsets near the edges of the supported range
/// can push the UTC value out of it.
fn to_utc(instant: OffsetDateTime) -> Result<OffsetDateTime, DateParseError> {
    instant.checked_to_offset(UtcOffset::UTC).ok_or_else(|| {
        DateParseError::Unrepresentable(String::from("outside the supported range in UTC"))
    })
}

/// Renders an instant in the canonical storage form.
///
/// # Errors
///
/// Returns `DateParseError::Unrepresentable` if the instant has no UTC
/// representation or formatting fails.
pub fn format_instant(instant: OffsetDateTime) -> Result<String, DateParseError> {
    to_utc(instant)?
        .format(CANONICAL)
        .map_err(|e| DateParseError::Unrepresentable(e.to_string()))
}

/// Parses and re-renders a client date in canonical form.
///
/// # Errors
///
/// Returns `DateParseError` if the input cannot be parsed.
pub fn normalize_instant(input: &str) -> Result<String, DateParseError> {
    format_instant(parse_instant(input)?)
}

/// Returns true if `requested` moves more than `DATE_DRIFT_TOLERANCE`
/// before `recorded`.
#[must_use]
pub fn is_before_tolerance(recorded: OffsetDateTime, requested: OffsetDateTime) -> bool {
    // Nothing lies before a floor below the supported range.
    recorded
        .checked_sub(DATE_DRIFT_TOLERANCE)
        .is_some_and(|floor| requested < floor)
}
