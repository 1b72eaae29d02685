//! "Now" in a caller-chosen time zone, broken into calendar fields.
//!
//! Used to fill required date parameters (`month`, `year`,
//! `date_or_timestamp`) that the caller left unset. Every call reads the
//! clock again; nothing is cached.

use chrono::{DateTime, Datelike, Local, Utc};
use chrono_tz::Tz;

use crate::error::ClientError;

/// Calendar field computed from the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Year,
    /// 1-based month.
    Month,
    /// 1-based day of month.
    Day,
    /// Unix epoch seconds, truncated.
    Timestamp,
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Returns `field` of the current instant, in `zone` or the local zone.
///
/// # Errors
///
/// Returns [`ClientError::UnknownTimeZone`] if `zone` is not an IANA id.
pub fn now(field: DateField, zone: Option<&str>) -> Result<i64, ClientError> {
    field_at(SystemClock.now(), field, zone)
}

/// Returns `field` of `instant` viewed in `zone` (local zone when `None`).
///
/// A provided `zone` is always resolved, including for
/// [`DateField::Timestamp`] whose value does not depend on it.
///
/// # Errors
///
/// Returns [`ClientError::UnknownTimeZone`] if `zone` is not an IANA id.
pub fn field_at(
    instant: DateTime<Utc>,
    field: DateField,
    zone: Option<&str>,
) -> Result<i64, ClientError> {
    let date = match zone {
        Some(zone) => instant.with_timezone(&resolve_zone(zone)?).date_naive(),
        None => instant.with_timezone(&Local).date_naive(),
    };

    Ok(match field {
        DateField::Year => i64::from(date.year()),
        DateField::Month => i64::from(date.month()),
        DateField::Day => i64::from(date.day()),
        DateField::Timestamp => instant.timestamp(),
    })
}

/// Parses an IANA zone identifier.
///
/// # Errors
///
/// Returns [`ClientError::UnknownTimeZone`] for unknown identifiers.
pub fn resolve_zone(zone: &str) -> Result<Tz, ClientError> {
    zone.trim()
        .parse::<Tz>()
        .map_err(|_| ClientError::unknown_time_zone(zone))
}
