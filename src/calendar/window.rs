//! Time windows, the reservation overlap test and the record TTL formula.

use chrono::NaiveDateTime;

use super::errors::{CalendarError, CalendarResult};

/// Wire format of every date field
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// TTL multiplier applied per remaining day.
///
/// Kept as the stored contract: `days * 60 * 24 * 30`. This does not yield
/// seconds and is likely a unit mix-up, but existing records carry it.
pub const TTL_PER_DAY: i64 = 60 * 24 * 30;

/// Parse a `yyyy-MM-dd HH:mm` timestamp
pub fn parse_date(field: &'static str, raw: &str) -> CalendarResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map_err(|e| CalendarError::InvalidDate {
        field,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Record TTL derived from an end date: whole days from `now` to `end`
/// (truncated toward zero, negative when `end` is past) times
/// [`TTL_PER_DAY`].
pub fn ttl_until(end: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (end - now).num_days() * TTL_PER_DAY
}

/// Which overlap rule matched between an existing and a requested window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// Existing window fully covers the request
    Containment,
    /// Existing window starts inside the request
    Right,
    /// Existing window starts before the request and reaches into it
    Left,
}

/// Closed interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CalendarResult<Self> {
        if start > end {
            return Err(CalendarError::InvalidWindow {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from wire strings
    pub fn parse(start: &str, end: &str) -> CalendarResult<Self> {
        Self::new(parse_date("startDate", start)?, parse_date("endDate", end)?)
    }

    /// Whether `other` lies entirely inside this window
    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Test this (existing) window against a `requested` one.
    ///
    /// Rules are checked in order containment, right, left; bounds are
    /// inclusive so windows sharing an endpoint overlap.
    pub fn overlap_with(&self, requested: &TimeWindow) -> Option<Overlap> {
        if self.start <= requested.start && self.end >= requested.end {
            Some(Overlap::Containment)
        } else if self.start >= requested.start && self.start <= requested.end {
            Some(Overlap::Right)
        } else if self.start <= requested.start && self.end >= requested.start {
            Some(Overlap::Left)
        } else {
            None
        }
    }
}
