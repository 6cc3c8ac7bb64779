//! # Calendar Module
//!
//! Calendars, availability periods and reservations.
//!
//! A reservation is accepted against a period only if the period contains
//! the requested window and no reservation already bound to that period
//! overlaps it. Overlap is tested with three inclusive rules (see
//! [`TimeWindow::overlap_with`]).

mod errors;
mod locks;
mod model;
mod service;
mod window;

pub use errors::{CalendarError, CalendarResult, ErrorResponse};
pub use locks::PeriodLocks;
pub use model::{Calendar, Entity, Period, Reservation};
pub use service::{CalendarService, DEFAULT_CACHE_TTL};
pub use window::{parse_date, ttl_until, Overlap, TimeWindow, DATE_FORMAT, TTL_PER_DAY};
