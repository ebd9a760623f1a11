//! ICS feed parsing.
//!
//! This module turns raw feed text into [`CalendarEvent`](crate::event::CalendarEvent)s
//! according to RFC 5545. Generation is not supported.

mod parse;

pub use parse::{ParsedCalendar, parse_calendar};
pub(crate) use parse::resolve_local;
