//! Calendar events as they come out of the feed.
//!
//! These are read-only downstream: the location extractor and the event
//! store only ever look at them, never change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single VEVENT from the feed, with times resolved to UTC instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Free-text LOCATION, e.g. "Building13, A123"
    pub location: Option<String>,
}

impl CalendarEvent {
    /// Returns the location, start and end only if all three are present.
    ///
    /// Events missing any of them take no part in the event store.
    pub fn bookable(&self) -> Option<(&str, DateTime<Utc>, DateTime<Utc>)> {
        Some((self.location.as_deref()?, self.start?, self.end?))
    }
}
