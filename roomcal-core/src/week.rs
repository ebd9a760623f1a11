//! Bucketing search results into a Monday-to-Sunday week plus "later".

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::search::FilterResult;
use crate::store::EventRecord;

pub const DAYS_IN_WEEK: usize = 7;

/// One week of results. Days are fixed 24h slices from `week_start`.
#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub week_start: DateTime<Utc>,
    /// Monday first
    pub days: [Vec<EventRecord>; DAYS_IN_WEEK],
    /// Everything at or after `week_start + 7 * 24h`
    pub later: Vec<EventRecord>,
    pub too_many_events: bool,
    /// Number of records in the filter result
    pub total: usize,
}

impl WeekView {
    /// Records before `week_start` are not shown anywhere.
    pub fn bucket(result: FilterResult, week_start: DateTime<Utc>) -> Self {
        let mut days: [Vec<EventRecord>; DAYS_IN_WEEK] = Default::default();
        let mut later = Vec::new();
        let total = result.events.len();

        for record in result.events {
            match day_index(record.start(), week_start) {
                Some(i) if i < DAYS_IN_WEEK => days[i].push(record),
                Some(_) => later.push(record),
                None => {}
            }
        }

        WeekView {
            week_start,
            days,
            later,
            too_many_events: result.too_many_events,
            total,
        }
    }
}

fn day_index(start: DateTime<Utc>, week_start: DateTime<Utc>) -> Option<usize> {
    if start < week_start {
        return None;
    }
    usize::try_from((start - week_start).num_hours() / 24).ok()
}
