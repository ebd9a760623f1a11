//! Search and filtering over the event store.
//!
//! Everything here is a pure function of (records, query, week start), so
//! whatever owns the search box can call [`filter`] on every keystroke.
//!
//! The pipeline, in order:
//! 1. keep records starting on/after the current week's Monday 00:00
//! 2. split the query into room words, building words and free text
//! 3. with free text: fuzzy-match descriptions, keep hits in the wanted
//!    rooms/buildings, then keep only the top score tier
//! 4. without free text: keep records in the wanted rooms/buildings
//! 5. sort by start time and cap the result

mod fuzzy;
mod query;

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::ics::resolve_local;
use crate::store::EventRecord;

pub use fuzzy::{SearchHit, SearchIndex};
pub use query::FilterState;

pub const DEFAULT_THRESHOLD: f64 = 0.2;
pub const DEFAULT_MAX_RESULTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Minimum fuzzy score for a description hit
    pub threshold: f64,
    /// Result cap
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            threshold: DEFAULT_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Filtered, chronologically sorted, capped records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterResult {
    pub events: Vec<EventRecord>,
    /// More records matched than the cap allowed
    pub too_many_events: bool,
}

/// Monday 00:00 (in `tz`) of the week containing `now`.
pub fn week_start(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let today = now.with_timezone(&tz).date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let midnight = monday.and_time(chrono::NaiveTime::MIN);

    resolve_local(&midnight, tz).unwrap_or_else(|| midnight.and_utc())
}

/// Records starting on/after `week_start`.
pub fn working_set(records: &[EventRecord], week_start: DateTime<Utc>) -> Vec<EventRecord> {
    records
        .iter()
        .filter(|r| r.start() >= week_start)
        .cloned()
        .collect()
}

/// The working set with its lookup structures, built once and queried
/// many times.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    records: Vec<EventRecord>,
    rooms: HashSet<String>,
    buildings: HashSet<String>,
    index: SearchIndex,
}

impl SearchEngine {
    pub fn new(records: &[EventRecord], week_start: DateTime<Utc>) -> Self {
        let records = working_set(records, week_start);
        let rooms = records
            .iter()
            .map(|r| r.location.room.to_lowercase())
            .collect();
        let buildings = records
            .iter()
            .map(|r| r.location.building.to_lowercase())
            .collect();
        let index = SearchIndex::new(&records);

        SearchEngine {
            records,
            rooms,
            buildings,
            index,
        }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn filter_state(&self, query: &str) -> FilterState {
        FilterState::parse(query, &self.rooms, &self.buildings)
    }

    pub fn filter(&self, query: &str, options: &SearchOptions) -> FilterResult {
        let state = self.filter_state(query);

        let mut events: Vec<EventRecord> = if state.has_description() {
            let hits = self.index.search(&state.description, options.threshold);
            plateau_cut(hits, |i| state.matches_location(&self.records[i]))
                .into_iter()
                .map(|i| self.records[i].clone())
                .collect()
        } else {
            self.records
                .iter()
                .filter(|r| state.matches_location(r))
                .cloned()
                .collect()
        };

        events.sort_by_key(|r| r.start());

        let too_many_events = events.len() > options.max_results;
        events.truncate(options.max_results);

        FilterResult {
            events,
            too_many_events,
        }
    }
}

/// Run the whole pipeline once.
pub fn filter(
    records: &[EventRecord],
    query: &str,
    week_start: DateTime<Utc>,
    options: &SearchOptions,
) -> FilterResult {
    SearchEngine::new(records, week_start).filter(query, options)
}

/// Indices of the accepted hits sharing the best score.
///
/// `hits` must be sorted best first. Rejected hits are skipped before the
/// best score is taken; scanning stops at the first accepted hit scoring
/// strictly lower than it.
pub fn plateau_cut(
    hits: impl IntoIterator<Item = SearchHit>,
    accept: impl Fn(usize) -> bool,
) -> Vec<usize> {
    let mut best: Option<f64> = None;
    let mut kept = Vec::new();

    for hit in hits {
        if !accept(hit.index) {
            continue;
        }
        let best_score = *best.get_or_insert(hit.score);
        if hit.score < best_score {
            break;
        }
        kept.push(hit.index);
    }

    kept
}
