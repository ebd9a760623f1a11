//! The event store: a flat, immutable list of (location, event) records.
//!
//! The store is rebuilt from scratch on every refresh and is what gets
//! published as `events.json`.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RoomcalConfig;
use crate::error::{RoomcalError, RoomcalResult};
use crate::event::CalendarEvent;
use crate::feed::FeedSource;
use crate::ics::parse_calendar;
use crate::location::{ExtractionPolicy, LocationToken, extract};

/// Cache directive sent along with the payload.
pub const CACHE_CONTROL: &str = "max-age=3600";

/// A point in time as it appears in the payload: `{ "date": "<RFC 3339>" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInstant {
    pub date: DateTime<Utc>,
}

/// The event half of a record, in payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub uid: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventInstant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventInstant>,
}

/// One event filed under one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub location: LocationToken,
    pub event: StoredEvent,
}

impl EventRecord {
    pub fn start(&self) -> DateTime<Utc> {
        self.event.start.date
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.event.end.map(|e| e.date)
    }

    pub fn description(&self) -> &str {
        self.event.description.as_deref().unwrap_or("")
    }
}

/// An immutable snapshot of all records built from one feed load.
#[derive(Debug, Clone)]
pub struct EventStore {
    records: Vec<EventRecord>,
    refreshed_at: DateTime<Utc>,
}

impl EventStore {
    /// Build records from parsed events.
    ///
    /// `None` means the feed had no event container at all, which is an
    /// error; an empty list just gives an empty store.
    pub fn build(
        events: Option<&[CalendarEvent]>,
        policy: ExtractionPolicy,
    ) -> RoomcalResult<Self> {
        let events = events.ok_or(RoomcalError::NoEventContainer)?;

        let mut records = Vec::new();
        for event in events {
            let Some((location, start, end)) = event.bookable() else {
                debug!(uid = %event.uid, "skipping event without location, start or end");
                continue;
            };

            let tokens = policy.apply(extract(location));
            if tokens.is_empty() {
                debug!(uid = %event.uid, %location, "skipping event with unusable location");
                continue;
            }

            let stored = StoredEvent {
                uid: event.uid.clone(),
                summary: event.summary.clone(),
                description: event.description.clone(),
                start: EventInstant { date: start },
                end: Some(EventInstant { date: end }),
            };

            records.extend(tokens.into_iter().map(|location| EventRecord {
                location,
                event: stored.clone(),
            }));
        }

        Ok(EventStore {
            records,
            refreshed_at: Utc::now(),
        })
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    /// Serialize the records as the `events.json` payload.
    pub fn to_json(&self) -> RoomcalResult<String> {
        serde_json::to_string(&self.records).map_err(|e| RoomcalError::Serialization(e.to_string()))
    }

    /// Read a previously published payload back into a store.
    pub fn from_json(json: &str) -> RoomcalResult<Self> {
        let records: Vec<EventRecord> =
            serde_json::from_str(json).map_err(|e| RoomcalError::Serialization(e.to_string()))?;
        Ok(EventStore {
            records,
            refreshed_at: Utc::now(),
        })
    }

    /// Write the payload to `path` for static hosting.
    pub fn write_payload(&self, path: &Path) -> RoomcalResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Load, parse and build a fresh snapshot.
pub async fn refresh(source: &FeedSource, config: &RoomcalConfig) -> RoomcalResult<EventStore> {
    let content = source.load().await?;
    let parsed = parse_calendar(&content, config.tz()?)?;
    let store = EventStore::build(parsed.events.as_deref(), config.extraction_policy)?;

    info!(
        events = parsed.events.as_ref().map_or(0, |e| e.len()),
        records = store.len(),
        source = %source,
        "event store refreshed"
    );

    Ok(store)
}
