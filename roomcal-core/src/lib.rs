//! Core library for roomcal.
//!
//! Turns a building's room-booking ICS feed into a flat list of
//! (building, room, event) records and searches it:
//! - `feed` and `ics` load and parse the feed
//! - `location` extracts building/room pairs from LOCATION fields
//! - `store` builds and publishes the `events.json` snapshot
//! - `search` and `week` filter it and lay it out as a week

pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod ics;
pub mod location;
pub mod search;
pub mod share;
pub mod store;
pub mod week;

pub use config::RoomcalConfig;
pub use error::{RoomcalError, RoomcalResult};
pub use event::CalendarEvent;
pub use feed::FeedSource;
pub use location::{ExtractionPolicy, LocationToken};
pub use store::{EventRecord, EventStore, refresh};
