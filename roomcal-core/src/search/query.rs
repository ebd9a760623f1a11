//! Splitting a search query into room, building and description parts.

use std::collections::HashSet;

use serde::Serialize;

use crate::store::EventRecord;

/// A query broken down against the rooms and buildings that exist.
///
/// Room and building lists hold lowercase names; an empty list puts no
/// constraint on that facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub rooms: Vec<String>,
    pub buildings: Vec<String>,
    /// Everything that isn't a room or building, joined with single spaces
    pub description: String,
}

impl FilterState {
    /// `rooms` and `buildings` must hold lowercase names. A word naming
    /// both a room and a building counts toward both.
    pub fn parse(query: &str, rooms: &HashSet<String>, buildings: &HashSet<String>) -> Self {
        let mut state = FilterState::default();
        let mut rest = Vec::new();

        for word in query.split_whitespace() {
            let lower = word.to_lowercase();
            let is_room = rooms.contains(&lower);
            let is_building = buildings.contains(&lower);

            if is_room {
                state.rooms.push(lower.clone());
            }
            if is_building {
                state.buildings.push(lower);
            }
            if !is_room && !is_building {
                rest.push(word);
            }
        }

        state.description = rest.join(" ");
        state
    }

    /// Whether the record's room and building satisfy both facets.
    pub fn matches_location(&self, record: &EventRecord) -> bool {
        let room_ok = self.rooms.is_empty()
            || self.rooms.contains(&record.location.room.to_lowercase());
        let building_ok = self.buildings.is_empty()
            || self.buildings.contains(&record.location.building.to_lowercase());
        room_ok && building_ok
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationToken;
    use crate::store::{EventInstant, StoredEvent};
    use chrono::{TimeZone, Utc};

    fn names(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn record(building: &str, room: &str) -> EventRecord {
        EventRecord {
            location: LocationToken::new(building, room),
            event: StoredEvent {
                uid: "uid".to_string(),
                summary: "summary".to_string(),
                description: None,
                start: EventInstant {
                    date: Utc.with_ymd_and_hms(2025, 3, 17, 8, 0, 0).unwrap(),
                },
                end: None,
            },
        }
    }

    #[test]
    fn test_parse_partitions_words() {
        let state = FilterState::parse(
            "  A123   linear\talgebra Exactum ",
            &names(&["a123", "b201"]),
            &names(&["exactum"]),
        );

        assert_eq!(state.rooms, vec!["a123"]);
        assert_eq!(state.buildings, vec!["exactum"]);
        assert_eq!(state.description, "linear algebra");
    }

    #[test]
    fn test_parse_word_in_both_facets() {
        let state = FilterState::parse("Physicum", &names(&["physicum"]), &names(&["physicum"]));

        assert_eq!(state.rooms, vec!["physicum"]);
        assert_eq!(state.buildings, vec!["physicum"]);
        assert!(!state.has_description());
    }

    #[test]
    fn test_parse_empty_query() {
        let state = FilterState::parse("   ", &names(&["a123"]), &names(&[]));
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_matches_location_is_case_insensitive() {
        let state = FilterState::parse("a123", &names(&["a123"]), &names(&[]));

        assert!(state.matches_location(&record("Building13", "A123")));
        assert!(state.matches_location(&record("Other", "a123")));
        assert!(!state.matches_location(&record("Building13", "B201")));
    }

    #[test]
    fn test_matches_location_requires_both_facets() {
        let state = FilterState::parse(
            "a123 exactum",
            &names(&["a123"]),
            &names(&["exactum", "physicum"]),
        );

        assert!(state.matches_location(&record("Exactum", "A123")));
        assert!(!state.matches_location(&record("Physicum", "A123")));
        assert!(!state.matches_location(&record("Exactum", "B201")));
    }

    #[test]
    fn test_no_facets_matches_everything() {
        let state = FilterState::default();
        assert!(state.matches_location(&record("Anything", "Anywhere")));
    }
}
