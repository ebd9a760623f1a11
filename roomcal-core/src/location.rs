//! Building/room extraction from free-text LOCATION fields.
//!
//! The feed writes locations as comma separated `building, room` pairs,
//! e.g. `"Building13, A123"`, sometimes several of them in one field:
//! `"Building13, A123, Building13, B201"`.

use serde::{Deserialize, Serialize};

/// A (building, room) pair. Both fields are trimmed; either may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationToken {
    pub building: String,
    pub room: String,
}

impl LocationToken {
    pub fn new(building: impl AsRef<str>, room: impl AsRef<str>) -> Self {
        LocationToken {
            building: building.as_ref().trim().to_string(),
            room: room.as_ref().trim().to_string(),
        }
    }
}

impl std::fmt::Display for LocationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.building, self.room)
    }
}

/// What to do with an event whose location yields several tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionPolicy {
    /// Keep the event only if exactly one token was extracted.
    #[default]
    SingleOnly,
    /// File the event under every extracted token.
    Explode,
}

impl ExtractionPolicy {
    pub fn apply(self, tokens: Vec<LocationToken>) -> Vec<LocationToken> {
        match self {
            ExtractionPolicy::SingleOnly if tokens.len() != 1 => Vec::new(),
            _ => tokens,
        }
    }
}

impl std::str::FromStr for ExtractionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-only" => Ok(ExtractionPolicy::SingleOnly),
            "explode" => Ok(ExtractionPolicy::Explode),
            other => Err(format!(
                "Unknown extraction policy '{}'. Expected 'single-only' or 'explode'",
                other
            )),
        }
    }
}

/// Split a location string into (building, room) tokens.
///
/// Fields are consumed two at a time: `"A,B,C,D"` gives `(A,B)` and `(C,D)`.
/// A separator right after the last pair is ignored. Any other leftover
/// field becomes a token with an empty room, so `"X, Y, Z"` counts as two
/// locations. A string without a comma gives no tokens.
pub fn extract(location: &str) -> Vec<LocationToken> {
    let mut fields: Vec<&str> = location.split(',').collect();
    if fields.len() < 2 {
        return Vec::new();
    }

    // A separator closing the last pair leaves an empty odd field behind
    if fields.len() % 2 == 1 && fields.last().is_some_and(|f| f.trim().is_empty()) {
        fields.pop();
    }

    fields
        .chunks(2)
        .map(|pair| match pair {
            [building, room] => LocationToken::new(building, room),
            [building] => LocationToken::new(building, ""),
            _ => unreachable!("chunks(2) yields one or two fields"),
        })
        .collect()
}
