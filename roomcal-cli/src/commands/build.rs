use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use roomcal_core::{FeedSource, RoomcalConfig};

use crate::utils::tui::create_spinner;

pub async fn run(config: &RoomcalConfig, out: &Path) -> Result<()> {
    let source = FeedSource::from_config(config);

    let spinner = create_spinner(format!("Loading {}", source));
    let result = roomcal_core::refresh(&source, config).await;
    spinner.finish_and_clear();

    let store = result?;
    store.write_payload(out)?;

    println!(
        "{} {} records to {}",
        "Wrote".green(),
        store.len(),
        out.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
SUMMARY:Seminar\r\n\
LOCATION:Exactum\\, A123\r\n\
DTSTART:20250317T080000Z\r\n\
DTEND:20250317T100000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[tokio::test]
    async fn test_build_writes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("building13.ics");
        std::fs::write(&feed, FEED).unwrap();
        let out = dir.path().join("dist").join("events.json");

        let config = RoomcalConfig {
            local_path: feed,
            ..RoomcalConfig::default()
        };
        run(&config, &out).await.unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        let store = roomcal_core::EventStore::from_json(&written).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].location.room, "A123");
    }

    #[tokio::test]
    async fn test_build_fails_on_missing_feed() {
        let dir = tempfile::tempdir().unwrap();
        let config = RoomcalConfig {
            local_path: dir.path().join("missing.ics"),
            ..RoomcalConfig::default()
        };
        assert!(run(&config, &dir.path().join("events.json")).await.is_err());
    }
}
