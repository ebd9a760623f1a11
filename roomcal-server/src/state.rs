use std::sync::Arc;

use anyhow::Result;
use roomcal_core::{EventStore, FeedSource, RoomcalConfig};
use tokio::sync::RwLock;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    config: Arc<RoomcalConfig>,
    source: FeedSource,
    // Each refresh swaps in a whole new snapshot; readers keep the one they got
    store: Arc<RwLock<Arc<EventStore>>>,
}

impl AppState {
    /// Load the feed once; failing here aborts startup.
    pub async fn new(config: RoomcalConfig) -> Result<Self> {
        let source = FeedSource::from_config(&config);
        let store = roomcal_core::refresh(&source, &config).await?;
        Ok(Self::with_store(config, source, store))
    }

    pub fn with_store(config: RoomcalConfig, source: FeedSource, store: EventStore) -> Self {
        AppState {
            config: Arc::new(config),
            source,
            store: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    pub fn config(&self) -> &RoomcalConfig {
        &self.config
    }

    pub async fn store(&self) -> Arc<EventStore> {
        self.store.read().await.clone()
    }

    /// Rebuild the snapshot from the feed. On failure the old snapshot stays.
    pub async fn refresh(&self) -> Result<()> {
        let store = roomcal_core::refresh(&self.source, &self.config).await?;
        *self.store.write().await = Arc::new(store);
        Ok(())
    }

    /// Refresh every `refresh_interval_secs`, if configured.
    pub fn spawn_refresh_loop(&self) {
        let Some(secs) = self.config.refresh_interval_secs else {
            return;
        };

        let state = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(secs));
            // The first tick fires immediately and startup already loaded the feed
            interval.tick().await;
            loop {
                interval.tick().await;
                match state.refresh().await {
                    Ok(()) => info!("scheduled refresh done"),
                    Err(e) => error!("scheduled refresh failed: {:#}", e),
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcal_core::{CalendarEvent, ExtractionPolicy};

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
SUMMARY:Seminar\r\n\
LOCATION:Building13\\, A123\r\n\
DTSTART:20250317T080000Z\r\n\
DTEND:20250317T100000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.ics");
        std::fs::write(&path, FEED).unwrap();

        let no_events: Vec<CalendarEvent> = Vec::new();
        let empty = EventStore::build(Some(no_events.as_slice()), ExtractionPolicy::SingleOnly)
            .unwrap();
        let state = AppState::with_store(
            RoomcalConfig::default(),
            FeedSource::Local(path),
            empty,
        );
        assert!(state.store().await.is_empty());

        state.refresh().await.unwrap();
        assert_eq!(state.store().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.ics");
        std::fs::write(&path, FEED).unwrap();

        let state = AppState::new(RoomcalConfig {
            local_path: path.clone(),
            ..RoomcalConfig::default()
        })
        .await
        .unwrap();
        assert_eq!(state.store().await.len(), 1);

        std::fs::remove_file(&path).unwrap();
        assert!(state.refresh().await.is_err());
        assert_eq!(state.store().await.len(), 1);
    }
}
