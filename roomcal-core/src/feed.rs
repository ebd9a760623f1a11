//! Feed loading: one blocking fetch-or-read per invocation.

use std::path::{Path, PathBuf};

use tracing::info;
use url::Url;

use crate::config::RoomcalConfig;
use crate::error::{RoomcalError, RoomcalResult};

/// Where the raw ICS text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Remote(Url),
    Local(PathBuf),
}

impl FeedSource {
    /// `"production"` reads the remote feed; every other mode reads the
    /// local file.
    pub fn from_mode(mode: &str, config: &RoomcalConfig) -> Self {
        if mode == crate::config::PRODUCTION_MODE {
            info!("Production mode detected, fetching data from remote...");
            FeedSource::Remote(config.remote_url.clone())
        } else {
            info!("Development mode detected, fetching data from disk...");
            FeedSource::Local(config.expanded_local_path())
        }
    }

    pub fn from_config(config: &RoomcalConfig) -> Self {
        Self::from_mode(&config.mode, config)
    }

    /// Fetch the feed text. Single attempt, no retry.
    pub async fn load(&self) -> RoomcalResult<String> {
        match self {
            FeedSource::Remote(url) => fetch_remote(url).await,
            FeedSource::Local(path) => read_local(path).await,
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::Remote(url) => write!(f, "{}", url),
            FeedSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

async fn fetch_remote(url: &Url) -> RoomcalResult<String> {
    info!("Fetching events from remote {}, this may take a while...", url);

    let resp = reqwest::get(url.clone()).await?;
    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(RoomcalError::Fetch(status.as_u16()));
    }

    Ok(resp.text().await?)
}

async fn read_local(path: &Path) -> RoomcalResult<String> {
    info!("Reading events from path: {}...", path.display());
    Ok(tokio::fs::read_to_string(path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_mode_selects_source() {
        let config = RoomcalConfig::default();

        assert_eq!(
            FeedSource::from_mode("production", &config),
            FeedSource::Remote(config.remote_url.clone())
        );
        assert_eq!(
            FeedSource::from_mode("development", &config),
            FeedSource::Local(config.expanded_local_path())
        );
        assert_eq!(
            FeedSource::from_mode("staging", &config),
            FeedSource::Local(config.expanded_local_path())
        );
    }

    #[tokio::test]
    async fn test_remote_feed_is_returned_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/icalservice/Building/13"))
            .respond_with(ResponseTemplate::new(200).set_body_string("BEGIN:VCALENDAR"))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/icalservice/Building/13", server.uri())).unwrap();
        let text = FeedSource::Remote(url).load().await.unwrap();
        assert_eq!(text, "BEGIN:VCALENDAR");
    }

    #[tokio::test]
    async fn test_remote_non_200_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let result = FeedSource::Remote(url).load().await;
        assert!(matches!(result, Err(RoomcalError::Fetch(404))));
    }

    #[tokio::test]
    async fn test_remote_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        assert!(FeedSource::Remote(url).load().await.is_err());
        // MockServer verifies the expect(1) on drop
    }

    #[tokio::test]
    async fn test_local_feed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("building13.ics");
        std::fs::write(&file, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();

        let text = FeedSource::Local(file).load().await.unwrap();
        assert!(text.starts_with("BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn test_missing_local_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FeedSource::Local(dir.path().join("missing.ics")).load().await;
        assert!(matches!(result, Err(RoomcalError::Io(_))));
    }
}
