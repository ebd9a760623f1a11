//! roomcal configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RoomcalError, RoomcalResult};
use crate::location::ExtractionPolicy;

/// Mode value that routes the feed loader to the remote URL.
pub const PRODUCTION_MODE: &str = "production";

static DEFAULT_MODE: &str = "development";
static DEFAULT_REMOTE_URL: &str = "https://optime.helsinki.fi/icalservice/Building/13";
static DEFAULT_LOCAL_PATH: &str = "building13.ics";
static DEFAULT_TIMEZONE: &str = "Europe/Helsinki";
static DEFAULT_BIND_ADDR: &str = "127.0.0.1:4321";

fn default_mode() -> String {
    DEFAULT_MODE.to_string()
}

fn default_remote_url() -> Url {
    Url::parse(DEFAULT_REMOTE_URL).expect("default remote URL is valid")
}

fn default_local_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOCAL_PATH)
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_fuzzy_threshold() -> f64 {
    0.2
}

fn default_max_results() -> usize {
    1000
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

/// Configuration at ~/.config/roomcal/config.toml, overridable with
/// `ROOMCAL_*` environment variables (e.g. `ROOMCAL_MODE=production`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoomcalConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_remote_url")]
    pub remote_url: Url,

    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,

    /// IANA name used for floating times and the start of the week
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub extraction_policy: ExtractionPolicy,

    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rebuild the server's snapshot this often. Unset means once at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_secs: Option<u64>,
}

impl Default for RoomcalConfig {
    fn default() -> Self {
        RoomcalConfig {
            mode: default_mode(),
            remote_url: default_remote_url(),
            local_path: default_local_path(),
            timezone: default_timezone(),
            extraction_policy: ExtractionPolicy::default(),
            fuzzy_threshold: default_fuzzy_threshold(),
            max_results: default_max_results(),
            bind_addr: default_bind_addr(),
            refresh_interval_secs: None,
        }
    }
}

impl RoomcalConfig {
    pub fn config_path() -> RoomcalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RoomcalError::Config("Could not determine config directory".into()))?
            .join("roomcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file
    /// on first use.
    pub fn load() -> RoomcalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> RoomcalResult<Self> {
        let config: RoomcalConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("ROOMCAL"))
            .build()
            .map_err(|e| RoomcalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| RoomcalError::Config(e.to_string()))?;

        config.tz()?;
        Ok(config)
    }

    pub fn tz(&self) -> RoomcalResult<Tz> {
        Tz::from_str(&self.timezone)
            .map_err(|_| RoomcalError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    /// `local_path` with a leading `~` expanded.
    pub fn expanded_local_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.local_path.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> RoomcalResult<()> {
        let contents = format!(
            "\
# roomcal configuration

# \"production\" fetches the remote feed, anything else reads local_path:
# mode = \"{DEFAULT_MODE}\"

# remote_url = \"{DEFAULT_REMOTE_URL}\"
# local_path = \"{DEFAULT_LOCAL_PATH}\"

# Timezone for floating times and week boundaries:
# timezone = \"{DEFAULT_TIMEZONE}\"

# What to do with events booked in several rooms (\"single-only\" or \"explode\"):
# extraction_policy = \"single-only\"

# fuzzy_threshold = 0.2
# max_results = 1000

# bind_addr = \"{DEFAULT_BIND_ADDR}\"
# refresh_interval_secs = 3600
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RoomcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RoomcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
