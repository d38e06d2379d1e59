//! Service configuration.
//!
//! Values are layered, later sources winning:
//! built-in defaults, then `~/.config/deskstatus/config.toml` (or the file
//! passed explicitly), then `DESKSTATUS_*` environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{DeskStatusError, DeskStatusResult};

const ENV_PREFIX: &str = "DESKSTATUS";

/// Ten years.
const MAX_MESSAGE_RETENTION_HOURS: i64 = 24 * 365 * 10;

fn default_timezone() -> Tz {
    chrono_tz::Europe::London
}

fn default_fetch_timeout_secs() -> u64 {
    5
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_message_retention_hours() -> i64 {
    24
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeskStatusConfig {
    /// ICS feed to read presence from
    pub calendar_url: Option<String>,

    /// Reference zone for "today" and for displayed times
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Chat messages older than this are purged on read
    #[serde(default = "default_message_retention_hours")]
    pub message_retention_hours: i64,

    /// Bearer token required to post chat messages, when set
    pub admin_token: Option<String>,
}

impl DeskStatusConfig {
    pub fn config_path() -> DeskStatusResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DeskStatusError::Config("Could not determine config directory".into()))?
            .join("deskstatus");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location (optional) or from `path` (required).
    pub fn load(path: Option<&Path>) -> DeskStatusResult<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path()?, false),
        };

        let builder = Config::builder().add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(required),
        );

        Self::from_builder(builder)
    }

    /// Load from TOML text, still honouring environment overrides.
    pub fn from_toml_str(contents: &str) -> DeskStatusResult<Self> {
        Self::from_builder(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> DeskStatusResult<Self> {
        Self::from_layers(builder, Environment::with_prefix(ENV_PREFIX))
    }

    fn from_layers(
        builder: ConfigBuilder<DefaultState>,
        environment: Environment,
    ) -> DeskStatusResult<Self> {
        let config: DeskStatusConfig = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        if !(1..=MAX_MESSAGE_RETENTION_HOURS).contains(&config.message_retention_hours) {
            return Err(DeskStatusError::Config(format!(
                "message_retention_hours must be between 1 and {MAX_MESSAGE_RETENTION_HOURS}"
            )));
        }

        Ok(config)
    }

    pub fn calendar_url(&self) -> DeskStatusResult<&str> {
        self.calendar_url.as_deref().ok_or_else(|| {
            DeskStatusError::Config(format!(
                "calendar_url is not set (set it in the config file or {ENV_PREFIX}_CALENDAR_URL)"
            ))
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn message_retention(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.message_retention_hours).unwrap_or(chrono::Duration::MAX)
    }
}
