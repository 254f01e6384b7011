use std::{path::PathBuf, str::FromStr, time::Duration};

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub tracker: TrackerSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub timeout_ms: u64,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct TrackerSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub tick_interval_ms: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl TrackerSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// `<config dir>/servitech`, where the user config, session and log live.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("servitech"))
}

pub fn user_config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Load settings from, in increasing priority: built-in defaults,
/// `config/base.yaml`, `config/{APP_ENVIRONMENT}.yaml`, the user's
/// `config.toml` and `SERVITECH_*` environment variables.
pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| config::ConfigError::Message(format!("Failed to parse APP_ENVIRONMENT: {}", e)))?;
    let environment_filename = format!("{}.yaml", environment);

    let mut builder = config::Config::builder()
        .set_default("api.base_url", "http://localhost:8000")?
        .set_default("api.timeout_ms", 5000_i64)?
        .set_default("tracker.tick_interval_ms", 1000_i64)?
        .add_source(config::File::from(config_directory.join("base.yaml")).required(false))
        .add_source(
            config::File::from(config_directory.join(environment_filename)).required(false),
        );

    if let Some(user_file) = user_config_file() {
        builder = builder.add_source(config::File::from(user_file).required(false));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("SERVITECH")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
