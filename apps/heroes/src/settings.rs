use std::{path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File, Map};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const SETTINGS_FILE: &str = "heroes.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliSettings {
    pub api_url: String,
    pub debounce_ms: u64,
    pub request_timeout_ms: u64,
}

impl CliSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Defaults, then the settings file if present, then `HEROES_*` variables.
///
/// `env` replaces the process environment when given.
pub fn load_settings(
    file: &Path,
    env: Option<Map<String, String>>,
) -> anyhow::Result<CliSettings> {
    let settings = Config::builder()
        .set_default("api_url", DEFAULT_API_URL)?
        .set_default("debounce_ms", 300)?
        .set_default("request_timeout_ms", 5_000)?
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix("HEROES")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .with_context(|| format!("failed to read settings from '{}'", file.display()))?;

    settings
        .try_deserialize()
        .context("invalid heroes settings")
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
