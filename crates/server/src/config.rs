use std::{collections::HashMap, fs, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub seed_heroes: bool,
    pub response_delay: Duration,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            seed_heroes: true,
            response_delay: Duration::ZERO,
            max_body_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    seed_heroes: Option<bool>,
    response_delay_ms: Option<u64>,
    max_body_bytes: Option<usize>,
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    let env: HashMap<String, String> = std::env::vars().collect();
    settings_from_sources(raw.as_deref(), &env)
}

/// Defaults, then `server.toml`, then environment variables.
pub fn settings_from_sources(raw_file: Option<&str>, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = raw_file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.seed_heroes {
                    settings.seed_heroes = v;
                }
                if let Some(v) = file_cfg.response_delay_ms {
                    settings.response_delay = Duration::from_millis(v);
                }
                if let Some(v) = file_cfg.max_body_bytes {
                    settings.max_body_bytes = v;
                }
            }
            Err(error) => warn!(file = SETTINGS_FILE, %error, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env.get("SERVER_BIND") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = env.get("APP__BIND_ADDR") {
        settings.server_bind = v.clone();
    }

    if let Some(v) = parsed_env::<bool>(env, "APP__SEED_HEROES") {
        settings.seed_heroes = v;
    }
    if let Some(v) = parsed_env::<u64>(env, "APP__RESPONSE_DELAY_MS") {
        settings.response_delay = Duration::from_millis(v);
    }
    if let Some(v) = parsed_env::<usize>(env, "APP__MAX_BODY_BYTES") {
        settings.max_body_bytes = v;
    }

    settings
}

fn parsed_env<T: std::str::FromStr>(env: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = env.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
