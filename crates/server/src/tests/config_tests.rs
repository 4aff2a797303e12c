use super::{settings_from_sources, Settings};

use std::{collections::HashMap, time::Duration};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn defaults_without_file_or_env() {
    assert_eq!(settings_from_sources(None, &HashMap::new()), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        bind_addr = "0.0.0.0:8080"
        seed_heroes = false
        response_delay_ms = 500
    "#;

    let settings = settings_from_sources(Some(raw), &HashMap::new());

    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert!(!settings.seed_heroes);
    assert_eq!(settings.response_delay, Duration::from_millis(500));
    assert_eq!(settings.max_body_bytes, Settings::default().max_body_bytes);
}

#[test]
fn env_overrides_file() {
    let raw = r#"bind_addr = "0.0.0.0:8080""#;
    let env = env(&[
        ("SERVER_BIND", "127.0.0.1:4000"),
        ("APP__BIND_ADDR", "127.0.0.1:5000"),
        ("APP__RESPONSE_DELAY_MS", "250"),
    ]);

    let settings = settings_from_sources(Some(raw), &env);

    assert_eq!(settings.server_bind, "127.0.0.1:5000");
    assert_eq!(settings.response_delay, Duration::from_millis(250));
}

#[test]
fn unparseable_values_are_ignored() {
    let env = env(&[
        ("APP__SEED_HEROES", "maybe"),
        ("APP__MAX_BODY_BYTES", "lots"),
    ]);

    let settings = settings_from_sources(Some("this is = = not toml"), &env);

    assert_eq!(settings, Settings::default());
}
