use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use favsync::config::{Config, DEFAULT_REDIS_URL, SPOTIFY_API_URL};
use favsync::error::ConfigError;
use favsync::utils::*;

// Helper building a complete set of required variables
fn base_env() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("DEEZER_CLIENT_ID", "dz-id"),
        ("DEEZER_SECRET_KEY", "dz-secret"),
        ("SPOTIFY_CLIENT_ID", "sp-id"),
        ("SPOTIFY_SECRET_KEY", "sp-secret"),
    ])
}

fn config_from(env: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
    Config::from_lookup(|name| env.get(name).map(|v| v.to_string()))
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two flows never share a state
    assert_ne!(state, generate_state());
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(431), "7m11s");
    assert_eq!(format_duration(59), "0m59s");
    assert_eq!(format_duration(0), "0m0s");
    assert_eq!(format_duration_ms(431_999), "7m11s");
}

#[test]
fn test_run_log_filename() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 4, 59).unwrap();
    assert_eq!(run_log_filename(&at), "Import 2024-03-01.18-04-59.txt");
}

#[test]
fn test_default_playlist_name() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 4, 59).unwrap();
    assert_eq!(
        default_playlist_name(&at),
        "Import from Deezer (01/03/2024 18:04:59)"
    );
}

#[test]
fn test_field_query() {
    assert_eq!(
        field_query("The Beatles", "Hey Jude"),
        "artist:\"The Beatles\" track:\"Hey Jude\""
    );
}

#[test]
fn test_config_defaults() {
    let config = config_from(&base_env()).unwrap();

    assert_eq!(config.deezer.client_id, "dz-id");
    assert_eq!(config.spotify.client_secret, "sp-secret");
    assert_eq!(
        config.deezer.redirect_url.as_str(),
        "http://127.0.0.1:8081/callback"
    );
    assert_eq!(config.spotify.redirect_url.port(), Some(8080));
    assert_eq!(config.spotify.api_url, SPOTIFY_API_URL);
    assert_eq!(config.redis_url, DEFAULT_REDIS_URL);
    assert_eq!(config.spotify_market, None);
}

#[test]
fn test_config_overrides() {
    let mut env = base_env();
    env.insert("SPOTIFY_TARGET_MARKET", " fr ");
    env.insert("SPOTIFY_REDIRECT_URI", "http://127.0.0.1:9090/spotify");
    env.insert("REDIS_URL", "redis://cache:6379/2");

    let config = config_from(&env).unwrap();
    assert_eq!(config.spotify_market.as_deref(), Some("FR"));
    assert_eq!(config.spotify.redirect_url.path(), "/spotify");
    assert_eq!(config.redis_url, "redis://cache:6379/2");
}

#[test]
fn test_config_missing_variable() {
    let mut env = base_env();
    env.remove("SPOTIFY_SECRET_KEY");
    assert!(matches!(
        config_from(&env),
        Err(ConfigError::Missing("SPOTIFY_SECRET_KEY"))
    ));

    // Blank values count as missing
    let mut env = base_env();
    env.insert("DEEZER_CLIENT_ID", "  ");
    assert!(matches!(
        config_from(&env),
        Err(ConfigError::Missing("DEEZER_CLIENT_ID"))
    ));
}

#[test]
fn test_config_invalid_redirect() {
    let mut env = base_env();
    env.insert("DEEZER_REDIRECT_URI", "not a url");
    assert!(matches!(
        config_from(&env),
        Err(ConfigError::InvalidUrl {
            name: "DEEZER_REDIRECT_URI",
            ..
        })
    ));
}

#[test]
fn test_default_redirects_use_listener_address() {
    let config = config_from(&base_env()).unwrap();

    // The callback listeners bind 127.0.0.1 only
    for redirect in [&config.deezer.redirect_url, &config.spotify.redirect_url] {
        assert_eq!(
            redirect.host(),
            Some(url::Host::Ipv4(std::net::Ipv4Addr::LOCALHOST))
        );
    }
}
