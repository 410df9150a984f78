//! Configuration management for favsync.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. Everything is read once into a [`Config`] during start-up and then
//! passed by reference to the components that need it.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf};

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_DEEZER_REDIRECT_URI: &str = "http://127.0.0.1:8081/callback";
pub const DEFAULT_SPOTIFY_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

pub const DEEZER_AUTH_URL: &str = "https://connect.deezer.com/oauth/auth.php";
pub const DEEZER_TOKEN_URL: &str = "https://connect.deezer.com/oauth/access_token.php";
pub const DEEZER_API_URL: &str = "https://api.deezer.com";

pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from `.env` files.
///
/// Looks for `favsync/.env` in the platform-specific local data directory
/// first and then for `.env` in the working directory. Both files are
/// optional; variables already present in the environment are never
/// overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/favsync/.env`
/// - macOS: `~/Library/Application Support/favsync/.env`
/// - Windows: `%LOCALAPPDATA%/favsync/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        // a malformed file is as good as a missing one: required variables
        // are reported by Config::from_env
        let _ = dotenv::from_path(&path);
    }
    let _ = dotenv::dotenv();
    Ok(())
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("favsync/.env");
    path
}

/// OAuth client registration and endpoints for one service.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered with the service. Its port is
    /// the port the local callback listener binds.
    pub redirect_url: Url,
    pub auth_url: Url,
    pub token_url: Url,
    pub api_url: String,
}

/// Process-wide, read-only configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub deezer: ProviderConfig,
    pub spotify: ProviderConfig,
    /// ISO 3166-1 alpha-2 country used to restrict Spotify search results.
    pub spotify_market: Option<String>,
    pub redis_url: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] when a required variable is absent or empty
    /// - [`ConfigError::InvalidUrl`] when a URL variable does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));
        let url_or = |name: &'static str, default: &str| {
            let raw = get(name).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { name, source })
        };

        let deezer = ProviderConfig {
            client_id: required("DEEZER_CLIENT_ID")?,
            client_secret: required("DEEZER_SECRET_KEY")?,
            redirect_url: url_or("DEEZER_REDIRECT_URI", DEFAULT_DEEZER_REDIRECT_URI)?,
            auth_url: url_or("DEEZER_AUTH_URL", DEEZER_AUTH_URL)?,
            token_url: url_or("DEEZER_TOKEN_URL", DEEZER_TOKEN_URL)?,
            api_url: get("DEEZER_API_URL").unwrap_or_else(|| DEEZER_API_URL.to_string()),
        };

        let spotify = ProviderConfig {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_SECRET_KEY")?,
            redirect_url: url_or("SPOTIFY_REDIRECT_URI", DEFAULT_SPOTIFY_REDIRECT_URI)?,
            auth_url: url_or("SPOTIFY_AUTH_URL", SPOTIFY_AUTH_URL)?,
            token_url: url_or("SPOTIFY_TOKEN_URL", SPOTIFY_TOKEN_URL)?,
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| SPOTIFY_API_URL.to_string()),
        };

        Ok(Config {
            deezer,
            spotify,
            spotify_market: get("SPOTIFY_TARGET_MARKET").map(|m| m.trim().to_uppercase()),
            redis_url: get("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
        })
    }
}
