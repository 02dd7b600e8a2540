//! Configuration management for moodtune.
//!
//! Values come from the process environment, optionally seeded from `.env`
//! files. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/moodtune/.env`)
//! 4. Application defaults for everything but the credentials
//!
//! Credentials have no defaults. [`Config::from_env`] reports every missing
//! one in a single [`Error::Configuration`] so the process can stop before
//! making any network call.

use std::{env, path::PathBuf};

use crate::{Res, error::Error};

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8501/";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8501";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Permissions needed to read the device list and start playback.
pub const SPOTIFY_SCOPE: &str = "user-modify-playback-state user-read-playback-state";

/// Spotify application settings used by the authorization session and the
/// Web API client.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

/// Gemini settings used by the recommender.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

/// Everything the process needs, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub gemini: GeminiConfig,
    /// Address the local web server binds to. It must serve the redirect URI.
    pub server_addr: String,
    pub token_cache_path: PathBuf,
}

/// Loads `.env` files into the process environment.
///
/// Both the working directory and the local data directory are tried. A
/// missing file is fine; the variables may be set in the environment
/// directly. Only a file that exists but cannot be parsed is an error.
pub async fn load_env() -> Res<()> {
    let data_dir = data_dir();
    async_fs::create_dir_all(&data_dir).await?;

    for path in [PathBuf::from(".env"), data_dir.join(".env")] {
        if !path.is_file() {
            continue;
        }
        dotenv::from_path(&path).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
    }

    Ok(())
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Call [`load_env`] first so values from `.env` files are visible.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` - Spotify application credentials
    /// - `GOOGLE_API_KEY` - Gemini API key
    ///
    /// Optional, with defaults:
    /// - `SPOTIFY_REDIRECT_URI` (`http://localhost:8501/`)
    /// - `SERVER_ADDRESS` (`127.0.0.1:8501`)
    /// - `SPOTIFY_API_AUTH_URL`, `SPOTIFY_API_TOKEN_URL`, `SPOTIFY_API_URL`
    /// - `GEMINI_API_URL`, `GEMINI_MODEL` (`gemini-1.5-flash`)
    /// - `MOODTUNE_TOKEN_CACHE` (see [`default_token_cache_path`])
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] naming every missing required variable.
    ///
    /// # Example
    ///
    /// ```
    /// config::load_env().await?;
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Same rules as [`Config::from_env`]; blank values count as missing.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value for an environment variable name
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let client_id = required("SPOTIFY_CLIENT_ID");
        let client_secret = required("SPOTIFY_CLIENT_SECRET");
        let api_key = required("GOOGLE_API_KEY");

        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        let token_cache_path = get("MOODTUNE_TOKEN_CACHE")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_cache_path);

        Ok(Self {
            spotify: SpotifyConfig {
                client_id,
                client_secret,
                redirect_uri: or_default("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
                scope: SPOTIFY_SCOPE.to_string(),
                auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
                token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
                api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL),
            },
            gemini: GeminiConfig {
                api_key,
                api_url: or_default("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
                model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            },
            server_addr: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            token_cache_path,
        })
    }
}

fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodtune");
    path
}

/// `<data_local_dir>/moodtune/cache/token.json`
pub fn default_token_cache_path() -> PathBuf {
    let mut path = data_dir();
    path.push("cache/token.json");
    path
}
