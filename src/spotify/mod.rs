//! # Spotify Integration Module
//!
//! Two capabilities are consumed from Spotify, each behind a trait so the
//! session and the jukebox can run against fakes:
//!
//! ```text
//! AuthSession ──> TokenProvider  (accounts service: authorize URL, code exchange, refresh)
//! Jukebox     ──> CatalogClient  (Web API: devices, track search, start playback)
//! ```
//!
//! [`auth::SpotifyAuth`] and [`catalog::SpotifyCatalog`] are the reqwest
//! implementations.
//!
//! ## Endpoints
//!
//! - `GET  {auth_url}` - user authorization page (built, not called)
//! - `POST {token_url}` - `authorization_code` and `refresh_token` grants
//! - `GET  /me/player/devices` - available Spotify Connect devices
//! - `GET  /search?type=track&limit=1` - catalog search
//! - `PUT  /me/player/play?device_id=` - start playback of a track URI
//!
//! Nothing here retries. A failed call surfaces as an [`Error`] and the
//! caller decides what the user sees.

use async_trait::async_trait;
use reqwest::Response;

use crate::{
    Res,
    error::Error,
    types::{ApiErrorResponse, Credential, Device, OAuthErrorResponse, TrackMatch},
};

pub mod auth;
pub mod catalog;

/// OAuth authorization code grant against the streaming provider.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// URL the user opens to grant access. `state` is echoed back on the
    /// redirect.
    fn authorize_url(&self, state: &str) -> String;

    /// Trades a one-time authorization code for a credential.
    async fn exchange_code(&self, code: &str) -> Res<Credential>;

    /// Mints a new credential from a refresh token.
    async fn refresh(&self, refresh_token: &str) -> Res<Credential>;
}

/// Device listing, track search and playback.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn devices(&self, access_token: &str) -> Res<Vec<Device>>;

    /// First search hit for `query`, if any.
    async fn search_track(&self, access_token: &str, query: &str) -> Res<Option<TrackMatch>>;

    async fn start_playback(&self, access_token: &str, device_id: &str, track_uri: &str)
    -> Res<()>;
}

/// Turns a non-success Web API response into [`Error::Api`].
pub(crate) async fn api_error(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(e) if !e.error.message.is_empty() => e.error.message,
        _ => non_empty_or_reason(body, status),
    };
    Error::Api { status, message }
}

/// Turns a non-success accounts response into [`Error::Authorization`].
pub(crate) async fn oauth_error(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<OAuthErrorResponse>(&body) {
        Ok(e) => match e.error_description {
            Some(description) => format!("{}: {}", e.error, description),
            None => e.error,
        },
        Err(_) => non_empty_or_reason(body, status),
    };
    Error::Authorization(message)
}

fn non_empty_or_reason(body: String, status: reqwest::StatusCode) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body
    }
}
