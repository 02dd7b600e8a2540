//! Error type shared by every layer of moodtune.
//!
//! Each variant maps to one user-visible failure. Nothing in the library
//! retries; callers decide how to present the error and whether to offer a
//! new authorization link.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or malformed at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider rejected a code exchange or a refresh, or the redirect
    /// itself was invalid.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// The session has no usable credential. The user has to visit
    /// `authorize_url` again.
    #[error("Spotify authorization required ({reason}). Authorize at: {authorize_url}")]
    ReauthorizationRequired {
        reason: String,
        authorize_url: String,
    },

    #[error("no active Spotify devices detected, open Spotify on a device first")]
    NoDevice,

    #[error("could not parse recommendation {0:?}, expected 'song name - artist'")]
    RecommendationParse(String),

    #[error("no track found for {0:?}")]
    NoMatch(String),

    #[error("failed to start playback: {0}")]
    Playback(String),

    #[error("song recommendation failed: {0}")]
    Generation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("provider returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Authorization link to re-offer to the user, when the error carries one.
    pub fn authorize_url(&self) -> Option<&str> {
        match self {
            Error::ReauthorizationRequired { authorize_url, .. } => Some(authorize_url),
            _ => None,
        }
    }
}
