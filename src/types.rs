use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Seconds before the reported expiry at which a credential is treated as
/// expired, so a token does not run out between the check and the API call.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Token material persisted in the token cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub scope: BTreeSet<String>,
}

impl Credential {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Body of a successful response from the accounts token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: i64,
}

impl TokenResponse {
    /// Converts the response into a credential, anchoring the expiry at
    /// `obtained_at`.
    ///
    /// Refresh responses may leave out the refresh token; `previous_refresh`
    /// is used then.
    pub fn into_credential(
        self,
        obtained_at: DateTime<Utc>,
        previous_refresh: Option<&str>,
    ) -> Option<Credential> {
        let refresh_token = self
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))?;

        Some(Credential {
            access_token: self.access_token,
            refresh_token,
            expires_at: obtained_at + Duration::seconds(self.expires_in),
            scope: self.scope.split_whitespace().map(str::to_string).collect(),
        })
    }
}

/// OAuth error body (`{"error": "...", "error_description": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Web API error body (`{"error": {"status": 404, "message": "..."}}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<RawDevice>,
}

/// Device as returned by the Web API. Restricted devices may have no id.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDevice {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub is_active: bool,
}

impl RawDevice {
    pub fn into_device(self) -> Option<Device> {
        Some(Device {
            id: self.id.filter(|id| !id.is_empty())?,
            name: self.name,
            kind: self.kind,
            is_active: self.is_active,
        })
    }
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub id: String,
    pub name: String,
    #[tabled(rename = "type")]
    pub kind: String,
    pub active: String,
}

impl From<&Device> for DeviceTableRow {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            kind: device.kind.clone(),
            active: if device.is_active { "yes" } else { "" }.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Page<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<TrackArtist>,
    pub album: Option<TrackAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackAlbum {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartPlaybackRequest {
    pub uris: Vec<String>,
}

/// The (title, artist) pair suggested by the text generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub artist: String,
}

impl Recommendation {
    /// Free-text catalog query, `"title - artist"`.
    pub fn query(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// The catalog entry picked for a recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMatch {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub uri: String,
}

impl TrackMatch {
    pub fn artist_names(&self) -> String {
        self.artists.join(", ")
    }

    pub fn embed_url(&self) -> String {
        format!("https://open.spotify.com/embed/track/{}", self.id)
    }
}

impl From<Track> for TrackMatch {
    fn from(track: Track) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.map(|a| a.name),
            uri: track.uri,
        }
    }
}

/// Outcome of a successful interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub recommendation: Recommendation,
    pub track: TrackMatch,
    pub device_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn response(refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "access".to_string(),
            refresh_token: refresh.map(str::to_string),
            scope: "user-read-playback-state user-modify-playback-state".to_string(),
            expires_in: 3600,
        }
    }

    #[test]
    fn credential_expiry_is_anchored_at_receipt() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let credential = response(Some("refresh")).into_credential(now, None).unwrap();

        assert_eq!(credential.expires_at, now + Duration::seconds(3600));
        assert_eq!(credential.scope.len(), 2);
        assert!(!credential.is_expired_at(now));
        assert!(credential.is_expired_at(now + Duration::seconds(3600 - EXPIRY_MARGIN_SECS)));
    }

    #[test]
    fn refresh_without_new_refresh_token_keeps_previous() {
        let now = Utc::now();
        let credential = response(None).into_credential(now, Some("old")).unwrap();
        assert_eq!(credential.refresh_token, "old");

        assert!(response(None).into_credential(now, None).is_none());
    }

    #[test]
    fn devices_without_id_are_dropped() {
        let raw = RawDevice {
            id: None,
            name: "Restricted".to_string(),
            kind: "Speaker".to_string(),
            is_active: false,
        };
        assert!(raw.into_device().is_none());
    }
}
