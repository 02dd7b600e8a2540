use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    Res,
    error::Error,
    spotify::{CatalogClient, api_error},
    types::{Device, DevicesResponse, SearchResponse, StartPlaybackRequest, TrackMatch},
};

/// Spotify Web API client for the calls a mood interaction needs.
pub struct SpotifyCatalog {
    client: Client,
    api_url: String,
}

impl SpotifyCatalog {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CatalogClient for SpotifyCatalog {
    async fn devices(&self, access_token: &str) -> Res<Vec<Device>> {
        let response = self
            .client
            .get(format!("{}/me/player/devices", self.api_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let res: DevicesResponse = response.json().await?;
        Ok(res
            .devices
            .into_iter()
            .filter_map(|d| d.into_device())
            .collect())
    }

    async fn search_track(&self, access_token: &str, query: &str) -> Res<Option<TrackMatch>> {
        let response = self
            .client
            .get(format!("{}/search", self.api_url))
            .query(&[("q", query), ("type", "track"), ("limit", "1")])
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let res: SearchResponse = response.json().await?;
        Ok(res.tracks.items.into_iter().next().map(TrackMatch::from))
    }

    async fn start_playback(
        &self,
        access_token: &str,
        device_id: &str,
        track_uri: &str,
    ) -> Res<()> {
        let response = self
            .client
            .put(format!("{}/me/player/play", self.api_url))
            .query(&[("device_id", device_id)])
            .bearer_auth(access_token)
            .json(&StartPlaybackRequest {
                uris: vec![track_uri.to_string()],
            })
            .send()
            .await?;

        if !response.status().is_success() {
            // a rejected token stays an API error so the session can react
            return Err(match api_error(response).await {
                Error::Api { status, message } if status != StatusCode::UNAUTHORIZED => {
                    Error::Playback(format!("{status}: {message}"))
                }
                other => other,
            });
        }

        Ok(())
    }
}
