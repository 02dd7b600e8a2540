use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    Res,
    config::SpotifyConfig,
    error::Error,
    spotify::{TokenProvider, oauth_error},
    types::{Credential, TokenResponse},
};

/// Spotify accounts service client for the authorization code grant.
///
/// The client secret is sent with HTTP Basic authentication on both the code
/// exchange and the refresh call.
pub struct SpotifyAuth {
    client: Client,
    config: SpotifyConfig,
}

impl SpotifyAuth {
    pub fn new(client: Client, config: SpotifyConfig) -> Self {
        Self { client, config }
    }

    async fn request_token(
        &self,
        form: &[(&str, &str)],
        previous_refresh: Option<&str>,
    ) -> Res<Credential> {
        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(oauth_error(response).await);
        }

        let obtained_at = Utc::now();
        let token: TokenResponse = response.json().await?;
        token
            .into_credential(obtained_at, previous_refresh)
            .ok_or_else(|| Error::Authorization("token response has no refresh token".to_string()))
    }
}

#[async_trait]
impl TokenProvider for SpotifyAuth {
    fn authorize_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", self.config.scope.as_str()),
            ("state", state),
        ];

        match Url::parse_with_params(&self.config.auth_url, &params) {
            Ok(url) => url.to_string(),
            // an unparseable base still yields a link the user can inspect
            Err(_) => format!(
                "{}?client_id={}&response_type=code&redirect_uri={}&state={}",
                self.config.auth_url, self.config.client_id, self.config.redirect_uri, state
            ),
        }
    }

    async fn exchange_code(&self, code: &str) -> Res<Credential> {
        self.request_token(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ],
            None,
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Res<Credential> {
        self.request_token(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
            Some(refresh_token),
        )
        .await
    }
}
