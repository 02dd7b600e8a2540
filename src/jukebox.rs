//! One mood interaction: authenticate, list devices, recommend, search, play.

use reqwest::{Client, StatusCode};

use crate::{
    Res,
    config::Config,
    error::Error,
    gemini::{GeminiClient, TextGenerator},
    management::{AuthSession, TokenCache},
    recommend::Recommender,
    spotify::{CatalogClient, TokenProvider, auth::SpotifyAuth, catalog::SpotifyCatalog},
    types::{Device, NowPlaying},
};

/// Sequences the authorization session, the catalog and the recommender.
///
/// Calls are strictly sequential and nothing is cached between them; the
/// device list in particular is fetched anew every time it is shown.
pub struct Jukebox<P, C, G> {
    session: AuthSession<P>,
    catalog: C,
    recommender: Recommender<G>,
}

impl<P, C, G> Jukebox<P, C, G>
where
    P: TokenProvider,
    C: CatalogClient,
    G: TextGenerator,
{
    pub fn new(session: AuthSession<P>, catalog: C, recommender: Recommender<G>) -> Self {
        Self {
            session,
            catalog,
            recommender,
        }
    }

    pub fn session(&self) -> &AuthSession<P> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AuthSession<P> {
        &mut self.session
    }

    /// Lists the currently available playback devices.
    ///
    /// The list is fetched on every call.
    ///
    /// # Errors
    ///
    /// * [`Error::NoDevice`] when Spotify reports no device at all
    /// * [`Error::ReauthorizationRequired`] when there is no usable token or
    ///   the Web API rejects the one the session holds
    pub async fn devices(&mut self) -> Res<Vec<Device>> {
        let token = self.session.access_token().await?;
        let result = self.catalog.devices(&token).await;
        let devices = self.check_rejected(result).await?;
        if devices.is_empty() {
            return Err(Error::NoDevice);
        }
        Ok(devices)
    }

    /// Recommends a song for `mood` and starts it on `device_id`.
    ///
    /// # Arguments
    ///
    /// * `mood` - Free text describing how the user feels
    /// * `device_id` - Id of one of the devices returned by [`Jukebox::devices`]
    ///
    /// # Behavior
    ///
    /// Obtains a token, asks the recommender for a `title - artist` pair,
    /// searches for exactly that string and plays the first hit as is. Zero
    /// hits end the interaction with [`Error::NoMatch`] before any playback
    /// call. Nothing is retried.
    ///
    /// # Example
    ///
    /// ```
    /// let now_playing = jukebox.play_mood("relaxed", &device.id).await?;
    /// success!("Playing {}", now_playing.track.name);
    /// ```
    pub async fn play_mood(&mut self, mood: &str, device_id: &str) -> Res<NowPlaying> {
        if device_id.trim().is_empty() {
            return Err(Error::InvalidInput("no device selected".to_string()));
        }

        let token = self.session.access_token().await?;
        let recommendation = self.recommender.recommend(mood).await?;

        let query = recommendation.query();
        let result = self.catalog.search_track(&token, &query).await;
        let found = self.check_rejected(result).await?;
        let track = found.ok_or(Error::NoMatch(query))?;

        let result = self
            .catalog
            .start_playback(&token, device_id, &track.uri)
            .await;
        self.check_rejected(result).await?;

        Ok(NowPlaying {
            recommendation,
            track,
            device_id: device_id.to_string(),
        })
    }

    /// A 401 means the token was revoked before it expired; the session
    /// drops it and the caller gets a fresh authorization URL.
    async fn check_rejected<T>(&mut self, result: Res<T>) -> Res<T> {
        match result {
            Err(Error::Api { status, message }) if status == StatusCode::UNAUTHORIZED => {
                let reason = format!("access token rejected: {message}");
                Err(self.session.invalidate(&reason).await)
            }
            other => other,
        }
    }
}

/// The jukebox wired to the real Spotify and Gemini services.
pub type LiveJukebox = Jukebox<SpotifyAuth, SpotifyCatalog, GeminiClient>;

impl LiveJukebox {
    /// Wires one shared [`Client`] into the session, catalog and recommender.
    pub fn from_config(config: &Config) -> Self {
        let client = Client::new();
        let session = AuthSession::new(
            SpotifyAuth::new(client.clone(), config.spotify.clone()),
            TokenCache::new(config.token_cache_path.clone()),
        );
        let catalog = SpotifyCatalog::new(client.clone(), config.spotify.api_url.clone());
        let recommender = Recommender::new(GeminiClient::new(client, config.gemini.clone()));
        Jukebox::new(session, catalog, recommender)
    }
}
