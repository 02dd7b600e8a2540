#![allow(dead_code)]

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use moodtune::{
    Error, Res,
    gemini::TextGenerator,
    jukebox::Jukebox,
    management::{AuthSession, TokenCache},
    recommend::Recommender,
    spotify::{CatalogClient, TokenProvider},
    types::{Credential, Device, TrackMatch},
};
use tempfile::TempDir;

/// Every call the fakes receive, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Exchange(String),
    Refresh(String),
    Devices(String),
    Search { token: String, query: String },
    Play { token: String, device_id: String, uri: String },
    Generate(String),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

pub fn credential(access: &str, expires_in: Duration) -> Credential {
    Credential {
        access_token: access.to_string(),
        refresh_token: format!("{access}-refresh"),
        expires_at: Utc::now() + expires_in,
        scope: BTreeSet::from([
            "user-modify-playback-state".to_string(),
            "user-read-playback-state".to_string(),
        ]),
    }
}

pub fn device(id: &str, name: &str, is_active: bool) -> Device {
    Device {
        id: id.to_string(),
        name: name.to_string(),
        kind: "Computer".to_string(),
        is_active,
    }
}

pub fn track(id: &str, name: &str, artist: &str) -> TrackMatch {
    TrackMatch {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![artist.to_string()],
        album: None,
        uri: format!("spotify:track:{id}"),
    }
}

pub struct FakeTokenProvider {
    pub log: CallLog,
    pub fail: bool,
}

#[async_trait]
impl TokenProvider for FakeTokenProvider {
    fn authorize_url(&self, state: &str) -> String {
        format!("https://accounts.test/authorize?state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Res<Credential> {
        self.log.lock().unwrap().push(Call::Exchange(code.to_string()));
        if self.fail {
            return Err(Error::Authorization("invalid_grant".to_string()));
        }
        Ok(credential(&format!("exchanged-{code}"), Duration::hours(1)))
    }

    async fn refresh(&self, refresh_token: &str) -> Res<Credential> {
        self.log
            .lock()
            .unwrap()
            .push(Call::Refresh(refresh_token.to_string()));
        if self.fail {
            return Err(Error::Authorization("invalid_grant: Refresh token revoked".to_string()));
        }
        Ok(credential("refreshed", Duration::hours(1)))
    }
}

pub struct FakeCatalog {
    pub log: CallLog,
    pub devices: Vec<Device>,
    pub tracks: Vec<TrackMatch>,
    pub reject_playback: bool,
    /// Answer every call with a 401, as for a revoked token.
    pub reject_token: bool,
}

impl FakeCatalog {
    fn check_token(&self) -> Res<()> {
        if self.reject_token {
            return Err(Error::Api {
                status: StatusCode::UNAUTHORIZED,
                message: "The access token expired".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn devices(&self, access_token: &str) -> Res<Vec<Device>> {
        self.log
            .lock()
            .unwrap()
            .push(Call::Devices(access_token.to_string()));
        self.check_token()?;
        Ok(self.devices.clone())
    }

    async fn search_track(&self, access_token: &str, query: &str) -> Res<Option<TrackMatch>> {
        self.log.lock().unwrap().push(Call::Search {
            token: access_token.to_string(),
            query: query.to_string(),
        });
        self.check_token()?;
        Ok(self.tracks.first().cloned())
    }

    async fn start_playback(
        &self,
        access_token: &str,
        device_id: &str,
        track_uri: &str,
    ) -> Res<()> {
        self.log.lock().unwrap().push(Call::Play {
            token: access_token.to_string(),
            device_id: device_id.to_string(),
            uri: track_uri.to_string(),
        });
        self.check_token()?;
        if self.reject_playback {
            return Err(Error::Playback("404 Not Found: Device not found".to_string()));
        }
        Ok(())
    }
}

pub struct FakeGenerator {
    pub log: CallLog,
    pub reply: String,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Res<String> {
        self.log
            .lock()
            .unwrap()
            .push(Call::Generate(prompt.to_string()));
        Ok(self.reply.clone())
    }
}

/// Session over a token cache in a fresh temp dir. Keep the `TempDir` alive
/// for the duration of the test.
pub fn session(log: &CallLog, fail: bool) -> (AuthSession<FakeTokenProvider>, TokenCache, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let cache = TokenCache::new(dir.path().join("cache/token.json"));
    let session = AuthSession::new(
        FakeTokenProvider {
            log: log.clone(),
            fail,
        },
        cache.clone(),
    );
    (session, cache, dir)
}

pub type FakeJukebox = Jukebox<FakeTokenProvider, FakeCatalog, FakeGenerator>;

pub struct Fixture {
    pub jukebox: FakeJukebox,
    pub cache: TokenCache,
    pub log: CallLog,
    _dir: TempDir,
}

/// Jukebox with a valid cached credential (`cached-token`).
pub async fn jukebox(
    reply: &str,
    devices: Vec<Device>,
    tracks: Vec<TrackMatch>,
    reject_playback: bool,
) -> Fixture {
    fixture(reply, |log| FakeCatalog {
        log,
        devices,
        tracks,
        reject_playback,
        reject_token: false,
    })
    .await
}

/// Jukebox whose cached credential the Web API answers with 401.
pub async fn jukebox_with_revoked_token(reply: &str, tracks: Vec<TrackMatch>) -> Fixture {
    fixture(reply, |log| FakeCatalog {
        log,
        devices: vec![device("dev-1", "Kitchen", true)],
        tracks,
        reject_playback: false,
        reject_token: true,
    })
    .await
}

async fn fixture(reply: &str, catalog: impl FnOnce(CallLog) -> FakeCatalog) -> Fixture {
    let log = CallLog::default();
    let (session, cache, dir) = session(&log, false);
    cache
        .store(&credential("cached-token", Duration::hours(1)))
        .await
        .unwrap();

    let recommender = Recommender::new(FakeGenerator {
        log: log.clone(),
        reply: reply.to_string(),
    });

    Fixture {
        jukebox: Jukebox::new(session, catalog(log.clone()), recommender),
        cache,
        log,
        _dir: dir,
    }
}
