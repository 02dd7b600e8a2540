mod common;

use chrono::Duration;
use common::{Call, CallLog, calls, credential, session};
use moodtune::{
    Error,
    management::{NOT_AUTHORIZED, SessionStatus},
};

#[tokio::test]
async fn test_unauthenticated_session_offers_authorize_url() {
    let log = CallLog::default();
    let (mut session, _cache, _dir) = session(&log, false);

    assert_eq!(session.status(), SessionStatus::Unauthenticated);

    match session.access_token().await {
        Err(Error::ReauthorizationRequired {
            reason,
            authorize_url,
        }) => {
            assert_eq!(reason, NOT_AUTHORIZED);
            assert!(authorize_url.contains(session.oauth_state()));
        }
        other => panic!("expected reauthorization, got {other:?}"),
    }
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn test_code_is_exchanged_once_and_persisted() {
    let log = CallLog::default();
    let (mut session, cache, _dir) = session(&log, false);

    assert!(session.receive_code("abc", None).unwrap());
    assert_eq!(session.status(), SessionStatus::CodeReceived);

    let token = session.access_token().await.unwrap();
    assert_eq!(token, "exchanged-abc");
    assert_eq!(session.status(), SessionStatus::Authenticated);

    let cached = cache.load().await.unwrap().unwrap();
    assert_eq!(cached.access_token, "exchanged-abc");
    assert_eq!(calls(&log), vec![Call::Exchange("abc".to_string())]);
}

#[tokio::test]
async fn test_replayed_code_does_not_trigger_second_exchange() {
    let log = CallLog::default();
    let (mut session, _cache, _dir) = session(&log, false);
    let state = session.oauth_state().to_string();

    assert!(session.receive_code("abc", Some(&state)).unwrap());
    session.access_token().await.unwrap();

    // page reload with the same redirect query
    assert!(!session.receive_code("abc", Some(&state)).unwrap());
    session.access_token().await.unwrap();

    let exchanges = calls(&log)
        .into_iter()
        .filter(|c| matches!(c, Call::Exchange(_)))
        .count();
    assert_eq!(exchanges, 1);
}

#[tokio::test]
async fn test_pending_code_is_not_captured_twice() {
    let log = CallLog::default();
    let (mut session, _cache, _dir) = session(&log, false);

    assert!(session.receive_code("abc", None).unwrap());
    assert!(!session.receive_code("abc", None).unwrap());
    assert_eq!(session.state().pending_code.as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_foreign_state_is_rejected() {
    let log = CallLog::default();
    let (mut session, _cache, _dir) = session(&log, false);

    let result = session.receive_code("abc", Some("not-our-state"));
    assert!(matches!(result, Err(Error::Authorization(_))));
    assert!(session.state().pending_code.is_none());
}

#[tokio::test]
async fn test_valid_cached_credential_skips_network() {
    let log = CallLog::default();
    let (mut session, cache, _dir) = session(&log, false);
    cache
        .store(&credential("cached", Duration::hours(1)))
        .await
        .unwrap();

    assert_eq!(session.access_token().await.unwrap(), "cached");
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn test_expired_credential_is_refreshed_exactly_once() {
    let log = CallLog::default();
    let (mut session, cache, _dir) = session(&log, false);
    cache
        .store(&credential("stale", -Duration::hours(1)))
        .await
        .unwrap();

    assert_eq!(session.access_token().await.unwrap(), "refreshed");
    assert_eq!(session.access_token().await.unwrap(), "refreshed");

    assert_eq!(calls(&log), vec![Call::Refresh("stale-refresh".to_string())]);

    let cached = cache.load().await.unwrap().unwrap();
    assert_eq!(cached.access_token, "refreshed");
}

#[tokio::test]
async fn test_failed_refresh_requires_reauthorization() {
    let log = CallLog::default();
    let (mut session, cache, _dir) = session(&log, true);
    cache
        .store(&credential("stale", -Duration::hours(1)))
        .await
        .unwrap();

    match session.access_token().await {
        Err(Error::ReauthorizationRequired { reason, .. }) => {
            assert!(reason.contains("refresh"));
        }
        other => panic!("expected reauthorization, got {other:?}"),
    }
    assert_eq!(calls(&log).len(), 1);
    assert!(session.state().credential.is_none());
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn test_failed_exchange_requires_reauthorization() {
    let log = CallLog::default();
    let (mut session, _cache, _dir) = session(&log, true);

    session.receive_code("abc", None).unwrap();
    let err = session.access_token().await.unwrap_err();

    assert!(err.authorize_url().is_some());
    // the failed code is spent; a retry does not reuse it
    assert!(session.access_token().await.is_err());
    assert_eq!(calls(&log), vec![Call::Exchange("abc".to_string())]);
}

#[tokio::test]
async fn test_new_code_replaces_stale_credential_without_refresh() {
    let log = CallLog::default();
    let (mut session, cache, _dir) = session(&log, false);
    cache
        .store(&credential("stale", -Duration::hours(1)))
        .await
        .unwrap();

    session.receive_code("fresh", None).unwrap();
    assert_eq!(session.access_token().await.unwrap(), "exchanged-fresh");
    assert_eq!(calls(&log), vec![Call::Exchange("fresh".to_string())]);
}

#[tokio::test]
async fn test_code_arriving_while_authenticated_does_not_replace_refresh() {
    let log = CallLog::default();
    let (mut session, cache, _dir) = session(&log, false);
    // usable for two seconds once the expiry margin is taken off
    cache
        .store(&credential("live", Duration::seconds(62)))
        .await
        .unwrap();
    let state = session.oauth_state().to_string();

    assert_eq!(session.access_token().await.unwrap(), "live");

    // a second tab delivering another redirect
    assert!(!session.receive_code("late-code", Some(&state)).unwrap());
    assert!(session.state().pending_code.is_none());

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    assert_eq!(session.status(), SessionStatus::Expired);
    assert_eq!(session.access_token().await.unwrap(), "refreshed");
    assert_eq!(calls(&log), vec![Call::Refresh("live-refresh".to_string())]);
}

#[tokio::test]
async fn test_pending_code_is_dropped_when_cache_holds_usable_credential() {
    let log = CallLog::default();
    let (mut session, cache, _dir) = session(&log, false);

    // the code arrives before the cached credential has been loaded
    assert!(session.receive_code("abc", None).unwrap());
    cache
        .store(&credential("cached", Duration::hours(1)))
        .await
        .unwrap();

    assert_eq!(session.access_token().await.unwrap(), "cached");
    assert!(session.state().pending_code.is_none());
    assert!(!session.receive_code("abc", None).unwrap());
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn test_invalidated_credential_is_not_reloaded() {
    let log = CallLog::default();
    let (mut session, cache, _dir) = session(&log, false);
    cache
        .store(&credential("revoked", Duration::hours(1)))
        .await
        .unwrap();
    session.access_token().await.unwrap();

    let err = session.invalidate("access token rejected").await;
    assert!(err.authorize_url().is_some());
    assert!(cache.load().await.unwrap().is_none());

    // the new redirect is accepted and exchanged
    assert!(session.receive_code("again", None).unwrap());
    assert_eq!(session.access_token().await.unwrap(), "exchanged-again");
}
