use axum::{Extension, response::Json};
use serde::Serialize;

use crate::{management::SessionStatus, server::SharedJukebox};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    /// `unauthenticated`, `code_received`, `authenticated` or `expired`.
    pub session: &'static str,
    pub version: &'static str,
}

/// Liveness plus the authorization state of the session, without touching
/// the network or the token cache.
pub async fn health(Extension(jukebox): Extension<SharedJukebox>) -> Json<HealthReport> {
    let status = jukebox.lock().await.session().status();
    Json(health_report(status))
}

pub fn health_report(status: SessionStatus) -> HealthReport {
    HealthReport {
        status: "ok",
        session: match status {
            SessionStatus::Unauthenticated => "unauthenticated",
            SessionStatus::CodeReceived => "code_received",
            SessionStatus::Authenticated => "authenticated",
            SessionStatus::Expired => "expired",
        },
        version: env!("CARGO_PKG_VERSION"),
    }
}
