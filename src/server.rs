use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::sync::Mutex;

use crate::{Res, api, error::Error, jukebox::LiveJukebox};

/// One jukebox per process; the mutex serializes interactions.
pub type SharedJukebox = Arc<Mutex<LiveJukebox>>;

pub fn router(jukebox: SharedJukebox) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/callback", get(api::index))
        .route("/play", post(api::play))
        .route("/health", get(api::health))
        .layer(Extension(jukebox))
}

pub async fn start_api_server(addr: &str, jukebox: SharedJukebox) -> Res<()> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| Error::Configuration(format!("invalid server address {addr}: {e}")))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(jukebox)).await?;
    Ok(())
}
