use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    cli::report, info, server::SharedJukebox, server::start_api_server, success, warning,
};

const MAX_WAIT: Duration = Duration::from_secs(120);

/// Runs the browser authorization flow unless a usable token is cached.
///
/// The local server receives the redirect; this function only opens the
/// browser and waits until the session holds a valid credential.
pub async fn auth(jukebox: SharedJukebox, server_addr: String) {
    let authorize_url = {
        let mut jb = jukebox.lock().await;
        match jb.session_mut().access_token().await {
            Ok(_) => {
                success!("Already authorized with Spotify.");
                return;
            }
            Err(e) => match e.authorize_url() {
                Some(url) => url.to_string(),
                None => report(&e),
            },
        }
    };

    let server_state = Arc::clone(&jukebox);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(&server_addr, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&authorize_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            authorize_url
        )
    } else {
        info!("Waiting for Spotify authorization in your browser...");
    }

    if wait_for_session(&jukebox).await {
        success!("Authentication successful!");
    } else {
        crate::error!("Authentication failed or timed out.");
    }
}

async fn wait_for_session(jukebox: &SharedJukebox) -> bool {
    let start = Instant::now();

    while start.elapsed() < MAX_WAIT {
        if jukebox.lock().await.session().is_authenticated() {
            return true;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    false
}
