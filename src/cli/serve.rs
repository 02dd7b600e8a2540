use crate::{info, server::SharedJukebox, server::start_api_server, warning};

/// Serves the web page until the process is stopped.
pub async fn serve(jukebox: SharedJukebox, server_addr: String, open: bool) {
    let url = format!("http://{server_addr}/");
    info!("Serving moodtune on {}", url);

    if open && webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Please navigate to {} manually.", url);
    }

    if let Err(e) = start_api_server(&server_addr, jukebox).await {
        crate::error!("Server failed: {}", e);
    }
}
