use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{
    api::page::{PageView, render_page},
    error::Error,
    server::SharedJukebox,
    warning,
};

/// Serves the page and doubles as the OAuth redirect target.
///
/// A `code` in the query is handed to the session, which ignores codes it has
/// already seen, so reloading the redirect URL is harmless. The device list
/// is fetched on every render.
pub async fn index(
    Query(params): Query<HashMap<String, String>>,
    Extension(jukebox): Extension<SharedJukebox>,
) -> Html<String> {
    let mut view = PageView::default();
    let mut jukebox = jukebox.lock().await;

    if let Some(reason) = params.get("error") {
        let e = Error::Authorization(format!("Spotify denied access: {reason}"));
        warning!("{}", e);
        view.error = Some(e.to_string());
    }

    if let Some(code) = params.get("code") {
        let state = params.get("state").map(String::as_str);
        if let Err(e) = jukebox.session_mut().receive_code(code, state) {
            warning!("{}", e);
            view.error = Some(e.to_string());
        }
    }

    match jukebox.devices().await {
        Ok(devices) => {
            view.authorized = true;
            view.devices = devices;
        }
        Err(e) => {
            view.authorized = jukebox.session().is_authenticated();
            view.apply_error(&e);
        }
    }

    Html(render_page(&view))
}
