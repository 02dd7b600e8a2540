use axum::{Extension, Form, response::Html};
use serde::Deserialize;

use crate::{
    api::page::{PageView, render_page},
    server::SharedJukebox,
    success, warning,
};

#[derive(Debug, Deserialize)]
pub struct PlayForm {
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub device_id: String,
}

/// Runs one mood interaction and re-renders the page with its outcome.
pub async fn play(
    Extension(jukebox): Extension<SharedJukebox>,
    Form(form): Form<PlayForm>,
) -> Html<String> {
    let mut view = PageView {
        authorized: true,
        mood: form.mood.clone(),
        selected_device: Some(form.device_id.clone()),
        ..Default::default()
    };
    let mut jukebox = jukebox.lock().await;

    match jukebox.play_mood(&form.mood, &form.device_id).await {
        Ok(now_playing) => {
            success!(
                "Playing {} by {} on {}",
                now_playing.track.name,
                now_playing.track.artist_names(),
                now_playing.device_id
            );
            view.now_playing = Some(now_playing);
        }
        Err(e) => {
            warning!("{}", e);
            view.apply_error(&e);
        }
    }

    // devices come and go; offer a fresh list with the result
    if view.authorized {
        match jukebox.devices().await {
            Ok(devices) => view.devices = devices,
            Err(e) => view.apply_error(&e),
        }
    }

    Html(render_page(&view))
}
