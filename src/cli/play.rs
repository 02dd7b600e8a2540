use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cli::report, error::Error, info, jukebox::LiveJukebox, success, utils, warning,
};

/// Picks a device, then recommends and plays a song for `mood`.
///
/// `device` may be a device id or name. Without it the active device, or
/// else the first one listed, is used.
pub async fn play(jukebox: &mut LiveJukebox, mood: String, device: Option<String>) {
    let devices = match jukebox.devices().await {
        Ok(devices) => devices,
        Err(e) => report(&e),
    };

    let chosen = match device.as_deref() {
        Some(selector) => utils::find_device(&devices, selector).ok_or_else(|| {
            Error::InvalidInput(format!("no device matches {selector:?}, see `moodtune devices`"))
        }),
        None => utils::default_device(&devices).ok_or(Error::NoDevice),
    };
    let chosen = match chosen {
        Ok(d) => d.clone(),
        Err(e) => report(&e),
    };
    if device.is_none() && !chosen.is_active {
        warning!("No active device, using {}", chosen.name);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("🎤 Finding the perfect song for your mood...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let result = jukebox.play_mood(&mood, &chosen.id).await;
    pb.finish_and_clear();

    match result {
        Ok(now_playing) => {
            info!("AI recommendation: {}", now_playing.recommendation.query());
            success!(
                "Now playing: {} by {} on {}",
                now_playing.track.name,
                now_playing.track.artist_names(),
                chosen.name
            );
            info!("Listen: {}", now_playing.track.embed_url());
        }
        Err(e) => report(&e),
    }
}
