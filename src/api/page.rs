use crate::{
    error::Error,
    management::NOT_AUTHORIZED,
    types::{Device, NowPlaying},
    utils::escape_html,
};

/// Everything the single page can show.
#[derive(Debug, Default)]
pub struct PageView {
    pub authorized: bool,
    /// Link shown when the session needs (re)authorization.
    pub authorize_url: Option<String>,
    pub devices: Vec<Device>,
    pub selected_device: Option<String>,
    pub mood: String,
    pub now_playing: Option<NowPlaying>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

impl PageView {
    /// Records `error` on the view, keeping the authorization link when the
    /// error carries one.
    pub fn apply_error(&mut self, error: &Error) {
        match error {
            Error::ReauthorizationRequired {
                reason,
                authorize_url,
            } => {
                self.authorized = false;
                self.authorize_url = Some(authorize_url.clone());
                if reason != NOT_AUTHORIZED {
                    self.error = Some(format!("Spotify OAuth Error: {reason}"));
                }
            }
            Error::NoDevice => {
                self.warning = Some(
                    "⚠️ No active Spotify devices detected. Please open Spotify on a device."
                        .to_string(),
                );
            }
            Error::RecommendationParse(_) => {
                self.error = Some("❌ Invalid AI response format. Please try again.".to_string());
            }
            Error::NoMatch(_) => {
                self.error =
                    Some("🚫 Couldn't find a song based on the recommendation.".to_string());
            }
            other => self.error = Some(other.to_string()),
        }
    }
}

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; background: linear-gradient(to right, #ffecd2, #fcb69f); margin: 0; }
.main { max-width: 640px; margin: 40px auto; background-color: #f4f6f8; padding: 20px; border-radius: 12px; box-shadow: 0px 4px 12px rgba(0, 0, 0, 0.1); }
.spotify-header { text-align: center; color: #1db954; font-weight: bold; }
.track-details { background-color: #fff; padding: 10px; border-radius: 10px; text-align: center; margin-top: 20px; }
.banner { padding: 10px; border-radius: 8px; margin: 10px 0; }
.success { background: #e3f9e5; } .warning { background: #fff4d6; } .error { background: #fde2e1; }
label { display: block; margin-top: 12px; }
input, select { width: 100%; padding: 8px; margin-top: 4px; box-sizing: border-box; }
button { margin-top: 16px; padding: 10px 16px; background: #1db954; color: #fff; border: 0; border-radius: 20px; }
.footer { text-align: center; margin-top: 50px; font-size: 14px; color: #666; }
"#;

pub fn render_page(view: &PageView) -> String {
    let mut body = String::new();

    body.push_str("<h1 class='spotify-header'>🎧 Spotify Mood-Based Song Player</h1>");
    body.push_str(
        "<p style='text-align: center;'>Enter your mood or message, and we'll recommend and play a song for you!</p>",
    );

    if let Some(error) = &view.error {
        body.push_str(&banner("error", error));
    }

    if !view.authorized {
        if let Some(url) = &view.authorize_url {
            let label = if view.error.is_some() {
                "Reauthorize Spotify"
            } else {
                "Click here to authorize Spotify"
            };
            body.push_str(&format!(
                "<p><a href=\"{}\">{}</a></p>",
                escape_html(url),
                label
            ));
        }
        body.push_str(&banner("warning", "🔐 Please authorize Spotify to continue."));
        return wrap(&body);
    }

    body.push_str(&banner(
        "success",
        "✅ Successfully authenticated with Spotify! 🎶",
    ));

    if let Some(warning) = &view.warning {
        body.push_str(&banner("warning", warning));
    }

    if !view.devices.is_empty() {
        body.push_str(&render_form(view));
    }

    if let Some(now_playing) = &view.now_playing {
        body.push_str(&render_now_playing(now_playing));
    }

    wrap(&body)
}

fn render_form(view: &PageView) -> String {
    let options: String = view
        .devices
        .iter()
        .map(|d| {
            let selected = if view.selected_device.as_deref() == Some(d.id.as_str()) {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                escape_html(&d.id),
                selected,
                escape_html(&d.name)
            )
        })
        .collect();

    format!(
        r#"<form method="post" action="/play">
<label>✨ How are you feeling today? (e.g., 'happy', 'relaxed')
<input type="text" name="mood" value="{mood}" required></label>
<label>🎵 Select a Spotify device:
<select name="device_id">{options}</select></label>
<button type="submit">Find my song</button>
</form>"#,
        mood = escape_html(&view.mood),
        options = options
    )
}

fn render_now_playing(now_playing: &NowPlaying) -> String {
    let track = &now_playing.track;
    format!(
        r#"<h6 class='spotify-header'>🎶 AI recommendation: {recommendation}</h6>
<div class='track-details'>
<h3>Now playing: {name} by {artists}</h3>
<iframe src="{embed}" width="300" height="80" frameborder="0" allow="encrypted-media"></iframe>
</div>
{banner}"#,
        recommendation = escape_html(&now_playing.recommendation.query()),
        name = escape_html(&track.name),
        artists = escape_html(&track.artist_names()),
        embed = escape_html(&track.embed_url()),
        banner = banner("success", "🎶 Hope you enjoy the song. 🎶"),
    )
}

fn banner(kind: &str, message: &str) -> String {
    format!(
        "<div class='banner {}'>{}</div>",
        kind,
        escape_html(message)
    )
}

fn wrap(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Spotify Mood-Based Song Player</title><style>{STYLE}</style></head>
<body><div class="main">{body}</div>
<div class="footer">{name} {version}</div>
</body>
</html>"#,
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Recommendation, TrackMatch};

    fn device(id: &str, name: &str) -> Device {
        Device {
            id: id.to_string(),
            name: name.to_string(),
            kind: "Computer".to_string(),
            is_active: false,
        }
    }

    #[test]
    fn unauthorized_page_offers_link() {
        let mut view = PageView::default();
        view.apply_error(&Error::ReauthorizationRequired {
            reason: NOT_AUTHORIZED.to_string(),
            authorize_url: "https://accounts.example/authorize?a=1&b=2".to_string(),
        });
        let html = render_page(&view);

        assert!(html.contains("Click here to authorize Spotify"));
        assert!(html.contains("https://accounts.example/authorize?a=1&amp;b=2"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn failed_refresh_offers_reauthorization() {
        let mut view = PageView::default();
        view.apply_error(&Error::ReauthorizationRequired {
            reason: "token refresh failed: revoked".to_string(),
            authorize_url: "https://accounts.example/authorize".to_string(),
        });
        let html = render_page(&view);

        assert!(html.contains("Reauthorize Spotify"));
        assert!(html.contains("token refresh failed: revoked"));
    }

    #[test]
    fn device_selector_offers_exactly_the_listed_devices() {
        let view = PageView {
            authorized: true,
            devices: vec![device("a1", "Kitchen"), device("b2", "Laptop <work>")],
            selected_device: Some("b2".to_string()),
            ..Default::default()
        };
        let html = render_page(&view);

        assert_eq!(html.matches("<option").count(), 2);
        assert!(html.contains(r#"<option value="a1">Kitchen</option>"#));
        assert!(html.contains(r#"<option value="b2" selected>Laptop &lt;work&gt;</option>"#));
    }

    #[test]
    fn now_playing_embeds_track() {
        let view = PageView {
            authorized: true,
            now_playing: Some(NowPlaying {
                recommendation: Recommendation {
                    title: "Yesterday".to_string(),
                    artist: "The Beatles".to_string(),
                },
                track: TrackMatch {
                    id: "3BQHpFgAp4l80e1XslIjNI".to_string(),
                    name: "Yesterday - Remastered 2009".to_string(),
                    artists: vec!["The Beatles".to_string()],
                    album: None,
                    uri: "spotify:track:3BQHpFgAp4l80e1XslIjNI".to_string(),
                },
                device_id: "a1".to_string(),
            }),
            ..Default::default()
        };
        let html = render_page(&view);

        assert!(html.contains("Now playing: Yesterday - Remastered 2009 by The Beatles"));
        assert!(html.contains("https://open.spotify.com/embed/track/3BQHpFgAp4l80e1XslIjNI"));
    }
}
