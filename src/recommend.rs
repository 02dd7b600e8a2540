//! Mood to (title, artist) recommendation.

use crate::{Res, error::Error, gemini::TextGenerator, types::Recommendation};

/// Separator the model is asked to put between song name and artist.
pub const SEPARATOR: &str = " - ";

pub fn prompt_for(mood: &str) -> String {
    format!(
        "Recommend a song based on the mood: '{}'. Please respond with 'song name - artist'.",
        mood.trim()
    )
}

/// Parses a `title - artist` response.
///
/// The separator must occur exactly once and both sides must be non-empty.
/// Quotes and markdown emphasis wrapped around either side are dropped.
pub fn parse_recommendation(text: &str) -> Res<Recommendation> {
    let text = text.trim();
    if text.matches(SEPARATOR).count() != 1 {
        return Err(Error::RecommendationParse(text.to_string()));
    }

    let Some((title, artist)) = text.split_once(SEPARATOR) else {
        return Err(Error::RecommendationParse(text.to_string()));
    };

    let (title, artist) = (clean(title), clean(artist));
    if title.is_empty() || artist.is_empty() {
        return Err(Error::RecommendationParse(text.to_string()));
    }

    Ok(Recommendation {
        title: title.to_string(),
        artist: artist.to_string(),
    })
}

fn clean(side: &str) -> &str {
    side.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '*' | '`' | '“' | '”'))
        .trim()
}

pub struct Recommender<G> {
    generator: G,
}

impl<G: TextGenerator> Recommender<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Asks the generator for one song matching `mood`. A reply that does not
    /// parse is final; there is no re-prompt.
    pub async fn recommend(&self, mood: &str) -> Res<Recommendation> {
        if mood.trim().is_empty() {
            return Err(Error::InvalidInput("mood must not be empty".to_string()));
        }

        let reply = self.generator.generate(&prompt_for(mood)).await?;
        parse_recommendation(&reply)
    }
}
