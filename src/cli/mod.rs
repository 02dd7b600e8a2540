//! # CLI Module
//!
//! Command-line front end of moodtune. Each command builds on the same
//! [`crate::jukebox::Jukebox`] the web page uses:
//!
//! - [`auth`] - authorize with Spotify through the browser and cache the token
//! - [`devices`] - list the playback devices available right now
//! - [`play`] - recommend a song for a mood and start it on a device
//! - [`serve`] - run the single-page web front end
//!
//! Errors are printed once and end the command with exit status 1. When the
//! session needs authorization the user gets the link to do so.

mod auth;
mod devices;
mod play;
mod serve;

pub use auth::auth;
pub use devices::devices;
pub use play::play;
pub use serve::serve;

use crate::{error::Error, info, warning};

/// Prints `e` and exits. Authorization problems also print the link to
/// authorize again.
pub fn report(e: &Error) -> ! {
    if let Error::ReauthorizationRequired {
        reason,
        authorize_url,
    } = e
    {
        warning!("Spotify authorization required ({}).", reason);
        info!(
            "Run `moodtune auth` or open this URL and retry:\n{}",
            authorize_url
        );
        std::process::exit(1);
    }

    crate::error!("{}", e)
}
