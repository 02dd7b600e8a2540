//! # API Module
//!
//! HTTP handlers of the local web page, the browser front end of moodtune.
//!
//! ## Endpoints
//!
//! - [`index`] - `GET /` and `GET /callback`. Renders the page: an
//!   authorization link while the session has no credential, otherwise the
//!   mood field and a freshly fetched device selector. It is also the OAuth
//!   redirect target and picks up `code`, `state` and `error` from the query.
//! - [`play`] - `POST /play`. Recommends, searches and starts playback, then
//!   renders the page with the track and an embedded player.
//! - [`health`] - `GET /health`. Liveness, session state and version.
//!
//! Every failure ends up on the page as a message; handlers never return an
//! error status.

mod health;
mod index;
pub mod page;
mod play;

pub use health::health;
pub use index::index;
pub use play::{PlayForm, play};
