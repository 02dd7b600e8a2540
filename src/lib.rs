//! Mood based Spotify player
//!
//! This library turns a free-text mood into a playing Spotify track. It asks a
//! generative language model (Gemini) for a `song - artist` recommendation,
//! searches the Spotify catalog for it and starts playback on a device the user
//! picked. The only stateful piece is the OAuth authorization session, whose
//! credential is cached in a single JSON file.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local web page and the OAuth redirect
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - The error taxonomy shared by all layers
//! - `gemini` - Text generation client
//! - `jukebox` - Sequencing of authenticate, devices, recommend, search, play
//! - `management` - Authorization session and token cache
//! - `recommend` - Prompt construction and response parsing
//! - `server` - Local HTTP server
//! - `spotify` - Spotify accounts and Web API clients
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod jukebox;
pub mod management;
pub mod recommend;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// Result alias used across the crate.
///
/// Every fallible operation returns the crate [`Error`], so callers can match
/// on what went wrong, in particular on
/// [`Error::ReauthorizationRequired`], which carries the link to show.
///
/// # Type Parameters
///
/// - `T` - The value produced when the operation succeeds
///
/// # Example
///
/// ```
/// use moodtune::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints a status line prefixed with a blue `o`.
///
/// Used for progress the user should see but that needs no action, such as
/// the address the local server listens on.
///
/// # Arguments
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Waiting for the Spotify redirect on {}", addr);
/// info!("Found {} devices", devices.len());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line prefixed with a green check mark.
///
/// # Arguments
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// success!("Authorized with Spotify");
/// success!("Playing {} on {}", track.name, device.name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits the process with status 1.
///
/// # Arguments
///
/// Accepts the same arguments as `println!`.
///
/// # Behavior
///
/// The process exits right after printing. Only the command-line shell uses
/// this, once an error has been reported and there is nothing left to do.
/// Library code returns [`Res`] instead.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration. Err: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for problems the user can act on.
///
/// Also used for failures that do not stop the current operation, such as
/// a token cache that cannot be written.
///
/// # Arguments
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// warning!("No active device, using {}", device.name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
