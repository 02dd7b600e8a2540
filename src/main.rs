use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use moodtune::{
    cli,
    config::{self, Config},
    error,
    jukebox::LiveJukebox,
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightBlue.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify and cache the token
    Auth,

    /// List the Spotify devices available for playback
    Devices,

    /// Recommend a song for a mood and play it
    Play(PlayOptions),

    /// Run the web page on the local server address
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    /// How are you feeling today? (e.g. 'happy', 'relaxed')
    pub mood: String,

    /// Device id or name; defaults to the active device
    #[clap(long, short)]
    pub device: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Open the page in the default browser
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };
    let mut jukebox = LiveJukebox::from_config(&config);

    match cli.command {
        Command::Auth => {
            let shared = Arc::new(Mutex::new(jukebox));
            cli::auth(shared, config.server_addr.clone()).await;
        }
        Command::Devices => cli::devices(&mut jukebox).await,
        Command::Play(opt) => cli::play(&mut jukebox, opt.mood, opt.device).await,
        Command::Serve(opt) => {
            let shared = Arc::new(Mutex::new(jukebox));
            cli::serve(shared, config.server_addr.clone(), opt.open).await;
        }
        Command::Completions(_) => {}
    }
}
