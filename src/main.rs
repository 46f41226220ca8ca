mod config;
mod error;
mod library;
mod lyrics;
mod server;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lyricstation", version, about = "Music streaming server with synced lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Override the music folder for this run.
    #[arg(long)]
    music_dir: Option<std::path::PathBuf>,

    /// Override the listen host for this run.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port for this run.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Resolve lyrics for one track and print the JSON result (headless).
    Resolve {
        /// Track path relative to the music folder.
        #[arg(long)]
        path: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
    },
    /// Print the music folder listing as JSON (headless).
    Scan,
    /// Persist the effective settings, including command-line overrides, to the config file.
    SaveConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("load config")?;
    if let Some(dir) = cli.music_dir {
        cfg.paths.music_dir = dir;
    }
    if let Some(host) = cli.host {
        cfg.server.host = host;
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::run_server(cfg).await?,
        Command::Resolve {
            path,
            title,
            artist,
        } => {
            let store = lyrics::LocalLyricStore::new(cfg.paths.music_dir.clone());
            let resolver = lyrics::LyricResolver::from_config(store, &cfg.lyrics)?;
            let track = lyrics::TrackRef::new(library::TrackPath::parse(&path)?, title, artist);
            let result = resolver.resolve(&track).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Scan => {
            let files = library::scan::scan(&cfg.paths.music_dir)
                .with_context(|| format!("scan {}", cfg.paths.music_dir.display()))?;
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
        Command::SaveConfig => {
            config::save(&cfg, cli.config.as_deref()).context("save config")?;
            println!("Updated config.");
        }
    }

    Ok(())
}
