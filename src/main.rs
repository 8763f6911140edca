mod app;
mod card;
mod config;
mod cover;
mod export;
mod input;
mod lyrics;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lyricard", version, about = "Turn song lyrics into shareable cards")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive card workflow (default).
    Tui,
    /// Search songs and print matches (headless).
    Search { query: String },
    /// Print the selectable lyric lines of the best search match (headless).
    Lyrics { track: String, artist: String },
    /// Resolve album artwork through the provider cascade (headless).
    Cover { track: String, artist: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let cfg_path = match cli.config.clone() {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            let mut app = app::App::new(cfg, cfg_path);
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Search { query } => {
            let lrclib = lyrics::LrclibClient::new();
            let songs = lrclib.search(&query).await?;
            if songs.is_empty() {
                println!("No songs found.");
            }
            print_songs(&songs);
        }
        Command::Lyrics { track, artist } => {
            let lrclib = lyrics::LrclibClient::new();
            let query = format!("{track} {artist}");
            let songs = lrclib.search(&query).await?;
            let Some(song) = songs.first() else {
                println!("No songs found.");
                return Ok(());
            };
            let lines = lyrics::lyric_lines(song);
            if lines.is_empty() {
                println!("{} — {}: no lyrics available", song.name, song.artist);
                return Ok(());
            }
            for line in lines {
                println!("{line}");
            }
        }
        Command::Cover { track, artist } => {
            let resolver = cover::CoverResolver::from_config(&cfg.cover);
            match resolver.resolve(&track, &artist).await {
                Some(url) => println!("{url}"),
                None => println!("No cover found."),
            }
        }
    }

    Ok(())
}

fn print_songs(songs: &[lyrics::Song]) {
    for (i, s) in songs.iter().enumerate() {
        let album = s
            .album
            .as_deref()
            .map(|a| format!(" · {a}"))
            .unwrap_or_default();
        let duration = lyrics::lrclib::format_duration(s.duration);
        println!("{:02}. {} — {}{}  {}", i + 1, s.name, s.artist, album, duration);
    }
}
