// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use console::Emoji;

use podfeed::{
    AudioArtifact, EpisodeOptions, NoopReporter, ProgressReporter, PublishEvent, Publisher,
    SharedProgressReporter, parse_feed_file, read_config,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static NEW: Emoji<'_, '_> = Emoji("✨ ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

/// Maintain a podcast RSS feed and append new episodes to it
#[derive(Parser, Debug)]
#[command(name = "podfeed")]
#[command(about = "Maintain a podcast RSS feed and append new episodes to it")]
#[command(version)]
struct Cli {
    /// Channel configuration file (JSON)
    #[arg(short, long, default_value = "podcast.json")]
    config: PathBuf,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the feed document if it does not exist yet
    Init,

    /// Append an audio file as the next episode
    Append(AppendArgs),

    /// List the episodes currently in the feed
    List,
}

#[derive(Args, Debug)]
struct AppendArgs {
    /// Audio file, relative to the base URL it will be served from
    #[arg(short, long)]
    audio: PathBuf,

    /// Episode title
    #[arg(short, long)]
    title: String,

    /// Episode description
    #[arg(short, long)]
    description: String,

    /// Season number
    #[arg(short, long, default_value = "1")]
    season: u32,

    /// Publish date (RFC 3339, e.g. 2024-01-15T12:00:00+00:00)
    #[arg(long, conflicts_with = "pub_date_now")]
    pub_date: Option<DateTime<chrono::FixedOffset>>,

    /// Use the current time as publish date
    #[arg(long)]
    pub_date_now: bool,
}

impl AppendArgs {
    fn episode_options(&self) -> EpisodeOptions {
        let publish_date = if self.pub_date_now {
            Some(Local::now().fixed_offset())
        } else {
            self.pub_date
        };

        EpisodeOptions {
            season: self.season,
            publish_date,
        }
    }
}

/// Progress reporter printing one colored line per event
struct TerminalReporter;

impl ProgressReporter for TerminalReporter {
    fn report(&self, event: PublishEvent) {
        match event {
            PublishEvent::FeedCreated { path } => {
                println!(
                    "{NEW}Created feed {}",
                    path.display().to_string().cyan()
                );
            }

            PublishEvent::FeedAlreadyPresent { path } => {
                println!(
                    "{FOLDER}Using feed {}",
                    path.display().to_string().cyan()
                );
            }

            PublishEvent::AudioProbed {
                path,
                size,
                duration_secs,
            } => {
                println!(
                    "{SEARCH}{} • {} bytes, {} seconds",
                    path.display().to_string().bold(),
                    size.to_string().cyan(),
                    duration_secs.to_string().cyan()
                );
            }

            PublishEvent::EpisodeAppended {
                episode_index,
                episode_title,
                enclosure_url,
            } => {
                println!(
                    "{SUCCESS}{} {} {}",
                    format!("Episode {episode_index}:").bold().green(),
                    episode_title.green(),
                    enclosure_url.dimmed()
                );
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = read_config(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    if let Command::List = cli.command {
        return list_episodes(&config.xml_path, cli.quiet);
    }

    if !cli.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podfeed".bold().magenta(),
            "- Podcast Feed Publisher".dimmed()
        );
    }

    let reporter: SharedProgressReporter = if cli.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(TerminalReporter)
    };

    let publisher = Publisher::new(config)
        .context("Failed to set up publisher")?
        .with_reporter(reporter);

    publisher
        .ensure_feed()
        .context("Failed to initialize feed")?;

    if let Command::Append(args) = cli.command {
        let artifact = AudioArtifact::new(args.title.clone(), args.description.clone(), &args.audio);

        publisher
            .append_episode(&artifact, &args.episode_options())
            .with_context(|| format!("Failed to publish {}", args.audio.display()))?;
    }

    Ok(())
}

fn list_episodes(feed_path: &std::path::Path, quiet: bool) -> Result<()> {
    let podcast = parse_feed_file(feed_path)
        .with_context(|| format!("Failed to read feed {}", feed_path.display()))?;

    if !quiet {
        println!(
            "\n{}{} • {} episodes\n",
            MICROPHONE,
            podcast.title.bold().green(),
            podcast.episodes.len().to_string().cyan()
        );
    }

    for episode in &podcast.episodes {
        let number = episode
            .episode_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        let url = episode
            .enclosure
            .as_ref()
            .map(|e| e.url.as_str())
            .unwrap_or("");

        println!(
            "{:>4}  {}  {}s  {}",
            number.cyan(),
            episode.title.bold(),
            episode.duration.as_deref().unwrap_or("?"),
            url.dimmed()
        );
    }

    Ok(())
}
