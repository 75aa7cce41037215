//! Live Region Monitor CLI
//!
//! Replays recorded accessibility events through the announcement scheduler.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use live_region_monitor::live::{BrailleChannel, SpeechChannel};
use live_region_monitor::{replay, LiveRegionConfig, MemorySettings, Scheduler, StaticTree};

#[derive(Parser)]
#[command(name = "lrm")]
#[command(about = "Live Region Monitor - prioritised announcements for live regions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSONL event script through the scheduler
    Replay {
        /// Script path
        script: PathBuf,
        /// Config file (default: user config dir)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Speech output only
        #[arg(long)]
        no_braille: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<LiveRegionConfig> {
    match path {
        Some(path) => LiveRegionConfig::load_from(path),
        None => LiveRegionConfig::load(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // RUST_LOG overrides, e.g. RUST_LOG=live_region_monitor=debug lrm replay script.jsonl
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("live_region_monitor=info,lrm=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            config,
            no_braille,
            json,
        } => {
            let config = load_config(config.as_ref())?;
            let steps = replay::load_script(&script)?;
            info!(script = %script.display(), steps = steps.len(), "Starting replay");

            let braille_width = config.braille_width;
            let mut scheduler = Scheduler::new(config.clone(), Box::new(MemorySettings::new(config.enabled)));
            scheduler.register_channel(Arc::new(SpeechChannel::stdout()));
            if !no_braille {
                scheduler.register_channel(Arc::new(BrailleChannel::stdout(braille_width)));
            }

            let mut tree = StaticTree::new();
            let summary = replay::run(steps, &mut scheduler, &mut tree).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!();
                println!("Replay summary:");
                println!("  steps: {}", summary.steps);
                println!(
                    "  events: {} (queued {}, duplicates {}, rejected {})",
                    summary.events, summary.queued, summary.duplicates, summary.rejected
                );
                println!("  commands: {} ({} handled)", summary.commands, summary.commands_handled);
                println!("  still pending: {}", summary.still_pending);
            }
        }
        Commands::Config { json } => {
            let config = LiveRegionConfig::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Config file: {}", LiveRegionConfig::path().display());
                println!("  enabled: {}", config.enabled);
                println!("  queue_size: {}", config.queue_size);
                println!("  history_size: {}", config.history_size);
                println!("  keep_alive_secs: {}", config.keep_alive_secs);
                println!("  tick_interval_ms: {}", config.tick_interval_ms);
                println!("  present_from_inactive_tab: {}", config.present_from_inactive_tab);
                println!("  urgent_interrupts_normal: {}", config.urgent_interrupts_normal);
                println!("  queue_while_suspended: {}", config.queue_while_suspended);
                println!("  braille_width: {}", config.braille_width);
            }
        }
    }

    Ok(())
}
