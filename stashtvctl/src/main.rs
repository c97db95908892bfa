use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use stashtv_config::{FeedConfig, FeedConfigSource, apply_guard_rails};
use stashtv_core::{
    FeedCommand, FeedHandle, FeedNotice, FeedRuntime, FeedSession,
    ManualVisibility, SessionSnapshot, VecSceneSource,
};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod player;

use player::SimPlayer;

#[derive(Parser)]
#[command(
    name = "stashtvctl",
    about = "Drive and inspect a stashtv feed session"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scroll through a JSON fixture of scenes one item at a time
    Simulate {
        /// JSON array of scenes in the server's shape
        #[arg(long)]
        fixture: PathBuf,
        /// Config file; falls back to STASHTV_CONFIG_* and default files
        #[arg(long)]
        config: Option<PathBuf>,
        /// Stop after this many items (default: until the feed runs out)
        #[arg(long)]
        steps: Option<usize>,
        /// Seconds "watched" on each item before scrolling on
        #[arg(long, default_value_t = 5.0)]
        dwell: f64,
        /// Print the final session snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load a config and report guard rail errors and warnings
    Check {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            fixture,
            config,
            steps,
            dwell,
            json,
        } => simulate(&fixture, config.as_deref(), steps, dwell, json).await,
        Command::Check { config } => check(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<(FeedConfig, FeedConfigSource)> {
    match path {
        Some(path) => {
            let config = FeedConfig::load_from_file(path)?;
            Ok((config, FeedConfigSource::File(path.to_path_buf())))
        }
        None => FeedConfig::load_from_env(),
    }
}

fn check(path: Option<&Path>) -> Result<()> {
    let (config, source) = load_config(path)?;
    let warnings = apply_guard_rails(&config)
        .with_context(|| format!("config from {source} rejected"))?;

    println!("config from {source}");
    println!(
        "page_size={} prefetch_margin={} visibility_threshold={} maximum_scenes={}",
        config.tuning.page_size,
        config.tuning.prefetch_margin,
        config.tuning.visibility_threshold,
        config
            .plugin
            .maximum_scenes
            .map_or_else(|| "unbounded".to_string(), |max| max.to_string()),
    );
    for warning in &warnings {
        println!("warning: {warning}");
    }
    if warnings.is_empty() {
        println!("ok");
    }
    Ok(())
}

async fn simulate(
    fixture: &Path,
    config: Option<&Path>,
    steps: Option<usize>,
    dwell: f64,
    json: bool,
) -> Result<()> {
    let (config, source_kind) = load_config(config)?;
    apply_guard_rails(&config)
        .with_context(|| format!("config from {source_kind} rejected"))?;

    let raw = std::fs::read_to_string(fixture).with_context(|| {
        format!("failed to read fixture {}", fixture.display())
    })?;
    let source = VecSceneSource::from_json(&raw)
        .with_context(|| format!("invalid fixture {}", fixture.display()))?;
    tracing::info!(
        scenes = source.len(),
        config = %source_kind,
        "starting simulated feed"
    );

    let session =
        FeedSession::new(ManualVisibility, config.tuning, &config.plugin)?;
    let runtime = FeedRuntime::new(session, Arc::new(source));
    let mut notices = runtime.subscribe();
    let (feed, join) = runtime.spawn();

    let mut snapshot = settle(&feed, &mut notices).await?;
    let limit = steps.unwrap_or(usize::MAX);
    let mut index = 0;

    while index < limit && index < snapshot.cursor.loaded_count {
        feed.send(FeedCommand::Register {
            index,
            handle: Some(()),
        })?;
        feed.send(FeedCommand::AttachPlayer {
            index,
            player: Box::new(SimPlayer::new(index)),
        })?;
        feed.report_visibility(index, 1.0)?;
        if index > 0 {
            feed.report_visibility(index - 1, 0.0)?;
            feed.send(FeedCommand::DetachPlayer { index: index - 1 })?;
            feed.send(FeedCommand::Unregister { index: index - 1 })?;
        }
        feed.send(FeedCommand::Scrub {
            index,
            seconds: dwell,
        })?;

        snapshot = settle(&feed, &mut notices).await?;
        index += 1;
    }

    if index < limit {
        if snapshot.exhausted {
            println!("end of feed after {index} items");
        } else {
            println!("feed stopped growing after {index} items");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    drop(feed);
    join.await.context("feed runtime panicked")?;
    Ok(())
}

/// Wait until no fetch is in flight, printing every notice on the way.
async fn settle(
    feed: &FeedHandle<()>,
    notices: &mut broadcast::Receiver<FeedNotice>,
) -> Result<SessionSnapshot> {
    const POLL: Duration = Duration::from_millis(5);
    const MAX_POLLS: usize = 2_000;

    for _ in 0..MAX_POLLS {
        let snapshot = feed.snapshot().await?;
        drain(notices);
        if !snapshot.cursor.pending_request {
            return Ok(snapshot);
        }
        tokio::time::sleep(POLL).await;
    }
    bail!("feed fetch did not complete")
}

fn drain(notices: &mut broadcast::Receiver<FeedNotice>) {
    loop {
        match notices.try_recv() {
            Ok(notice) => println!("{}", describe(&notice)),
            Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                tracing::warn!(missed, "notice subscriber lagged");
            }
            Err(_) => break,
        }
    }
}

fn describe(notice: &FeedNotice) -> String {
    fn slot(index: Option<usize>) -> String {
        index.map_or_else(|| "none".to_string(), |i| i.to_string())
    }

    match notice {
        FeedNotice::ActiveChanged { previous, current } => {
            format!("active {} -> {}", slot(*previous), slot(*current))
        }
        FeedNotice::WindowGrew { range, dropped } => format!(
            "window grew to {} items (+{}, {dropped} dropped)",
            range.end,
            range.len()
        ),
        FeedNotice::FeedExhausted { loaded } => {
            format!("feed exhausted at {loaded} items")
        }
        FeedNotice::FetchFailed { offset, message } => {
            format!("fetch at offset {offset} failed: {message}")
        }
        FeedNotice::TapFeedbackShown(feedback) => {
            format!("tap on {}: {:?}", feedback.index, feedback.kind)
        }
        FeedNotice::TapFeedbackHidden { index } => {
            format!("tap indicator on {index} hidden")
        }
        FeedNotice::ItemUpdated { index, state } => format!(
            "item {index} at {:.1}s paused={} muted={}",
            state.current_time_seconds, state.paused, state.muted
        ),
        FeedNotice::DisplayChanged(flags) => format!(
            "display fullscreen={} letterbox={}",
            flags.fullscreen, flags.letterbox
        ),
    }
}
