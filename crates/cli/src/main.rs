use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use project::SliceStore;
use serde::Serialize;
use timeline::EngineConfig;
use tracing_subscriber::EnvFilter;
use viewport::{EngineSnapshot, PlaybackEngine, SessionEvent, TimelineEngine};

#[derive(Parser, Debug)]
#[command(name = "slicer", about = "Replay timeline sessions and inspect saved slices")]
struct Cli {
    /// Slice database (defaults to the app data directory).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed a JSON-lines event recording through the engine and print the final state.
    Replay(ReplayArgs),
    /// List persisted slices ordered by start time.
    Slices,
    /// Print the effective engine configuration.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    detail_width: Option<f64>,
    #[arg(long)]
    overview_width: Option<f64>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    events: PathBuf,
    #[command(flatten)]
    engine: ConfigArgs,
    /// Commit into a throwaway in-memory store instead of the database.
    #[arg(long)]
    dry_run: bool,
}

/// Playback stand-in driven entirely by the recorded ticks.
#[derive(Debug, Default)]
struct ReplayClock {
    time: f64,
    playing: bool,
}

impl PlaybackEngine for ReplayClock {
    fn play(&mut self) { self.playing = true; }
    fn pause(&mut self) { self.playing = false; }
    fn seek_to(&mut self, time: f64) { self.time = time; }
    fn current_time(&self) -> f64 { self.time }
    fn is_playing(&self) -> bool { self.playing }
}

#[derive(Serialize)]
struct ReplayReport {
    events: usize,
    errors: usize,
    playing: bool,
    #[serde(flatten)]
    snapshot: EngineSnapshot,
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(project::default_db_path);
    match cli.command {
        Command::Replay(args) => {
            let store = if args.dry_run { SliceStore::open_in_memory()? } else { SliceStore::open_or_create(&db_path)? };
            let config = engine_config(&args.engine)?;
            let report = replay(&args.events, config, store)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Slices => {
            let store = SliceStore::open_or_create(&db_path)?;
            println!("{}", serde_json::to_string_pretty(&store.list_slices()?)?);
        }
        Command::Config(args) => {
            println!("{}", serde_json::to_string_pretty(&engine_config(&args)?)?);
        }
    }
    Ok(())
}

fn engine_config(args: &ConfigArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(px) = args.detail_width {
        config.detail_width_px = px;
    }
    if let Some(px) = args.overview_width {
        config.overview_width_px = px;
    }
    config.validate()?;
    Ok(config)
}

fn read_events(path: &Path) -> Result<Vec<SessionEvent>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut events = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line).with_context(|| format!("{}:{}: bad event", path.display(), n + 1))?;
        events.push(event);
    }
    Ok(events)
}

fn replay(path: &Path, config: EngineConfig, mut store: SliceStore) -> Result<ReplayReport> {
    let events = read_events(path)?;
    let mut engine = TimelineEngine::new(config)?;
    let mut clock = ReplayClock::default();
    let mut errors = 0;

    for (n, event) in events.iter().enumerate() {
        match engine.dispatch(event, &mut store, &mut clock) {
            Ok(()) => {
                if matches!(event, SessionEvent::Load { .. }) {
                    engine.set_committed_slices(&store.list_slices()?);
                }
            }
            Err(err) => {
                errors += 1;
                tracing::warn!(event = n + 1, "{err}");
            }
        }
    }
    tracing::info!(events = events.len(), errors, "replay finished");

    Ok(ReplayReport { events: events.len(), errors, playing: clock.is_playing(), snapshot: engine.snapshot() })
}
