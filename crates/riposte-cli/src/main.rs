//! Headless runner for scripted duels.
//!
//! ```text
//! riposte run --script duel.json [--catalog skills.json] [--config engine.json] [--snapshots]
//! riposte validate --catalog skills.json --tick 100
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); the transcript is printed
//! to stdout as JSON.

mod script;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use riposte_core::config::EngineConfig;
use riposte_core::engine::Engine;
use riposte_core::event::CombatEvent;
use riposte_core::history::HistoryEntry;
use riposte_core::skill::SkillCatalog;
use riposte_core::snapshot::EngineSnapshot;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::script::Script;

#[derive(Parser)]
#[command(name = "riposte")]
#[command(about = "Run scripted duels against the Riposte engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a command script and print the transcript
    Run {
        /// Command script (JSON)
        #[arg(long)]
        script: PathBuf,

        /// Skill catalog (JSON array); defaults to the bundled catalog
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Engine config (JSON); defaults apply to missing fields
        #[arg(long)]
        config: Option<PathBuf>,

        /// Include per-tick state snapshots in the event stream
        #[arg(long, default_value = "false")]
        snapshots: bool,
    },

    /// Validate a skill catalog against a tick quantum
    Validate {
        /// Skill catalog (JSON array); defaults to the bundled catalog
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Tick quantum in milliseconds
        #[arg(long, default_value = "100")]
        tick: u64,
    },
}

#[derive(Serialize)]
struct Transcript {
    events: Vec<CombatEvent>,
    history: Vec<HistoryEntry>,
    summary: TranscriptSummary,
    snapshot: EngineSnapshot,
}

#[derive(Serialize)]
struct TranscriptSummary {
    applied: usize,
    rejected: usize,
    ticks: u32,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_catalog(path: Option<&Path>, quantum: u64) -> Result<SkillCatalog> {
    let catalog = match path {
        Some(path) => SkillCatalog::from_json_str(&read(path)?, quantum)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => SkillCatalog::bundled(quantum).context("loading bundled catalog")?,
    };
    Ok(catalog)
}

fn run(script: &Path, catalog: Option<&Path>, config: Option<&Path>, snapshots: bool) -> Result<()> {
    let config: EngineConfig = match config {
        Some(path) => serde_json::from_str(&read(path)?)
            .with_context(|| format!("parsing config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let catalog = load_catalog(catalog, config.tick_interval_ms)?;
    let script: Script = serde_json::from_str(&read(script)?)
        .with_context(|| format!("parsing script {}", script.display()))?;

    let mut engine = Engine::new(config, catalog).context("building engine")?;
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    engine.subscribe(move |event| {
        if !snapshots && matches!(event, CombatEvent::StateUpdate(_)) {
            return;
        }
        if let Ok(mut events) = sink.lock() {
            events.push(event.clone());
        }
    });

    engine.start();
    let summary = script.replay(&mut engine);
    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        ticks = summary.ticks,
        final_tick = engine.current_tick(),
        ended = engine.is_ended(),
        "script finished"
    );

    let events = events
        .lock()
        .map(|mut events| std::mem::take(&mut *events))
        .map_err(|_| anyhow::anyhow!("event recorder poisoned"))?;
    let transcript = Transcript {
        events,
        history: engine.history().entries().to_vec(),
        summary: TranscriptSummary {
            applied: summary.applied,
            rejected: summary.rejected,
            ticks: summary.ticks,
        },
        snapshot: engine.snapshot(),
    };
    serde_json::to_writer_pretty(std::io::stdout().lock(), &transcript)
        .context("writing transcript")?;
    println!();
    Ok(())
}

fn validate(catalog: Option<&Path>, tick: u64) -> Result<()> {
    let catalog = load_catalog(catalog, tick)?;
    for skill in catalog.skills() {
        tracing::debug!(skill = %skill.id, duration_ms = skill.total_duration(), "skill ok");
    }
    println!("{} skills valid for a {tick}ms tick", catalog.len());
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            catalog,
            config,
            snapshots,
        } => run(&script, catalog.as_deref(), config.as_deref(), snapshots),
        Commands::Validate { catalog, tick } => validate(catalog.as_deref(), tick),
    }
}
