mod app;
mod domain;
mod storage;
mod store;
mod ui;
mod usecase;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use app::App;
use domain::todo::{Priority, Todo};
use storage::TodoStorage;
use storage::json::JsonFileStorage;
use storage::memory::MemoryStorage;
use store::TodoStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "tsugi — local-first todo TUI", long_about = None)]
struct Args {
    /// Tick interval of render loop in milliseconds
    #[arg(long, default_value_t = 120)]
    tick_ms: u64,

    /// Start with demo tasks (implies an in-memory store)
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Use an in-memory store instead of the JSON file
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Path to the JSON data file (default: OS data dir)
    #[arg(long)]
    data_path: Option<PathBuf>,

    /// Write diagnostics to this file (default: OS data dir, only with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let storage: Box<dyn TodoStorage> = if args.demo {
        Box::new(MemoryStorage::with_seed(seed_todos()))
    } else if args.memory {
        Box::new(MemoryStorage::default())
    } else {
        open_file_storage(args.data_path)
    };

    let store = TodoStore::open(storage);
    let app = App::new(store);
    ui::run(app, Duration::from_millis(args.tick_ms))
}

fn seed_todos() -> Vec<Todo> {
    vec![
        Todo::new("Write documentation", Priority::Medium),
        Todo::new("Review the release checklist", Priority::High),
        Todo::new("Water the plants", Priority::Low),
    ]
}

fn open_file_storage(path: Option<PathBuf>) -> Box<dyn TodoStorage> {
    let opened = match path {
        Some(path) => JsonFileStorage::open(path),
        None => JsonFileStorage::open_default(),
    };
    match opened {
        Ok(storage) => {
            debug!("todo file: {}", storage.path().display());
            Box::new(storage)
        }
        Err(err) => {
            // Degrade to an ephemeral list rather than refuse to start.
            warn!("todo file unavailable, falling back to in-memory store: {err:#}");
            Box::new(MemoryStorage::default())
        }
    }
}

/// The terminal belongs to the TUI, so diagnostics go to a file — and only
/// when asked for via --log-file or RUST_LOG.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    if log_file.is_none() && std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => default_log_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}

fn default_log_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data dir")?;
    Ok(base.join("tsugi").join("tsugi.log"))
}
