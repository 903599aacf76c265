//! Command-line driver: exercises an engine under concurrent load and reports its counters.

pub mod config;
pub mod telemetry;

pub use config::{ConfigError, ConsoleMode, EngineConfig};

use crate::domain::{Category, LogRecord, Severity};
use crate::engine::{EngineStats, LogEngine};
use crate::handler::{FnHandler, LogHandler};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TracingLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<TracingLevel> for tracing::Level {
    fn from(level: TracingLevel) -> Self {
        match level {
            TracingLevel::Error => tracing::Level::ERROR,
            TracingLevel::Warn => tracing::Level::WARN,
            TracingLevel::Info => tracing::Level::INFO,
            TracingLevel::Debug => tracing::Level::DEBUG,
            TracingLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Drive a rask log engine with concurrent producers", long_about = None)]
pub struct Cli {
    /// Records emitted by each producer thread
    #[arg(long, env = "RASK_LOG_RECORDS", default_value = "10000")]
    pub records: u64,

    /// Number of producer threads
    #[arg(long, env = "RASK_LOG_THREADS", default_value = "4")]
    pub threads: usize,

    /// Number of counting handlers to register
    #[arg(long, env = "RASK_LOG_HANDLERS", default_value = "2")]
    pub handlers: usize,

    /// Engine configuration file (TOML); environment settings are used otherwise
    #[arg(long, env = "RASK_LOG_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Overrides the configured backlog bound
    #[arg(long)]
    pub max_pending: Option<usize>,

    /// Overrides the configured console mirror mode
    #[arg(long)]
    pub console: Option<ConsoleMode>,

    /// Level for the engine's own diagnostics
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: TracingLevel,
}

impl Cli {
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let mut config = match &self.config_file {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::from_env()?,
        };

        if let Some(max_pending) = self.max_pending {
            config.max_pending = Some(max_pending);
        }
        if let Some(console) = self.console {
            config.console = console;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Result of one load run, printed as JSON by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub producers: usize,
    pub records_per_producer: u64,
    pub handlers: usize,
    /// Records observed by each handler, in registration order.
    pub observed: Vec<u64>,
    pub elapsed_ms: u128,
    pub stats: EngineStats,
}

/// Emits `cli.records` records from each of `cli.threads` threads, cycling
/// through every built-in category and severity, then flushes.
pub fn run_load(engine: &LogEngine, cli: &Cli) -> RunReport {
    let counters: Vec<Arc<AtomicU64>> = (0..cli.handlers)
        .map(|_| Arc::new(AtomicU64::new(0)))
        .collect();

    for counter in &counters {
        let counter = counter.clone();
        let handler: Arc<dyn LogHandler> = Arc::new(FnHandler::new(move |_: &LogRecord| {
            counter.fetch_add(1, Ordering::Relaxed);
        }));
        engine.add_handler(handler);
    }

    let start = Instant::now();
    std::thread::scope(|scope| {
        for producer in 0..cli.threads {
            scope.spawn(move || {
                for i in 0..cli.records {
                    let category =
                        Category::BUILT_IN[(i as usize) % Category::BUILT_IN.len()].clone();
                    let severity = Severity::ALL[(i as usize) % Severity::ALL.len()];
                    engine.emit(severity, format!("producer {producer} record {i}"), &category);
                }
            });
        }
    });
    engine.flush();
    let elapsed = start.elapsed();

    engine.remove_all_handlers();
    engine.flush();

    RunReport {
        producers: cli.threads,
        records_per_producer: cli.records,
        handlers: cli.handlers,
        observed: counters.iter().map(|c| c.load(Ordering::Relaxed)).collect(),
        elapsed_ms: elapsed.as_millis(),
        stats: engine.stats(),
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the binary
pub fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_level.into())?;

    let config = cli.engine_config()?;
    info!(
        "Starting rask-log-engine v{} (producers={}, records={}, handlers={})",
        get_version(),
        cli.threads,
        cli.records,
        cli.handlers
    );

    let engine = LogEngine::new(config)?;
    let report = run_load(&engine, &cli);
    engine.shutdown();

    let per_second = if report.elapsed_ms == 0 {
        0.0
    } else {
        report.stats.processed as f64 * 1000.0 / report.elapsed_ms as f64
    };
    info!(
        processed = report.stats.processed,
        dropped = report.stats.dropped,
        "Load run finished at {per_second:.0} records/s"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
