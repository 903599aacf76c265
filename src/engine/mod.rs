//! The serialization and dispatch core.
//!
//! Every engine operation becomes a [`Command`](command::Command) on one FIFO
//! channel. A single worker thread drains that channel, so all operations are
//! totally ordered no matter which thread issued them, and each record is
//! fanned out to every registered handler before the next operation starts.

mod command;
pub mod mirror;
pub mod registry;
mod stats;
mod worker;

pub use mirror::format_console_line;
pub use registry::HandlerRegistry;
pub use stats::EngineStats;

use crate::app::config::{ConfigError, EngineConfig};
use crate::domain::{Category, Severity};
use crate::handler::{FaultSink, LogHandler, TracingFaultSink};
use chrono::Utc;
use command::{Command, PendingEmit};
use mirror::Mirror;
use parking_lot::Mutex;
use stats::EngineStatsCollector;
use std::io::Write;
use std::sync::{Arc, OnceLock};
use std::thread::{JoinHandle, ThreadId};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use worker::{StopSignal, Worker};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to spawn log engine worker '{name}': {source}")]
    WorkerSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Asynchronous, multi-handler log engine.
///
/// `emit`, `add_handler`, `remove_handler` and `remove_all_handlers` return as
/// soon as the operation is enqueued. `flush` blocks until everything enqueued
/// before it has been processed.
pub struct LogEngine {
    sender: mpsc::UnboundedSender<Command>,
    stats: Arc<EngineStatsCollector>,
    max_pending: Option<usize>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    stop: Arc<StopSignal>,
}

static SHARED: OnceLock<LogEngine> = OnceLock::new();

impl LogEngine {
    /// Process-wide engine, built from [`EngineConfig::from_env`] on first access.
    ///
    /// Falls back to the default configuration when the environment is invalid.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread cannot be spawned on first access.
    pub fn shared() -> &'static LogEngine {
        SHARED.get_or_init(|| {
            let config = EngineConfig::from_env().unwrap_or_else(|e| {
                eprintln!("Warning: {e}, using default log engine configuration");
                EngineConfig::default()
            });
            match LogEngine::new(config) {
                Ok(engine) => engine,
                Err(e) => panic!("cannot start shared log engine: {e}"),
            }
        })
    }

    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Enqueues one record. Never fails; when the backlog bound is reached or
    /// the engine has shut down, the record is dropped and counted.
    pub fn emit(&self, severity: Severity, message: impl Into<String>, category: &Category) {
        if !self.stats.try_reserve(self.max_pending) {
            if self.stats.record_dropped() {
                warn!(
                    max_pending = self.max_pending,
                    "log engine backlog full, dropping records"
                );
            }
            return;
        }

        let command = Command::Emit(PendingEmit {
            severity,
            category: category.clone(),
            message: message.into(),
            emitted_at: Utc::now(),
        });

        if self.sender.send(command).is_ok() {
            self.stats.record_emitted();
        } else {
            self.stats.release();
            self.stats.record_dropped();
        }
    }

    /// Emits with [`Category::GENERAL`].
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.emit(severity, message, &Category::GENERAL);
    }

    pub fn debug(&self, message: impl Into<String>, category: &Category) {
        self.emit(Severity::Debug, message, category);
    }

    pub fn info(&self, message: impl Into<String>, category: &Category) {
        self.emit(Severity::Info, message, category);
    }

    pub fn warning(&self, message: impl Into<String>, category: &Category) {
        self.emit(Severity::Warning, message, category);
    }

    pub fn error(&self, message: impl Into<String>, category: &Category) {
        self.emit(Severity::Error, message, category);
    }

    pub fn critical(&self, message: impl Into<String>, category: &Category) {
        self.emit(Severity::Critical, message, category);
    }

    /// Appends `handler` to the registry. It observes only records enqueued
    /// after this call. Registering the same handler twice doubles delivery.
    pub fn add_handler(&self, handler: Arc<dyn LogHandler>) {
        self.submit(Command::AddHandler(handler));
    }

    /// Removes every registration of `handler` (compared by identity).
    pub fn remove_handler(&self, handler: &Arc<dyn LogHandler>) {
        self.submit(Command::RemoveHandler(Arc::clone(handler)));
    }

    pub fn remove_all_handlers(&self) {
        self.submit(Command::RemoveAllHandlers);
    }

    /// Blocks until every operation enqueued before this call has completed.
    ///
    /// Called from inside a handler (on the worker thread) this returns
    /// immediately, since waiting there could never finish.
    pub fn flush(&self) {
        if self.is_worker_thread() {
            warn!("flush called from a log handler; skipping to avoid deadlock");
            return;
        }

        let (done_tx, done_rx) = std::sync::mpsc::sync_channel::<()>(1);
        let signal = Box::new(move || {
            let _ = done_tx.send(());
        });

        if self.sender.send(Command::Barrier(signal)).is_err() {
            return;
        }
        // Err means the worker exited and dropped the barrier, so nothing is left to wait for
        let _ = done_rx.recv();
    }

    /// Awaitable variant of [`LogEngine::flush`] for async callers.
    pub async fn flush_async(&self) {
        if self.is_worker_thread() {
            warn!("flush_async called from a log handler; skipping to avoid deadlock");
            return;
        }

        let (done_tx, done_rx) = oneshot::channel::<()>();
        let signal = Box::new(move || {
            let _ = done_tx.send(());
        });

        if self.sender.send(Command::Barrier(signal)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }

    pub fn stats(&self) -> EngineStats {
        self.stats.snapshot()
    }

    /// Processes everything already enqueued, then stops the worker.
    /// Later operations are ignored and later emits are counted as dropped.
    ///
    /// Every caller off the worker thread returns only once the worker has
    /// stopped, including callers racing an earlier shutdown.
    pub fn shutdown(&self) {
        let handle = self.worker.lock().take();
        let Some(handle) = handle else {
            if !self.is_worker_thread() {
                self.stop.wait();
            }
            return;
        };

        if self.sender.send(Command::Shutdown).is_err() {
            debug!("log engine worker already gone");
        }

        if self.is_worker_thread() {
            // The worker exits once it returns from the current handler
            return;
        }

        if handle.join().is_err() {
            warn!("log engine worker terminated abnormally");
        }
    }

    fn submit(&self, command: Command) {
        if self.sender.send(command).is_err() {
            debug!("log engine is shut down; ignoring operation");
        }
    }

    fn is_worker_thread(&self) -> bool {
        std::thread::current().id() == self.worker_id
    }
}

impl Drop for LogEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for LogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogEngine")
            .field("max_pending", &self.max_pending)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Builds a [`LogEngine`] with optional console writer and fault sink overrides.
#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    console_writer: Option<Box<dyn Write + Send>>,
    fault_sink: Option<Arc<dyn FaultSink>>,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces stdout as the console mirror destination. The writer is only
    /// used when the configured [`ConsoleMode`](crate::ConsoleMode) is enabled.
    pub fn console_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.console_writer = Some(writer);
        self
    }

    pub fn fault_sink(mut self, sink: Arc<dyn FaultSink>) -> Self {
        self.fault_sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<LogEngine, EngineError> {
        let config = self.config;
        config.validate()?;

        let console = if config.console.is_enabled() {
            Some(
                self.console_writer
                    .unwrap_or_else(|| Box::new(std::io::stdout())),
            )
        } else {
            None
        };
        let mirror = Mirror::new(config.mirror_tracing, console, config.mirror_min_severity);
        let fault_sink = self
            .fault_sink
            .unwrap_or_else(|| Arc::new(TracingFaultSink));

        let stats = Arc::new(EngineStatsCollector::new());
        let stop = Arc::new(StopSignal::default());
        let worker = Worker::new(mirror, fault_sink, stats.clone(), stop.clone());
        let (sender, receiver) = mpsc::unbounded_channel();

        let handle = std::thread::Builder::new()
            .name(config.worker_name.clone())
            .spawn(move || worker.run(receiver))
            .map_err(|source| EngineError::WorkerSpawn {
                name: config.worker_name.clone(),
                source,
            })?;

        debug!(
            worker = %config.worker_name,
            max_pending = config.max_pending,
            "log engine started"
        );

        Ok(LogEngine {
            sender,
            stats,
            max_pending: config.max_pending,
            worker_id: handle.thread().id(),
            worker: Mutex::new(Some(handle)),
            stop,
        })
    }
}
