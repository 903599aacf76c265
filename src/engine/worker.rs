use super::command::{Command, PendingEmit};
use super::mirror::Mirror;
use super::registry::HandlerRegistry;
use super::stats::EngineStatsCollector;
use crate::domain::LogRecord;
use crate::handler::{FaultSink, HandlerFault};
use parking_lot::{Condvar, Mutex};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, trace};

/// Latched once the worker loop has exited, so every shutdown caller can wait for it.
#[derive(Default)]
pub(crate) struct StopSignal {
    stopped: Mutex<bool>,
    cond: Condvar,
}

impl StopSignal {
    pub fn notify(&self) {
        *self.stopped.lock() = true;
        self.cond.notify_all();
    }

    pub fn wait(&self) {
        let mut stopped = self.stopped.lock();
        while !*stopped {
            self.cond.wait(&mut stopped);
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }
}

// Notifies on drop so waiters are released even if the loop unwinds
struct NotifyOnExit(Arc<StopSignal>);

impl Drop for NotifyOnExit {
    fn drop(&mut self) {
        self.0.notify();
    }
}

/// Sole consumer of the serialization stream.
///
/// Owns the handler registry; every mutation and every fan-out happens here,
/// one command at a time, in enqueue order.
pub(crate) struct Worker {
    registry: HandlerRegistry,
    mirror: Mirror,
    fault_sink: Arc<dyn FaultSink>,
    stats: Arc<EngineStatsCollector>,
    stop: Arc<StopSignal>,
    next_sequence: u64,
}

impl Worker {
    pub fn new(
        mirror: Mirror,
        fault_sink: Arc<dyn FaultSink>,
        stats: Arc<EngineStatsCollector>,
        stop: Arc<StopSignal>,
    ) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            mirror,
            fault_sink,
            stats,
            stop,
            next_sequence: 0,
        }
    }

    /// Drains commands until a shutdown marker arrives or every sender is gone.
    pub fn run(mut self, mut commands: UnboundedReceiver<Command>) {
        let _notify = NotifyOnExit(self.stop.clone());
        debug!("log engine worker started");

        while let Some(command) = commands.blocking_recv() {
            trace!(command = command.kind(), "processing command");
            match command {
                Command::Emit(pending) => {
                    self.dispatch(pending);
                    self.stats.record_processed();
                }
                Command::AddHandler(handler) => {
                    self.registry.add(handler);
                    self.stats.set_handlers(self.registry.len());
                }
                Command::RemoveHandler(handler) => {
                    let removed = self.registry.remove(&handler);
                    debug!(removed, "removed handler registrations");
                    self.stats.set_handlers(self.registry.len());
                }
                Command::RemoveAllHandlers => {
                    self.registry.clear();
                    self.stats.set_handlers(0);
                }
                Command::Barrier(signal) => signal(),
                Command::Shutdown => {
                    self.discard_remaining(&mut commands);
                    break;
                }
            }
        }

        debug!(records = self.next_sequence, "log engine worker stopped");
    }

    /// Closes the stream and drops whatever was enqueued behind the shutdown marker.
    /// Emits among them count as dropped; barriers release their waiters when dropped.
    fn discard_remaining(&self, commands: &mut UnboundedReceiver<Command>) {
        commands.close();

        let mut discarded = 0usize;
        while let Ok(command) = commands.try_recv() {
            if let Command::Emit(_) = command {
                self.stats.release();
                self.stats.record_dropped();
                discarded += 1;
            }
        }

        if discarded > 0 {
            debug!(discarded, "dropped records enqueued after shutdown");
        }
    }

    fn dispatch(&mut self, pending: PendingEmit) {
        let record = LogRecord::new(
            self.next_sequence,
            pending.emitted_at,
            pending.severity,
            pending.category,
            pending.message,
        );
        self.next_sequence += 1;

        for (index, handler) in self.registry.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| handler.receive(&record))) {
                Ok(()) => self.stats.record_delivered(),
                Err(payload) => {
                    self.stats.record_fault();
                    let fault = HandlerFault::from_panic(index, record.sequence(), payload.as_ref());
                    self.report_fault(&fault);
                }
            }
        }

        self.mirror.mirror(&record);
    }

    fn report_fault(&self, fault: &HandlerFault) {
        let diagnostic = fault.to_record();
        let sink = &self.fault_sink;
        if panic::catch_unwind(AssertUnwindSafe(|| sink.report(&diagnostic))).is_err() {
            error!(
                handler_index = fault.handler_index,
                record_sequence = fault.record_sequence,
                "fault sink panicked while reporting a handler fault"
            );
        }
    }
}
