// Shared helpers for integration tests
#![allow(dead_code)]

use rask_log_engine::{ConsoleMode, EngineConfig, LogEngine, LogHandler, MemoryHandler};
use std::sync::Arc;

/// Engine without tracing or console mirrors, so test output stays clean.
pub fn quiet_engine() -> LogEngine {
    LogEngine::new(quiet_config()).expect("engine should start")
}

pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        mirror_tracing: false,
        console: ConsoleMode::Never,
        ..EngineConfig::default()
    }
}

/// Registers a fresh memory handler and returns both views of it.
pub fn register_memory(engine: &LogEngine) -> Arc<MemoryHandler> {
    let memory = Arc::new(MemoryHandler::new());
    let handler: Arc<dyn LogHandler> = memory.clone();
    engine.add_handler(handler);
    memory
}
