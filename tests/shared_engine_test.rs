// Process-wide engine access
use rask_log_engine::{Category, LogEngine, LogHandler, MemoryHandler, Severity};
use serial_test::serial;
use std::sync::Arc;

fn reset_shared() -> &'static LogEngine {
    let engine = LogEngine::shared();
    engine.remove_all_handlers();
    engine.flush();
    engine
}

#[test]
#[serial]
fn test_shared_engine_identity() {
    let first = LogEngine::shared();
    let second = LogEngine::shared();
    assert!(std::ptr::eq(first, second));

    let from_thread = std::thread::spawn(|| LogEngine::shared() as *const LogEngine as usize)
        .join()
        .unwrap();
    assert_eq!(from_thread, first as *const LogEngine as usize);
}

#[test]
#[serial]
fn test_shared_engine_delivers_every_severity() {
    let engine = reset_shared();
    let memory = Arc::new(MemoryHandler::new());
    let handler: Arc<dyn LogHandler> = memory.clone();
    engine.add_handler(handler);

    for severity in Severity::ALL {
        engine.emit(severity, format!("{severity} message"), &Category::GENERAL);
    }
    engine.flush();

    assert_eq!(memory.severities(), Severity::ALL.to_vec());
    reset_shared();
}

#[test]
#[serial]
fn test_reset_keeps_the_same_instance() {
    let before = reset_shared() as *const LogEngine;
    let memory = Arc::new(MemoryHandler::new());
    let handler: Arc<dyn LogHandler> = memory.clone();
    LogEngine::shared().add_handler(handler);

    LogEngine::shared().info("kept", &Category::ANALYTICS);
    let after = reset_shared() as *const LogEngine;
    LogEngine::shared().info("after reset", &Category::ANALYTICS);
    LogEngine::shared().flush();

    assert_eq!(before, after);
    assert_eq!(memory.messages(), vec!["kept"]);
}
