// Engine configuration from files and environment
use rask_log_engine::app::config::ConfigError;
use rask_log_engine::{ConsoleMode, EngineConfig, LogEngine, Severity};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 6] = [
    "RASK_LOG_CONFIG",
    "RASK_LOG_MAX_PENDING",
    "RASK_LOG_MIRROR_TRACING",
    "RASK_LOG_CONSOLE",
    "RASK_LOG_MIRROR_MIN_SEVERITY",
    "RASK_LOG_WORKER_NAME",
];

fn clean_all_env_vars() {
    for name in ENV_VARS {
        unsafe {
            env::remove_var(name);
        }
    }
}

#[test]
fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
max_pending = 4096
mirror_tracing = false
console = "always"
mirror_min_severity = "error"
worker_name = "audit-log"
"#
    )
    .unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();

    assert_eq!(config.max_pending, Some(4096));
    assert!(!config.mirror_tracing);
    assert_eq!(config.console, ConsoleMode::Always);
    assert_eq!(config.mirror_min_severity, Severity::Error);
    assert_eq!(config.worker_name, "audit-log");
}

#[test]
fn test_missing_config_file() {
    let result = EngineConfig::from_file("/nonexistent/rask-log-engine.toml");
    assert!(matches!(result, Err(ConfigError::FileError(_))));
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "max_pending = 0").unwrap();

    let result = EngineConfig::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
#[serial]
fn test_config_from_environment() {
    clean_all_env_vars();
    unsafe {
        env::set_var("RASK_LOG_MAX_PENDING", "512");
        env::set_var("RASK_LOG_MIRROR_TRACING", "false");
        env::set_var("RASK_LOG_CONSOLE", "Never");
        env::set_var("RASK_LOG_MIRROR_MIN_SEVERITY", "warn");
        env::set_var("RASK_LOG_WORKER_NAME", "env-worker");
    }

    let config = EngineConfig::from_env().unwrap();

    assert_eq!(config.max_pending, Some(512));
    assert!(!config.mirror_tracing);
    assert_eq!(config.console, ConsoleMode::Never);
    assert_eq!(config.mirror_min_severity, Severity::Warning);
    assert_eq!(config.worker_name, "env-worker");

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_inline_config_with_env_override() {
    clean_all_env_vars();
    unsafe {
        env::set_var("RASK_LOG_CONFIG", "max_pending = 10\nconsole = \"always\"");
        env::set_var("RASK_LOG_MAX_PENDING", "unbounded");
    }

    let config = EngineConfig::from_env().unwrap();

    assert_eq!(config.max_pending, None);
    assert_eq!(config.console, ConsoleMode::Always);

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_invalid_environment_value() {
    clean_all_env_vars();
    unsafe {
        env::set_var("RASK_LOG_MIRROR_MIN_SEVERITY", "verbose");
    }

    let result = EngineConfig::from_env();
    assert!(matches!(result, Err(ConfigError::EnvError(_))));

    clean_all_env_vars();
}

#[test]
fn test_worker_thread_uses_configured_name() {
    let engine = LogEngine::new(EngineConfig {
        worker_name: "named-worker".to_string(),
        mirror_tracing: false,
        console: ConsoleMode::Never,
        ..EngineConfig::default()
    })
    .unwrap();

    let (tx, rx) = std::sync::mpsc::channel();
    let tx = parking_lot::Mutex::new(tx);
    engine.add_handler(std::sync::Arc::new(rask_log_engine::FnHandler::new(
        move |_: &rask_log_engine::LogRecord| {
            let name = std::thread::current().name().map(str::to_string);
            let _ = tx.lock().send(name);
        },
    )));
    engine.log(Severity::Info, "where am I");
    engine.flush();

    assert_eq!(rx.recv().unwrap().as_deref(), Some("named-worker"));
}
