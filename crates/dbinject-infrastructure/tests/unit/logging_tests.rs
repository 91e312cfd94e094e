//! Unit tests for logging helpers

use dbinject_infrastructure::config::LoggingConfig;
use dbinject_infrastructure::logging::parse_log_level;
use tracing::Level;

#[test]
fn test_parse_log_level_accepts_known_levels() {
    assert_eq!(parse_log_level("trace").expect("trace"), Level::TRACE);
    assert_eq!(parse_log_level("DEBUG").expect("debug"), Level::DEBUG);
    assert_eq!(parse_log_level("info").expect("info"), Level::INFO);
    assert_eq!(parse_log_level("warning").expect("warning"), Level::WARN);
    assert_eq!(parse_log_level("error").expect("error"), Level::ERROR);
}

#[test]
fn test_parse_log_level_rejects_unknown() {
    let err = parse_log_level("verbose").expect_err("unknown level");
    assert!(err.to_string().contains("Invalid log level"));
}

#[test]
fn test_logging_defaults() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert!(!config.json_format);
    assert!(config.file_output.is_none());
}
