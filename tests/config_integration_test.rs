//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX so they don't
//! interfere with each other.

use fauna::config::{load_config, load_config_or_default, FaunaConfig};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("FAUNA_APPLICATION_LOG_LEVEL");
    std::env::remove_var("FAUNA_APPLICATION_DRY_RUN");
    std::env::remove_var("FAUNA_SOURCE_BASE_URL");
    std::env::remove_var("FAUNA_SOURCE_PER_PAGE");
    std::env::remove_var("FAUNA_RETRY_MAX_ATTEMPTS");
    std::env::remove_var("FAUNA_RETRY_JITTER");
    std::env::remove_var("FAUNA_LOAD_BATCH_SIZE");
    std::env::remove_var("FAUNA_LOAD_MIN_SUCCESS_RATIO");
    std::env::remove_var("TEST_ANIMALS_HOST");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[source]
base_url = "https://animals.example.com"
per_page = 25
timeout_seconds = 15
connect_timeout_seconds = 3
detail_concurrency = 8

[retry]
max_attempts = 7
base_delay_secs = 0.25
max_delay_secs = 30.0
backoff_factor = 3.0
jitter = false
retry_statuses = [500, 503]

[load]
batch_size = 40
load_concurrency = 2
min_success_ratio = 0.9

[logging]
local_enabled = true
local_path = "/tmp/fauna"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);

    assert_eq!(config.source.base_url, "https://animals.example.com");
    assert_eq!(config.source.per_page, Some(25));
    assert_eq!(config.source.timeout_seconds, 15);
    assert_eq!(config.source.connect_timeout_seconds, 3);
    assert_eq!(config.source.detail_concurrency, 8);

    assert_eq!(config.retry.max_attempts, 7);
    assert_eq!(config.retry.base_delay_secs, 0.25);
    assert_eq!(config.retry.max_delay_secs, 30.0);
    assert_eq!(config.retry.backoff_factor, 3.0);
    assert!(!config.retry.jitter);
    assert_eq!(config.retry.retry_statuses, vec![500, 503]);

    assert_eq!(config.load.batch_size, 40);
    assert_eq!(config.load.load_concurrency, 2);
    assert_eq!(config.load.min_success_ratio, 0.9);

    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/tmp/fauna");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config("[source]\nbase_url = \"http://127.0.0.1:3123\"\n");
    let config = load_config(temp_file.path()).unwrap();

    let defaults = FaunaConfig::default();
    assert_eq!(config.source.base_url, "http://127.0.0.1:3123");
    assert_eq!(config.retry, defaults.retry);
    assert_eq!(config.load, defaults.load);
    assert_eq!(config.load.batch_size, 100);
    assert_eq!(config.retry.max_attempts, 5);
    assert!(config.retry.jitter);
    assert!(!config.application.dry_run);
}

#[test]
fn test_empty_file_is_the_default_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config("");
    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config, FaunaConfig::default());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_ANIMALS_HOST", "animals.internal");

    let temp_file = write_config(
        r#"
# base_url = "${SOME_UNSET_VARIABLE}"
[source]
base_url = "http://${TEST_ANIMALS_HOST}:3123"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.source.base_url, "http://animals.internal:3123");

    cleanup_env_vars();
}

#[test]
fn test_env_var_substitution_missing_variable() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config("[source]\nbase_url = \"http://${TEST_ANIMALS_HOST}\"\n");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_ANIMALS_HOST"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[source]
base_url = "http://localhost:3123"

[load]
batch_size = 100
"#,
    );

    std::env::set_var("FAUNA_APPLICATION_LOG_LEVEL", "debug");
    std::env::set_var("FAUNA_APPLICATION_DRY_RUN", "true");
    std::env::set_var("FAUNA_SOURCE_BASE_URL", "http://override:9000");
    std::env::set_var("FAUNA_SOURCE_PER_PAGE", "10");
    std::env::set_var("FAUNA_RETRY_MAX_ATTEMPTS", "3");
    std::env::set_var("FAUNA_RETRY_JITTER", "false");
    std::env::set_var("FAUNA_LOAD_BATCH_SIZE", "25");

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.source.base_url, "http://override:9000");
    assert_eq!(config.source.per_page, Some(10));
    assert_eq!(config.retry.max_attempts, 3);
    assert!(!config.retry.jitter);
    assert_eq!(config.load.batch_size, 25);

    cleanup_env_vars();
}

#[test]
fn test_env_override_with_unparseable_value() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("FAUNA_LOAD_BATCH_SIZE", "lots");

    let temp_file = write_config("");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("FAUNA_LOAD_BATCH_SIZE"));

    cleanup_env_vars();
}

#[test]
fn test_env_override_is_validated() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("FAUNA_LOAD_MIN_SUCCESS_RATIO", "1.5");

    let temp_file = write_config("");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("min_success_ratio"));

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        ("[application]\nlog_level = \"verbose\"\n", "log_level"),
        ("[source]\nbase_url = \"ftp://animals\"\n", "base_url"),
        ("[source]\nper_page = 0\n", "per_page"),
        ("[retry]\nmax_attempts = 0\n", "max_attempts"),
        ("[retry]\nbackoff_factor = 0.5\n", "backoff_factor"),
        ("[retry]\nbase_delay_secs = 10.0\nmax_delay_secs = 1.0\n", "max_delay_secs"),
        ("[retry]\nretry_statuses = [404]\n", "retry_statuses"),
        ("[load]\nbatch_size = 101\n", "batch_size"),
        ("[load]\nload_concurrency = 0\n", "load_concurrency"),
        ("[logging]\nlocal_rotation = \"weekly\"\n", "local_rotation"),
    ];

    for (contents, field) in cases {
        let temp_file = write_config(contents);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains(field),
            "expected error mentioning {field}, got: {err}"
        );
    }
}

#[test]
fn test_malformed_toml_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config("[source\nbase_url = ");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
fn test_missing_default_file_uses_defaults_and_env() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("FAUNA_SOURCE_BASE_URL", "http://from-env:3123");

    let dir = tempfile::tempdir().unwrap();
    let config = load_config_or_default(dir.path().join("fauna.toml")).unwrap();

    assert_eq!(config.source.base_url, "http://from-env:3123");
    assert_eq!(config.load, FaunaConfig::default().load);

    cleanup_env_vars();
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let err = load_config(dir.path().join("missing.toml")).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
