//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::FaunaConfig;
use crate::domain::errors::FaunaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into FaunaConfig
/// 4. Applies environment variable overrides (FAUNA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is unset, TOML parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use fauna::config::loader::load_config;
///
/// let config = load_config("fauna.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FaunaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FaunaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        FaunaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: FaunaConfig = toml::from_str(&contents)
        .map_err(|e| FaunaError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        FaunaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads configuration from a TOML file, or from defaults when the file is absent
///
/// Environment overrides and validation apply in both cases, so a `.env`
/// file alone is enough to run against a non-default service.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<FaunaConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults and environment overrides"
    );

    let mut config = FaunaConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate().map_err(|e| {
        FaunaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comment lines are copied verbatim
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(FaunaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Reads and parses an override variable, naming it in the error on failure
fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(val) => val.trim().parse::<T>().map(Some).map_err(|e| {
            FaunaError::Configuration(format!("Invalid value '{val}' for {name}: {e}"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using FAUNA_* prefix
///
/// Environment variables follow the pattern: FAUNA_<SECTION>_<KEY>
/// For example: FAUNA_SOURCE_BASE_URL, FAUNA_LOAD_BATCH_SIZE
fn apply_env_overrides(config: &mut FaunaConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("FAUNA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = parse_env("FAUNA_APPLICATION_DRY_RUN")? {
        config.application.dry_run = val;
    }

    // Source overrides
    if let Ok(val) = std::env::var("FAUNA_SOURCE_BASE_URL") {
        config.source.base_url = val;
    }
    if let Some(val) = parse_env("FAUNA_SOURCE_PER_PAGE")? {
        config.source.per_page = Some(val);
    }
    if let Some(val) = parse_env("FAUNA_SOURCE_TIMEOUT_SECONDS")? {
        config.source.timeout_seconds = val;
    }
    if let Some(val) = parse_env("FAUNA_SOURCE_DETAIL_CONCURRENCY")? {
        config.source.detail_concurrency = val;
    }

    // Retry overrides
    if let Some(val) = parse_env("FAUNA_RETRY_MAX_ATTEMPTS")? {
        config.retry.max_attempts = val;
    }
    if let Some(val) = parse_env("FAUNA_RETRY_BASE_DELAY_SECS")? {
        config.retry.base_delay_secs = val;
    }
    if let Some(val) = parse_env("FAUNA_RETRY_MAX_DELAY_SECS")? {
        config.retry.max_delay_secs = val;
    }
    if let Some(val) = parse_env("FAUNA_RETRY_BACKOFF_FACTOR")? {
        config.retry.backoff_factor = val;
    }
    if let Some(val) = parse_env("FAUNA_RETRY_JITTER")? {
        config.retry.jitter = val;
    }

    // Load overrides
    if let Some(val) = parse_env("FAUNA_LOAD_BATCH_SIZE")? {
        config.load.batch_size = val;
    }
    if let Some(val) = parse_env("FAUNA_LOAD_CONCURRENCY")? {
        config.load.load_concurrency = val;
    }
    if let Some(val) = parse_env("FAUNA_LOAD_MIN_SUCCESS_RATIO")? {
        config.load.min_success_ratio = val;
    }

    // Logging overrides
    if let Some(val) = parse_env("FAUNA_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("FAUNA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
