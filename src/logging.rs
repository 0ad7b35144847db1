//! Logging System
//!
//! Structured logging through `tracing`. The subscriber is assembled from a
//! [`LoggingConfig`], with `TAGSYNC_LOG*` environment variables taking precedence over the
//! configured values.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "TAGSYNC_LOG";
const ENV_FORMAT: &str = "TAGSYNC_LOG_FORMAT";
const ENV_OUTPUT: &str = "TAGSYNC_LOG_OUTPUT";
const ENV_FILE: &str = "TAGSYNC_LOG_FILE";
const ENV_MODULES: &str = "TAGSYNC_LOG_MODULES";

/// Logging configuration (`[logging]` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error or off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// json or text
    #[serde(default = "default_format")]
    pub format: String,

    /// stdout, stderr, file, file+stderr or both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file when output includes a file; unset means the platform state directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// ANSI colors for text output on a terminal stream
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module level overrides, e.g. `tagsync::merge = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Stdout,
    Stderr,
    File,
    FileAndStderr,
    StdoutAndStderr,
}

impl Destination {
    fn includes_file(self) -> bool {
        matches!(self, Destination::File | Destination::FileAndStderr)
    }
}

impl FromStr for Destination {
    type Err = ApiError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "stdout" => Ok(Destination::Stdout),
            "stderr" => Ok(Destination::Stderr),
            "file" => Ok(Destination::File),
            "file+stderr" => Ok(Destination::FileAndStderr),
            "both" => Ok(Destination::StdoutAndStderr),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                other
            ))),
        }
    }
}

/// Log file path, first non-empty of: CLI flag, `TAGSYNC_LOG_FILE`, config, platform default.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, ApiError> {
    let from_env = std::env::var(ENV_FILE).ok().map(PathBuf::from);
    [cli_file, from_env, config_file]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty())
        .map(Ok)
        .unwrap_or_else(default_log_file_path)
}

fn default_log_file_path() -> Result<PathBuf, ApiError> {
    let dirs = directories::ProjectDirs::from("", "", "tagsync").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories for log file".to_string())
    })?;
    let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
    Ok(dir.join("tagsync.log"))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = env_filter(config)?;
    let json = match std::env::var(ENV_FORMAT) {
        Ok(format) if format == "json" || format == "text" => format == "json",
        _ => match config.format.as_str() {
            "json" => true,
            "text" => false,
            other => {
                return Err(ApiError::ConfigError(format!(
                    "Invalid log format: {} (must be 'json' or 'text')",
                    other
                )))
            }
        },
    };
    let destination: Destination = match std::env::var(ENV_OUTPUT) {
        Ok(raw) => raw.parse()?,
        Err(_) => config.output.parse()?,
    };
    let ansi = config.color && !destination.includes_file();
    let writer = make_writer(destination, config)?;

    let registry = Registry::default().with(filter);
    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
    };
    installed.map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}

fn make_writer(
    destination: Destination,
    config: &LoggingConfig,
) -> Result<BoxMakeWriter, ApiError> {
    let writer = match destination {
        Destination::Stdout => BoxMakeWriter::new(std::io::stdout),
        Destination::Stderr => BoxMakeWriter::new(std::io::stderr),
        Destination::StdoutAndStderr => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        Destination::File | Destination::FileAndStderr => {
            let path = resolve_log_file_path(None, config.file.clone())?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ApiError::ConfigError(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    ApiError::ConfigError(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            if destination == Destination::FileAndStderr {
                BoxMakeWriter::new(Mutex::new(file).and(std::io::stderr))
            } else {
                BoxMakeWriter::new(Mutex::new(file))
            }
        }
    };
    Ok(writer)
}

/// `TAGSYNC_LOG` wins outright; otherwise the configured level plus module overrides from
/// the config and `TAGSYNC_LOG_MODULES` (`module=level,...`).
fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let from_env = std::env::var(ENV_MODULES).unwrap_or_default();
    let env_pairs = from_env
        .split(',')
        .filter_map(|spec| spec.split_once('='))
        .map(|(module, level)| (module.trim().to_string(), level.trim().to_string()));
    let config_pairs = config.modules.iter().map(|(m, l)| (m.clone(), l.clone()));

    let mut filter = EnvFilter::new(&config.level);
    for (module, level) in config_pairs.chain(env_pairs) {
        let directive = format!("{}={}", module, level).parse::<Directive>().map_err(|e| {
            ApiError::ConfigError(format!("Invalid log directive '{}={}': {}", module, level, e))
        })?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}
