//! Environment-driven configuration.
//!
//! Every setting has a default; invalid values are logged and ignored.

use std::path::PathBuf;

use crate::application::ChartSettings;

pub const DATASET_PATH_ENV: &str = "GLUCODASH_DATASET_PATH";
pub const MODEL_PATH_ENV: &str = "GLUCODASH_MODEL_PATH";
pub const REQUIRE_MODEL_MANIFEST_ENV: &str = "GLUCODASH_REQUIRE_MODEL_MANIFEST";
pub const HEAD_ROWS_ENV: &str = "GLUCODASH_HEAD_ROWS";
pub const HISTOGRAM_BINS_ENV: &str = "GLUCODASH_HISTOGRAM_BINS";
pub const KDE_POINTS_ENV: &str = "GLUCODASH_KDE_POINTS";
pub const LOG_MODE_ENV: &str = "GLUCODASH_LOG_MODE";
pub const LOG_FILE_ENV: &str = "GLUCODASH_LOG_FILE";

const DEFAULT_DATASET_PATH: &str = "data/diabetes.csv";
const DEFAULT_MODEL_PATH: &str = "models/model.json";
const DEFAULT_LOG_FILE: &str = "glucodash.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "file" => Some(Self::File),
            "stdout" => Some(Self::Stdout),
            _ => None,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(&self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub require_model_manifest: bool,
    pub charts: ChartSettings,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            require_model_manifest: false,
            charts: ChartSettings::default(),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let path = |name: &str, default: PathBuf| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map_or(default, PathBuf::from)
        };

        let count = |name: &str, default: usize| match lookup(name) {
            None => default,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
                    default
                }
            },
        };

        let log_mode = match lookup(LOG_MODE_ENV) {
            None => defaults.log_mode,
            Some(raw) => LogMode::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring invalid {}={:?}, using auto", LOG_MODE_ENV, raw);
                LogMode::Auto
            }),
        };

        Self {
            dataset_path: path(DATASET_PATH_ENV, defaults.dataset_path),
            model_path: path(MODEL_PATH_ENV, defaults.model_path),
            require_model_manifest: lookup(REQUIRE_MODEL_MANIFEST_ENV)
                .is_some_and(|v| parse_bool(&v)),
            charts: ChartSettings {
                head_rows: count(HEAD_ROWS_ENV, defaults.charts.head_rows),
                bins: count(HISTOGRAM_BINS_ENV, defaults.charts.bins),
                kde_points: count(KDE_POINTS_ENV, defaults.charts.kde_points),
            },
            log_mode,
            log_file: path(LOG_FILE_ENV, defaults.log_file),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}
