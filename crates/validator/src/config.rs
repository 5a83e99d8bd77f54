use std::path::PathBuf;

use padron_core::report::DEFAULT_PREVIEW_LIMIT;
use padron_core::schema::RegistryConfig;

use crate::error::{AppError, AppResult};

/// Default similarity a question must reach to select a knowledge-base topic.
pub const DEFAULT_MATCH_CUTOFF: f64 = 0.6;

/// Validator configuration loaded from environment variables.
///
/// All fields have defaults matching the registry form currently in use.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Rule parameters handed to the schema registry.
    pub registry: RegistryConfig,
    /// Number of entries rendered in the text summary.
    pub preview_limit: usize,
    /// Minimum fuzzy similarity for a knowledge-base answer.
    pub match_cutoff: f64,
    /// Directory the export artifact is written to.
    pub output_dir: PathBuf,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            match_cutoff: DEFAULT_MATCH_CUTOFF,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default              |
    /// |------------------------|----------------------|
    /// | `PADRON_SEX_CODES`     | `H,M`                |
    /// | `PADRON_CURP_PATTERN`  | built-in CURP regex  |
    /// | `PADRON_RFC_PATTERN`   | built-in RFC regex   |
    /// | `PADRON_AGE_MIN`       | `0`                  |
    /// | `PADRON_AGE_MAX`       | `120`                |
    /// | `PADRON_PREVIEW_LIMIT` | `10`                 |
    /// | `PADRON_MATCH_CUTOFF`  | `0.6`                |
    /// | `PADRON_OUTPUT_DIR`    | `.`                  |
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut registry = defaults.registry;

        if let Some(raw) = lookup("PADRON_SEX_CODES") {
            registry.sex_codes = raw
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if registry.sex_codes.is_empty() {
                return Err(AppError::Config(
                    "PADRON_SEX_CODES must list at least one code".into(),
                ));
            }
        }
        if let Some(pattern) = lookup("PADRON_CURP_PATTERN") {
            registry.curp_pattern = pattern;
        }
        if let Some(pattern) = lookup("PADRON_RFC_PATTERN") {
            registry.rfc_pattern = pattern;
        }
        registry.age_min = parse_var(&lookup, "PADRON_AGE_MIN", registry.age_min)?;
        registry.age_max = parse_var(&lookup, "PADRON_AGE_MAX", registry.age_max)?;

        let preview_limit = parse_var(&lookup, "PADRON_PREVIEW_LIMIT", defaults.preview_limit)?;

        let match_cutoff: f64 = parse_var(&lookup, "PADRON_MATCH_CUTOFF", defaults.match_cutoff)?;
        if !(0.0..=1.0).contains(&match_cutoff) {
            return Err(AppError::Config(format!(
                "PADRON_MATCH_CUTOFF must be between 0.0 and 1.0, got {match_cutoff}"
            )));
        }

        let output_dir = lookup("PADRON_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        Ok(Self {
            registry,
            preview_limit,
            match_cutoff,
            output_dir,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw:?}"))),
    }
}
