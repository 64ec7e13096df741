//! CLI configuration loaded from environment variables.
//!
//! Unset variables fall back to the stock form values. A variable set to an
//! empty string clears that input, which then fails validation the same way a
//! blank form field does.

use std::path::PathBuf;

use anyhow::{Context, Result};
use depletion_core::constants::DEFAULT_SCHEDULE_PATH;
use depletion_core::validation::EstimateRequest;

#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the rewards schedule table.
    pub schedule_path: PathBuf,
    /// Estimate inputs used when no flag overrides them.
    pub request: EstimateRequest,
    /// Log level filter string (e.g. "info", "depletion_engine=debug").
    pub log_level: String,
    /// Log output format ("text" or "json").
    pub log_format: String,
}

impl Config {
    /// Load configuration from `DEPLETION_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EstimateRequest::with_defaults();

        let schedule_path = lookup("DEPLETION_SCHEDULE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEDULE_PATH));

        let number = |key: &str, default: Option<f64>| -> Result<Option<f64>> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .with_context(|| format!("{key} must be a number, got {raw:?}")),
            }
        };

        let request = EstimateRequest {
            cap_percent: number("DEPLETION_CAP_PERCENT", defaults.cap_percent)?,
            common_pool_tokens: number("DEPLETION_COMMON_POOL", defaults.common_pool_tokens)?,
            staked_tokens: number("DEPLETION_STAKED_TOKENS", defaults.staked_tokens)?,
            token_price: number("DEPLETION_TOKEN_PRICE", defaults.token_price)?,
            validator_stake: number("DEPLETION_VALIDATOR_STAKE", defaults.validator_stake)?,
            commission_percent: number("DEPLETION_COMMISSION_PERCENT", defaults.commission_percent)?,
        };

        let log_level = lookup("DEPLETION_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_format = lookup("DEPLETION_LOG_FORMAT").unwrap_or_else(|| "text".to_string());

        Ok(Config {
            schedule_path,
            request,
            log_level,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.schedule_path, PathBuf::from(DEFAULT_SCHEDULE_PATH));
        assert_eq!(cfg.request, EstimateRequest::with_defaults());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_format, "text");
    }

    #[test]
    fn variables_override_defaults() {
        let cfg = load(&[
            ("DEPLETION_SCHEDULE_PATH", "/data/rewards.csv"),
            ("DEPLETION_CAP_PERCENT", "3.5"),
            ("DEPLETION_STAKED_TOKENS", " 1000 "),
            ("DEPLETION_LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(cfg.schedule_path, PathBuf::from("/data/rewards.csv"));
        assert_eq!(cfg.request.cap_percent, Some(3.5));
        assert_eq!(cfg.request.staked_tokens, Some(1000.0));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn blank_variable_clears_input() {
        let cfg = load(&[("DEPLETION_TOKEN_PRICE", "")]).unwrap();
        assert_eq!(cfg.request.token_price, None);
        assert!(cfg.request.validate().is_err());
    }

    #[test]
    fn malformed_number_is_error() {
        let err = load(&[("DEPLETION_COMMON_POOL", "lots")]).unwrap_err();
        assert!(err.to_string().contains("DEPLETION_COMMON_POOL"));
    }

    #[test]
    fn config_is_clone_and_debug() {
        let cfg = load(&[]).unwrap();
        let debug = format!("{:?}", cfg.clone());
        assert!(debug.contains("Config"));
    }
}
