//! Submitter configuration
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::error::{SubmitError, SubmitResult};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Configuration for the transaction submitter and its node client.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitterConfig {
    /// Safety margin applied on top of the gas estimate, as a fraction
    /// (0.1 = 10%).
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Timeout for the submission RPC call, in milliseconds.
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,
    /// How gas is priced on the target chain.
    #[serde(default)]
    pub gas_price_strategy: GasPriceStrategy,
    /// Upper bound on the max fee when pricing EIP-1559 transactions.
    #[serde(default = "default_max_gas_price_gwei")]
    pub max_gas_price_gwei: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GasPriceStrategy {
    Legacy,
    #[default]
    Eip1559,
}

fn default_margin() -> f64 {
    0.1
}

fn default_submit_timeout_ms() -> u64 {
    30_000
}

fn default_max_gas_price_gwei() -> u64 {
    500
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            submit_timeout_ms: default_submit_timeout_ms(),
            gas_price_strategy: GasPriceStrategy::default(),
            max_gas_price_gwei: default_max_gas_price_gwei(),
        }
    }
}

impl SubmitterConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // Substitute environment variables
        let config_str = substitute_env_vars(&config_str);

        let config: SubmitterConfig =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration.
    ///
    /// Runs before any remote interaction; a malformed margin never reaches
    /// the estimator.
    pub fn validate(&self) -> SubmitResult<()> {
        if !self.margin.is_finite() {
            return Err(SubmitError::InvalidConfiguration(format!(
                "margin must be a finite number, got {}",
                self.margin
            )));
        }
        if self.margin < 0.0 {
            return Err(SubmitError::InvalidConfiguration(format!(
                "margin must be non-negative, got {}",
                self.margin
            )));
        }
        if self.submit_timeout_ms == 0 {
            return Err(SubmitError::InvalidConfiguration(
                "submit_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();
    let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_substitution() {
        env::set_var("TXPAD_TEST_VAR", "test_value");
        let input = "url = \"https://api.example.com/${TXPAD_TEST_VAR}/endpoint\"";
        let result = substitute_env_vars(input);
        assert_eq!(result, "url = \"https://api.example.com/test_value/endpoint\"");
    }

    #[test]
    fn test_defaults() {
        let config: SubmitterConfig = toml::from_str("").unwrap();
        assert_eq!(config.margin, 0.1);
        assert_eq!(config.submit_timeout_ms, 30_000);
        assert_eq!(config.gas_price_strategy, GasPriceStrategy::Eip1559);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_margin_rejected() {
        let config = SubmitterConfig {
            margin: -0.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SubmitError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_strategy_parses_lowercase() {
        let config: SubmitterConfig =
            toml::from_str("gas_price_strategy = \"legacy\"").unwrap();
        assert_eq!(config.gas_price_strategy, GasPriceStrategy::Legacy);
    }
}
