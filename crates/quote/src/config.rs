use serde::{Deserialize, Serialize};
use std::fs;

use elysium_types::{
    pubkey_serde, ElysiumError, ElysiumResult, Percentage, Pubkey, ELYSIUM_PROGRAM_ID,
};

/// Quoting configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuoteConfig {
    /// Elysium pool program ID, used to derive tick array addresses
    #[serde(with = "pubkey_serde")]
    pub program_id: Pubkey,

    /// Slippage tolerance applied when the caller does not give one
    pub default_slippage: Percentage,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Developer fee taken from the input of every quote
    #[serde(default)]
    pub dev_fee: Option<DevFeeConfig>,
}

/// Developer fee recipient and rate
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DevFeeConfig {
    /// Wallet the fee is paid to
    #[serde(with = "pubkey_serde")]
    pub wallet: Pubkey,

    /// Share of the input amount, strictly below 100%
    pub percentage: Percentage,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl QuoteConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> ElysiumResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ElysiumError::ConfigIo(format!("Failed to read config file {}: {}", path, e))
        })?;

        let config = Self::from_toml(&content).map_err(|e| match e {
            ElysiumError::ConfigParse(reason) => ElysiumError::ConfigParse(format!(
                "Failed to parse config file {}: {}",
                path, reason
            )),
            other => other,
        })?;

        tracing::debug!(path, program_id = %config.program_id, "loaded quote config");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> ElysiumResult<Self> {
        let config: QuoteConfig =
            toml::from_str(content).map_err(|e| ElysiumError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> ElysiumResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ElysiumError::ConfigParse(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            ElysiumError::ConfigIo(format!("Failed to write config file {}: {}", path, e))
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ElysiumResult<()> {
        if self.default_slippage.denominator == 0 {
            return Err(ElysiumError::invalid_config(
                "default_slippage",
                &self.default_slippage.to_string(),
                "a non-zero denominator",
            ));
        }

        if self.log_filter.trim().is_empty() {
            return Err(ElysiumError::invalid_config(
                "log_filter",
                "empty",
                "a tracing filter such as \"info\"",
            ));
        }

        if let Some(dev_fee) = &self.dev_fee {
            dev_fee.validate()?;
        }

        Ok(())
    }
}

impl DevFeeConfig {
    fn validate(&self) -> ElysiumResult<()> {
        if !self.percentage.is_below_one() {
            return Err(ElysiumError::invalid_config(
                "dev_fee.percentage",
                &self.percentage.to_string(),
                "less than 100% with a non-zero denominator",
            ));
        }

        if self.wallet == Pubkey::default() {
            return Err(ElysiumError::invalid_config(
                "dev_fee.wallet",
                &self.wallet.to_string(),
                "a non-default wallet address",
            ));
        }

        Ok(())
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            program_id: ELYSIUM_PROGRAM_ID,
            default_slippage: Percentage::from_bps(100), // 1%
            log_filter: default_log_filter(),
            dev_fee: None,
        }
    }
}
