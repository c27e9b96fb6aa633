//! Configuration for the top-up flow.
//!
//! Every literal the flow depends on (credentials, wallet address, initial
//! balance, per-link ceiling, country catalog, timer intervals) lives here so
//! it can be overridden from a TOML file. The defaults reproduce the stock
//! deployment values.

use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The single accepted credential pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "rev.topup@outlook.com".to_string(),
            password: "revtop.china".to_string(),
        }
    }
}

/// Which crypto-settlement workflow the payment step routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementMode {
    /// Transaction-id entry with a simulated chain-lookup delay.
    #[default]
    Txid,
    /// Self-attested: a single "payment done" action, no verification.
    Attest,
}

/// Timer intervals, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between processing-simulator steps.
    pub step_interval_ms: u64,
    /// Simulated blockchain verification delay.
    pub verify_delay_ms: u64,
    /// How long the clipboard-copy acknowledgment stays up.
    pub copy_ack_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: 800,
            verify_delay_ms: 3000,
            copy_ack_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub credentials: Credentials,
    /// Receiving address displayed by the crypto-settlement step.
    pub wallet_address: String,
    /// Token balance the session starts with.
    pub initial_balance: Decimal,
    /// Per-link amount ceiling.
    pub max_link_amount: Decimal,
    /// Selectable countries.
    pub countries: Vec<String>,
    pub settlement: SettlementMode,
    pub timing: TimingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            wallet_address: "TXqHyR5GmASbEHKJcg5RmFd5oKgP6sVNRq".to_string(),
            initial_balance: dec!(153),
            max_link_amount: dec!(250),
            countries: [
                "United States",
                "United Kingdom",
                "Germany",
                "France",
                "Canada",
                "Australia",
                "India",
                "Brazil",
                "Japan",
                "Nigeria",
                "South Africa",
                "China",
                "Russia",
                "Mexico",
                "Italy",
                "Romania",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            settlement: SettlementMode::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads a configuration file, falling back to defaults for missing keys.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
