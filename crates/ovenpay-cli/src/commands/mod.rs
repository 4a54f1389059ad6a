//! CLI command implementations.

pub mod init;
pub mod pay;
pub mod preview;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use ovenpay_core::PayoutConfig;

/// Load and validate a payout configuration file.
pub fn load_config(path: &Path) -> Result<PayoutConfig> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: PayoutConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("malformed config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
