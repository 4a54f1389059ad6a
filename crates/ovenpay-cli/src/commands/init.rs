//! `ovenpay init` command implementation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use ovenpay_core::PayoutConfig;

pub fn run(output: PathBuf) -> Result<()> {
    println!("🔧 Initializing ovenpay configuration...");

    fs::create_dir_all(&output).context("Failed to create output directory")?;
    fs::create_dir_all(output.join("snapshots")).context("Failed to create snapshots directory")?;

    // Placeholder baker address; operators replace it with their own.
    let config = PayoutConfig::builder()
        .baking_address("tz1VSUr8wwNhLAzempochtzDNoKa2PYdcy4w")
        .default_fee("0.05")
        .minimum_payment_amount("0")
        .build()?;

    let config_path = output.join("config.json");
    if config_path.exists() {
        anyhow::bail!("{} already exists, refusing to overwrite", config_path.display());
    }
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json).context("Failed to write config file")?;

    println!("✅ Created configuration at {}", config_path.display());
    println!();
    println!("🚀 Next steps:");
    println!("   1. Set baking_address and default_fee in config.json");
    println!("   2. Drop cycle snapshots into snapshots/<cycle>.json");
    println!("   3. Preview a cycle:  ovenpay preview --cycle <n>");
    println!("   4. Record payouts:   ovenpay pay --cycle <n>");

    Ok(())
}
