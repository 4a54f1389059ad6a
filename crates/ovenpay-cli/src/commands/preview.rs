//! `ovenpay preview` command implementation.

use std::path::PathBuf;

use anyhow::Result;

use ovenpay_adapters::{CycleDataSource, FileCycleSource};
use ovenpay_core::{resolve_cycle, TezAmount};

pub fn run(config: PathBuf, cycle: u64, data_dir: PathBuf) -> Result<()> {
    let config = super::load_config(&config)?;
    let source = FileCycleSource::new(data_dir);
    let data = source.cycle_data(&config.baking_address, cycle)?;
    let report = resolve_cycle(&config, data)?;

    println!("Cycle {cycle}");
    println!(
        "Baker reward: {} tez",
        TezAmount::from_mutez(report.baker_reward)
    );
    println!();
    println!("{:<36}  {:<36}  {:>16}", "delegator", "recipient", "amount (tez)");
    for payment in &report.payments {
        println!(
            "{:<36}  {:<36}  {:>16}",
            payment.delegator,
            payment.recipient,
            TezAmount::from_mutez(payment.amount).to_string()
        );
    }
    if !report.excluded_delegators.is_empty() {
        println!();
        println!("Excluded delegators:");
        for excluded in &report.excluded_delegators {
            println!("  {}  {:?}", excluded.address, excluded.reason);
        }
    }

    Ok(())
}
