//! `ovenpay pay` command implementation.

use std::path::PathBuf;

use anyhow::Result;

use ovenpay_adapters::{CycleDataSource, DirReportSink, FileCycleSource, ReportSink};
use ovenpay_core::resolve_cycle;

pub fn run(config: PathBuf, cycle: u64, data_dir: PathBuf, reports_dir: PathBuf) -> Result<()> {
    let config = super::load_config(&config)?;
    let source = FileCycleSource::new(data_dir);
    let sink = DirReportSink::new(reports_dir);

    let outcome = source
        .cycle_data(&config.baking_address, cycle)
        .and_then(|data| resolve_cycle(&config, data));
    match outcome {
        Ok(report) => {
            sink.record_success(&report)?;
            println!(
                "✅ Cycle {cycle}: {} payments resolved, report recorded",
                report.payments.len()
            );
            Ok(())
        }
        Err(error) => {
            sink.record_failure(cycle, &error)?;
            println!("❌ Cycle {cycle} failed: {error}");
            Err(error.into())
        }
    }
}
