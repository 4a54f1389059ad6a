//! Report sinks.
//!
//! The engine's only obligation is a complete, internally consistent
//! [`CycleReport`]; persisting it is a sink concern. [`DirReportSink`]
//! writes one JSON record per cycle, split into success and failed
//! directories so operators can re-drive failed cycles.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use ovenpay_core::{CycleReport, PayoutError, Result};

/// Destination for finalized cycle outcomes.
pub trait ReportSink {
    /// Persist a fully resolved report.
    fn record_success(&self, report: &CycleReport) -> Result<()>;

    /// Persist the failure of a cycle's resolution.
    fn record_failure(&self, cycle: u64, error: &PayoutError) -> Result<()>;
}

/// Failure record written for cycles whose resolution aborted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedCycleRecord {
    pub cycle: u64,
    pub error: String,
}

/// Directory layout under the base:
/// `payments/success/<cycle>.json` and `payments/failed/<cycle>.json`.
pub struct DirReportSink {
    base_dir: PathBuf,
}

impl DirReportSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn success_dir(&self) -> PathBuf {
        self.base_dir.join("payments").join("success")
    }

    fn failed_dir(&self) -> PathBuf {
        self.base_dir.join("payments").join("failed")
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| PayoutError::Io(format!("no parent directory for {}", path.display())))?;
        fs::create_dir_all(parent)
            .map_err(|e| PayoutError::Io(format!("failed to create {}: {e}", parent.display())))?;
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| PayoutError::Io(format!("failed to serialize report: {e}")))?;
        fs::write(path, bytes)
            .map_err(|e| PayoutError::Io(format!("failed to write {}: {e}", path.display())))
    }
}

impl ReportSink for DirReportSink {
    fn record_success(&self, report: &CycleReport) -> Result<()> {
        let path = self.success_dir().join(format!("{}.json", report.cycle));
        Self::write_json(&path, report)?;
        info!(cycle = report.cycle, path = %path.display(), "cycle report written");
        Ok(())
    }

    fn record_failure(&self, cycle: u64, error: &PayoutError) -> Result<()> {
        let record = FailedCycleRecord {
            cycle,
            error: error.to_string(),
        };
        let path = self.failed_dir().join(format!("{cycle}.json"));
        Self::write_json(&path, &record)?;
        info!(cycle, path = %path.display(), "cycle failure recorded");
        Ok(())
    }
}
