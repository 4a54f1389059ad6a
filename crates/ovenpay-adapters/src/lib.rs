//! Boundary collaborators for the payout engine.
//!
//! The core pipeline never performs I/O; everything it consumes or produces
//! crosses one of the traits here.
//!
//! # Sources
//!
//! - [`StaticCycleSource`]: fixed in-memory cycle data (tests, simulation)
//! - [`FileCycleSource`]: per-cycle JSON snapshots on disk
//!
//! # Sinks
//!
//! - [`DirReportSink`]: per-cycle success/failure records as JSON files

pub mod reports;
pub mod sources;

pub use reports::{DirReportSink, FailedCycleRecord, ReportSink};
pub use sources::{CycleDataSource, FileCycleSource, RawCycleData, RawDelegatorShare, StaticCycleSource};
