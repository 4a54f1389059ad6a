//! Cycle data sources.
//!
//! A [`CycleDataSource`] hands the engine one cycle's validated, final
//! input. Retrieval concerns (RPC retries, backoff, caching) belong behind
//! this trait; by the time a `CycleData` crosses it, amounts are exact
//! unsigned mutez and the share list is consistent.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ovenpay_core::{engine, Address, CycleData, DelegatorShare, Mutez, PayoutError, Result};

/// Provider of per-cycle reward and share data.
pub trait CycleDataSource {
    /// Data for one cycle of the given baker. Implementations must return
    /// fully validated data; the engine treats it as ground truth.
    fn cycle_data(&self, baker: &Address, cycle: u64) -> Result<CycleData>;
}

// =============================================================================
// StaticCycleSource
// =============================================================================

/// A source backed by fixed in-memory data.
///
/// Useful for tests, simulation and replaying known snapshots.
#[derive(Default)]
pub struct StaticCycleSource {
    cycles: HashMap<u64, CycleData>,
}

impl StaticCycleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, data: CycleData) {
        self.cycles.insert(data.cycle, data);
    }
}

impl CycleDataSource for StaticCycleSource {
    fn cycle_data(&self, _baker: &Address, cycle: u64) -> Result<CycleData> {
        self.cycles
            .get(&cycle)
            .cloned()
            .ok_or_else(|| PayoutError::Data(format!("no data for cycle {cycle}")))
    }
}

// =============================================================================
// FileCycleSource
// =============================================================================

/// Raw on-disk shape of a delegator share. Amounts are decimal strings of
/// mutez, the way indexers commonly export them; parsing rejects negatives
/// and non-numerics as data errors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawDelegatorShare {
    pub address: String,
    pub stake_balance: String,
    pub staking_balance: String,
}

/// Raw on-disk shape of one cycle snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawCycleData {
    pub cycle_rewards: String,
    pub baker_balance: String,
    pub staking_balance: String,
    pub cycle_shares: Vec<RawDelegatorShare>,
}

impl RawCycleData {
    /// Validate raw amounts into engine input for `cycle`.
    pub fn into_cycle_data(self, cycle: u64) -> Result<CycleData> {
        let mut cycle_shares = Vec::with_capacity(self.cycle_shares.len());
        for raw in self.cycle_shares {
            cycle_shares.push(DelegatorShare {
                address: Address::parse(raw.address)
                    .map_err(|e| PayoutError::Data(e.to_string()))?,
                stake_balance: parse_mutez(&raw.stake_balance)?,
                staking_balance: parse_mutez(&raw.staking_balance)?,
            });
        }
        let data = CycleData {
            cycle,
            cycle_rewards: parse_mutez(&self.cycle_rewards)?,
            baker_balance: parse_mutez(&self.baker_balance)?,
            staking_balance: parse_mutez(&self.staking_balance)?,
            cycle_shares,
        };
        engine::validate_cycle_data(&data)?;
        Ok(data)
    }
}

/// Parse a decimal mutez string. Signs, fractions and anything non-numeric
/// are data errors; on-chain amounts are exact unsigned integers.
fn parse_mutez(s: &str) -> Result<Mutez> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PayoutError::Data(format!("invalid mutez amount: {s:?}")));
    }
    s.parse::<Mutez>()
        .map_err(|_| PayoutError::Data(format!("mutez amount out of range: {s:?}")))
}

/// A source reading per-cycle JSON snapshot files, `<base>/<cycle>.json`.
pub struct FileCycleSource {
    base_dir: PathBuf,
}

impl FileCycleSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, cycle: u64) -> PathBuf {
        self.base_dir.join(format!("{cycle}.json"))
    }
}

impl CycleDataSource for FileCycleSource {
    fn cycle_data(&self, _baker: &Address, cycle: u64) -> Result<CycleData> {
        let path = self.path_for(cycle);
        debug!(cycle, path = %path.display(), "loading cycle snapshot");
        let bytes = fs::read(&path).map_err(|e| {
            PayoutError::Io(format!("failed to read {}: {e}", path.display()))
        })?;
        let raw: RawCycleData = serde_json::from_slice(&bytes).map_err(|e| {
            PayoutError::Data(format!("malformed snapshot {}: {e}", path.display()))
        })?;
        raw.into_cycle_data(cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAKER: &str = "tz1VSUr8wwNhLAzempochtzDNoKa2PYdcy4w";
    const DELEGATOR: &str = "tz2BFTyPeYRzxd5aiBchbXN3WCZhx7BqbMBq";

    fn baker() -> Address {
        Address::parse(BAKER).unwrap()
    }

    fn raw_snapshot() -> RawCycleData {
        RawCycleData {
            cycle_rewards: "1480000000".into(),
            baker_balance: "12000000000".into(),
            staking_balance: "112000000000".into(),
            cycle_shares: vec![RawDelegatorShare {
                address: DELEGATOR.into(),
                stake_balance: "0".into(),
                staking_balance: "100000000000".into(),
            }],
        }
    }

    #[test]
    fn static_source_returns_inserted_cycles() {
        let data = raw_snapshot().into_cycle_data(470).unwrap();
        let mut source = StaticCycleSource::new();
        source.insert(data.clone());

        assert_eq!(source.cycle_data(&baker(), 470).unwrap(), data);
        assert!(matches!(
            source.cycle_data(&baker(), 471),
            Err(PayoutError::Data(_))
        ));
    }

    #[test]
    fn raw_data_validates_amounts() {
        let mut raw = raw_snapshot();
        raw.cycle_rewards = "-5".into();
        assert!(matches!(
            raw.into_cycle_data(470),
            Err(PayoutError::Data(_))
        ));

        let mut raw = raw_snapshot();
        raw.cycle_shares[0].staking_balance = "1.5".into();
        assert!(matches!(
            raw.into_cycle_data(470),
            Err(PayoutError::Data(_))
        ));

        let mut raw = raw_snapshot();
        raw.cycle_shares[0].address = "bogus".into();
        assert!(matches!(
            raw.into_cycle_data(470),
            Err(PayoutError::Data(_))
        ));
    }

    #[test]
    fn raw_data_rejects_inconsistent_snapshot() {
        // Delegated weight above the staking balance snapshot.
        let mut raw = raw_snapshot();
        raw.staking_balance = "50000000000".into();
        assert!(matches!(
            raw.into_cycle_data(470),
            Err(PayoutError::Data(_))
        ));
    }

    #[test]
    fn file_source_round_trips_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let raw = raw_snapshot();
        fs::write(
            dir.path().join("470.json"),
            serde_json::to_vec_pretty(&raw).unwrap(),
        )
        .unwrap();

        let source = FileCycleSource::new(dir.path());
        let data = source.cycle_data(&baker(), 470).unwrap();
        assert_eq!(data.cycle, 470);
        assert_eq!(data.cycle_rewards, 1_480_000_000);
        assert_eq!(data.cycle_shares.len(), 1);
    }

    #[test]
    fn file_source_surfaces_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileCycleSource::new(dir.path());
        assert!(matches!(
            source.cycle_data(&baker(), 470),
            Err(PayoutError::Io(_))
        ));

        fs::write(dir.path().join("471.json"), b"not json").unwrap();
        assert!(matches!(
            source.cycle_data(&baker(), 471),
            Err(PayoutError::Data(_))
        ));
    }
}
