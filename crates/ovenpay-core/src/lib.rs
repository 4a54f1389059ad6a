//! Per-cycle reward resolution for a baking operation.
//!
//! Given a cycle's total rewards and the set of delegator shares, the engine
//! derives exact mutez payment amounts through a fixed pipeline of pure
//! resolution steps: baker/delegator split, delegator exclusion, proportional
//! allocation, fee overrides, minimum-amount exclusion, and payment
//! redirection. See [`engine::resolve_cycle`] for the composition.
//!
//! All monetary arithmetic is exact integer mutez with checked operations;
//! native floats never touch money.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod address;
pub mod config;
pub mod engine;
pub mod fee;
pub mod math;
pub mod steps;

pub use address::Address;
pub use config::{OverdelegationPolicy, OverdelegationRule, PayoutConfig};
pub use engine::{resolve_cycle, ResolutionContext};
pub use fee::{Fee, TezAmount};
pub use math::MUTEZ_FACTOR;

/// Amount in mutez, the smallest indivisible unit (1 tez = 1_000_000 mutez).
pub type Mutez = u64;

/// One delegator's stake position at the cycle snapshot.
///
/// `staking_balance` is the delegator's full staking weight and is the value
/// proportional allocation uses; `stake_balance` is the frozen portion of it
/// and must never exceed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorShare {
    pub address: Address,
    pub stake_balance: Mutez,
    pub staking_balance: Mutez,
}

impl DelegatorShare {
    /// Stake weight used for proportional reward allocation.
    pub fn weight(&self) -> Mutez {
        self.staking_balance
    }
}

/// External input for one cycle, already validated and final.
///
/// Retrieval (RPC, snapshots) lives behind the adapter boundary; the engine
/// never performs I/O and treats this as ground truth for the cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleData {
    pub cycle: u64,
    /// Total distributable rewards earned by the baker this cycle.
    pub cycle_rewards: Mutez,
    /// Baker's own balance backing the delegated stake.
    pub baker_balance: Mutez,
    /// Total staking balance of the baker (own + delegated).
    pub staking_balance: Mutez,
    /// Delegator shares in snapshot order. Order is preserved through the
    /// whole pipeline.
    pub cycle_shares: Vec<DelegatorShare>,
}

/// One payment record per surviving delegator per cycle.
///
/// `recipient` defaults to the delegator and is only changed by redirect
/// resolution. A zero `amount` marks an excluded (inert) payment; the record
/// itself is never removed once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub delegator: Address,
    pub recipient: Address,
    pub amount: Mutez,
}

/// Why a delegator was removed from the payable candidate set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The baker's own address is never paid as a delegator.
    SelfDelegation,
    /// Zero stake weight; paying zero is meaningless.
    ZeroBalance,
    /// Removed by the overdelegation guard.
    Overdelegation,
}

/// A delegator excluded before payment records exist, with the reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedDelegator {
    pub address: Address,
    pub reason: ExclusionReason,
}

/// The accumulator threaded through the pipeline.
///
/// Created empty at pipeline start; each step returns an updated copy with
/// its fields replaced or refined, never mutated in place. After
/// `resolve_delegator_rewards` the set of delegator addresses in `payments`
/// is stable: later steps change amounts and recipients only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub baker_reward: Mutez,
    pub payments: Vec<Payment>,
    pub excluded_delegators: Vec<ExcludedDelegator>,
}

impl CycleReport {
    /// Empty report for a cycle, ready to thread through the pipeline.
    pub fn new(cycle: u64) -> Self {
        Self {
            cycle,
            baker_reward: 0,
            payments: Vec::new(),
            excluded_delegators: Vec::new(),
        }
    }
}

/// Errors surfaced by the resolution engine and its adapters.
#[derive(Error, Debug)]
pub enum PayoutError {
    /// Invalid configuration value. Aborts before the pipeline runs; never
    /// retried internally.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or missing cycle data from the external source. Aborts
    /// resolution for that cycle only.
    #[error("Cycle data error: {0}")]
    Data(String),

    /// Checked-arithmetic failure (overflow, underflow, division by zero).
    /// Unreachable on valid chain data.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Adapter-level I/O failure (snapshot reads, report writes).
    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, PayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cycle_report_is_empty() {
        let report = CycleReport::new(470);
        assert_eq!(report.cycle, 470);
        assert_eq!(report.baker_reward, 0);
        assert!(report.payments.is_empty());
        assert!(report.excluded_delegators.is_empty());
    }

    #[test]
    fn share_weight_is_staking_balance() {
        let share = DelegatorShare {
            address: Address::parse(format!("tz1{}", "a".repeat(33))).expect("address"),
            stake_balance: 100,
            staking_balance: 400,
        };
        assert_eq!(share.weight(), 400);
    }
}
