//! Pipeline composition.
//!
//! Execute one cycle's reward resolution:
//!
//! 1. Split total rewards into baker share and distributable pool.
//! 2. Exclude unpayable delegators (self, zero weight, overdelegation).
//! 3. Allocate the pool proportionally, one payment per survivor.
//! 4. Apply per-delegator fee overrides.
//! 5. Zero payments below the minimum amount.
//! 6. Redirect payment destinations.
//!
//! The order is a financial contract: fee overrides run before the minimum
//! threshold so the override decides whether a payment crosses it, and
//! redirects run last so destination changes can never alter amounts.
//! Every step is a pure `ResolutionContext -> ResolutionContext` function;
//! a failing step aborts the cycle with no partial report.

use tracing::{debug, info};

use crate::steps::{
    resolve_baker_rewards, resolve_delegator_rewards, resolve_excluded_delegators,
    resolve_excluded_payments, resolve_fee_exceptions, resolve_redirects,
};
use crate::{math, Address, CycleData, CycleReport, Mutez, PayoutConfig, PayoutError, Result};

/// A delegator still eligible for reward allocation, with its effective
/// stake weight. The exclusion step narrows this set; the allocation step
/// turns it into payment records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub address: Address,
    pub weight: Mutez,
}

/// The value threaded through the pipeline. Steps never mutate a context in
/// place; each consumes one and returns a refined copy.
#[derive(Clone, Debug)]
pub struct ResolutionContext {
    pub config: PayoutConfig,
    pub cycle_data: CycleData,
    pub cycle_report: CycleReport,
    /// Rewards remaining for delegators after the baker's share.
    pub distributable_rewards: Mutez,
    /// Delegators eligible for allocation, in snapshot order.
    pub candidates: Vec<Candidate>,
}

impl ResolutionContext {
    pub fn new(config: PayoutConfig, cycle_data: CycleData) -> Self {
        let candidates = cycle_data
            .cycle_shares
            .iter()
            .map(|share| Candidate {
                address: share.address.clone(),
                weight: share.weight(),
            })
            .collect();
        Self {
            cycle_report: CycleReport::new(cycle_data.cycle),
            distributable_rewards: cycle_data.cycle_rewards,
            candidates,
            config,
            cycle_data,
        }
    }
}

/// Boundary validation of external cycle data. The pipeline itself treats
/// the data as final input, so inconsistencies must be rejected here.
pub fn validate_cycle_data(data: &CycleData) -> Result<()> {
    if data.cycle_rewards > 0 && data.cycle_shares.is_empty() {
        return Err(PayoutError::Data(format!(
            "cycle {} has rewards but no delegator shares",
            data.cycle
        )));
    }
    if data.baker_balance > data.staking_balance {
        return Err(PayoutError::Data(format!(
            "cycle {}: baker balance exceeds staking balance",
            data.cycle
        )));
    }
    let mut seen = std::collections::HashSet::new();
    let mut total_weight: Mutez = 0;
    for share in &data.cycle_shares {
        if share.stake_balance > share.staking_balance {
            return Err(PayoutError::Data(format!(
                "share {} has stake balance above its staking balance",
                share.address
            )));
        }
        if !seen.insert(&share.address) {
            return Err(PayoutError::Data(format!(
                "duplicate delegator share for {}",
                share.address
            )));
        }
        total_weight = math::add(total_weight, share.weight())?;
    }
    if total_weight > data.staking_balance {
        return Err(PayoutError::Data(format!(
            "cycle {}: delegator weights exceed the staking balance snapshot",
            data.cycle
        )));
    }
    Ok(())
}

/// Resolve one cycle's payouts. All-or-nothing: either a complete,
/// internally consistent report or an error; never a partial report.
pub fn resolve_cycle(config: &PayoutConfig, cycle_data: CycleData) -> Result<CycleReport> {
    config.validate()?;
    validate_cycle_data(&cycle_data)?;
    debug!(
        cycle = cycle_data.cycle,
        rewards = cycle_data.cycle_rewards,
        delegators = cycle_data.cycle_shares.len(),
        "resolving cycle"
    );

    let ctx = ResolutionContext::new(config.clone(), cycle_data);
    let ctx = resolve_baker_rewards(ctx)?;
    let ctx = resolve_excluded_delegators(ctx)?;
    let ctx = resolve_delegator_rewards(ctx)?;
    let ctx = resolve_fee_exceptions(ctx)?;
    let ctx = resolve_excluded_payments(ctx)?;
    let ctx = resolve_redirects(ctx)?;

    let report = ctx.cycle_report;
    info!(
        cycle = report.cycle,
        payments = report.payments.len(),
        excluded = report.excluded_delegators.len(),
        baker_reward = report.baker_reward,
        "cycle resolved"
    );
    Ok(report)
}
