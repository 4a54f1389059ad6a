//! Step 2: narrow the delegator candidate set.
//!
//! Removes the baker's own address, zero-weight delegators, and (when the
//! guard is enabled and the capacity trigger fires) delegators per the
//! configured overdelegation policy. Everything is derived from the original
//! share list, so running the step twice yields the same candidate set as
//! running it once. No payment records exist yet; only candidates change.

use std::collections::HashSet;

use tracing::warn;

use crate::engine::{Candidate, ResolutionContext};
use crate::{
    math, Address, CycleReport, ExcludedDelegator, ExclusionReason, Mutez,
    OverdelegationPolicy, Result,
};

pub fn resolve_excluded_delegators(ctx: ResolutionContext) -> Result<ResolutionContext> {
    let ResolutionContext {
        config,
        cycle_data: data,
        cycle_report,
        distributable_rewards,
        ..
    } = ctx;

    // Delegators still payable before the overdelegation rule is consulted.
    let payable: Vec<usize> = data
        .cycle_shares
        .iter()
        .enumerate()
        .filter(|(_, s)| s.address != config.baking_address && s.weight() > 0)
        .map(|(i, _)| i)
        .collect();

    let mut overdelegated: HashSet<&Address> = HashSet::new();
    let mut scale_capacity: Option<Mutez> = None;
    if config.overdelegation_guard {
        let rule = &config.overdelegation_rule;
        let capacity = math::mul(data.baker_balance, rule.capacity_ratio)?;
        if data.staking_balance > capacity {
            warn!(
                cycle = data.cycle,
                staking_balance = data.staking_balance,
                capacity,
                policy = ?rule.policy,
                "baker is overdelegated"
            );
            match rule.policy {
                OverdelegationPolicy::ExcludeLargestFirst => {
                    let excess = data.staking_balance - capacity;
                    // Descending weight; sort_by is stable, so equal weights
                    // keep snapshot order.
                    let mut order = payable.clone();
                    order.sort_by(|&a, &b| {
                        data.cycle_shares[b]
                            .weight()
                            .cmp(&data.cycle_shares[a].weight())
                    });
                    let mut removed: Mutez = 0;
                    for i in order {
                        if removed >= excess {
                            break;
                        }
                        overdelegated.insert(&data.cycle_shares[i].address);
                        removed = math::add(removed, data.cycle_shares[i].weight())?;
                    }
                }
                OverdelegationPolicy::ScaleToCapacity => {
                    scale_capacity = Some(capacity);
                }
            }
        }
    }

    let mut candidates = Vec::with_capacity(payable.len());
    let mut excluded = Vec::new();
    for share in &data.cycle_shares {
        let reason = if share.address == config.baking_address {
            Some(ExclusionReason::SelfDelegation)
        } else if share.weight() == 0 {
            Some(ExclusionReason::ZeroBalance)
        } else if overdelegated.contains(&share.address) {
            Some(ExclusionReason::Overdelegation)
        } else {
            None
        };
        match reason {
            Some(reason) => excluded.push(ExcludedDelegator {
                address: share.address.clone(),
                reason,
            }),
            None => {
                let weight = match scale_capacity {
                    Some(capacity) => {
                        math::mul_div_floor(share.weight(), capacity, data.staking_balance)?
                    }
                    None => share.weight(),
                };
                candidates.push(Candidate {
                    address: share.address.clone(),
                    weight,
                });
            }
        }
    }

    Ok(ResolutionContext {
        cycle_report: CycleReport {
            excluded_delegators: excluded,
            ..cycle_report
        },
        candidates,
        config,
        cycle_data: data,
        distributable_rewards,
    })
}
