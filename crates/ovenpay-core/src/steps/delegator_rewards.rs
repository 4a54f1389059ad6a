//! Step 3: allocate the distributable pool proportionally.

use tracing::debug;

use crate::engine::ResolutionContext;
use crate::{math, CycleReport, Mutez, Payment, Result};

/// One payment per surviving candidate:
/// `amount = floor(distributable * weight / total_weight)`.
///
/// The denominator is the ORIGINAL share set's total weight. Excluded
/// delegators' stake still dilutes the survivors' proportion; exclusion
/// changes who gets paid, not how the pool is sized, and the undistributed
/// slice stays with the baker. Flooring remainders are likewise never
/// redistributed. Payments keep snapshot order; recipients default to the
/// delegator itself.
pub fn resolve_delegator_rewards(ctx: ResolutionContext) -> Result<ResolutionContext> {
    let ResolutionContext {
        config,
        cycle_data,
        cycle_report,
        distributable_rewards,
        candidates,
    } = ctx;

    let mut total_weight: Mutez = 0;
    for share in &cycle_data.cycle_shares {
        total_weight = math::add(total_weight, share.weight())?;
    }

    let mut payments = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        let amount = math::mul_div_floor(distributable_rewards, candidate.weight, total_weight)?;
        payments.push(Payment {
            delegator: candidate.address.clone(),
            recipient: candidate.address.clone(),
            amount,
        });
    }
    debug!(
        cycle = cycle_data.cycle,
        payments = payments.len(),
        total_weight,
        "delegator rewards allocated"
    );

    Ok(ResolutionContext {
        config,
        cycle_data,
        cycle_report: CycleReport {
            payments,
            ..cycle_report
        },
        distributable_rewards,
        candidates,
    })
}
