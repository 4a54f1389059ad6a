//! Step 4: apply per-delegator fee overrides.

use tracing::debug;

use crate::engine::ResolutionContext;
use crate::{math, CycleReport, Mutez, Result};

/// Recompute payments whose delegator carries a fee override.
///
/// The delegator's gross allocation is re-derived from TOTAL cycle rewards
/// (`floor(total * weight / total_weight)`) and split again at the override
/// fee; only the net portion stays in the payment, and the difference
/// against the default-fee amount moves into (or out of) the baker's
/// reward. An override key with no matching payment is stale configuration,
/// not an error, and is skipped.
pub fn resolve_fee_exceptions(ctx: ResolutionContext) -> Result<ResolutionContext> {
    if ctx.config.fee_exceptions.is_empty() {
        return Ok(ctx);
    }
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

    let mut baker_reward = cycle_report.baker_reward;
    let mut payments = cycle_report.payments;
    let mut overridden = 0usize;
    for (payment, candidate) in payments.iter_mut().zip(&candidates) {
        let Some(fee) = config.fee_exceptions.get(&payment.delegator) else {
            continue;
        };
        let gross = math::mul_div_floor(cycle_data.cycle_rewards, candidate.weight, total_weight)?;
        let net = math::sub(gross, fee.cut(gross)?)?;
        if net >= payment.amount {
            // Refund case (override below the default fee). Independent
            // flooring can leave the tracked baker reward a few mutez short
            // of the aggregate refund; clamping keeps the settled total
            // within the documented bound instead of failing the cycle.
            baker_reward = baker_reward.saturating_sub(net - payment.amount);
        } else {
            baker_reward = math::add(baker_reward, payment.amount - net)?;
        }
        payment.amount = net;
        overridden += 1;
    }
    if overridden > 0 {
        debug!(
            cycle = cycle_data.cycle,
            overridden, baker_reward, "fee overrides applied"
        );
    }

    Ok(ResolutionContext {
        config,
        cycle_data,
        cycle_report: CycleReport {
            baker_reward,
            payments,
            ..cycle_report
        },
        distributable_rewards,
        candidates,
    })
}
