//! Step 6: rewrite payment destinations.

use tracing::debug;

use crate::engine::ResolutionContext;
use crate::{CycleReport, Payment, Result};

/// Set the recipient of each redirected delegator's payment to the mapped
/// address. Amounts are untouched; delegators without an entry keep
/// themselves as recipient. A redirect key with no matching payment is stale
/// configuration and is skipped.
pub fn resolve_redirects(ctx: ResolutionContext) -> Result<ResolutionContext> {
    if ctx.config.redirect_payments.is_empty() {
        return Ok(ctx);
    }
    let ResolutionContext {
        config,
        cycle_data,
        cycle_report,
        distributable_rewards,
        candidates,
    } = ctx;

    let mut redirected = 0usize;
    let payments: Vec<Payment> = cycle_report
        .payments
        .iter()
        .map(|payment| match config.redirect_payments.get(&payment.delegator) {
            Some(recipient) => {
                redirected += 1;
                Payment {
                    recipient: recipient.clone(),
                    ..payment.clone()
                }
            }
            None => payment.clone(),
        })
        .collect();
    if redirected > 0 {
        debug!(cycle = cycle_data.cycle, redirected, "payments redirected");
    }

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
