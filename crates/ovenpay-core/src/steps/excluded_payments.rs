//! Step 5: zero payments below the minimum amount.

use tracing::debug;

use crate::engine::ResolutionContext;
use crate::{CycleReport, Payment, Result};

/// Replace every amount strictly below the configured minimum with zero.
///
/// Records at or above the threshold pass through untouched; order and
/// record count are preserved, the excluded record stays in the report as an
/// inert zero-amount payment. A threshold of zero disables exclusion, so
/// every positive amount, however small, is paid.
pub fn resolve_excluded_payments(ctx: ResolutionContext) -> Result<ResolutionContext> {
    let threshold = ctx.config.minimum_payment_amount.to_mutez();
    if threshold == 0 {
        return Ok(ctx);
    }
    let ResolutionContext {
        config,
        cycle_data,
        cycle_report,
        distributable_rewards,
        candidates,
    } = ctx;

    let mut zeroed = 0usize;
    let payments: Vec<Payment> = cycle_report
        .payments
        .iter()
        .map(|payment| {
            if payment.amount < threshold {
                zeroed += 1;
                Payment {
                    amount: 0,
                    ..payment.clone()
                }
            } else {
                payment.clone()
            }
        })
        .collect();
    if zeroed > 0 {
        debug!(
            cycle = cycle_data.cycle,
            zeroed, threshold, "sub-threshold payments excluded"
        );
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::fixtures::{context, cycle_data, share, BAKER};
    use crate::steps::{
        resolve_baker_rewards, resolve_delegator_rewards, resolve_excluded_delegators,
    };
    use crate::PayoutConfig;

    fn resolved_input(minimum: &str) -> ResolutionContext {
        let config = PayoutConfig::builder()
            .baking_address(BAKER)
            .default_fee("0")
            .minimum_payment_amount(minimum)
            .build()
            .unwrap();
        // Weights chosen so payments land at 6_000_000 / 2_000_000 / 500_000.
        let data = cycle_data(
            8_500_000,
            900_000_000,
            vec![share(1, 0, 600), share(2, 0, 200), share(3, 0, 50)],
        );
        let ctx = context(config, data);
        let ctx = resolve_baker_rewards(ctx).unwrap();
        let ctx = resolve_excluded_delegators(ctx).unwrap();
        resolve_delegator_rewards(ctx).unwrap()
    }

    #[test]
    fn zero_threshold_is_a_noop() {
        let input = resolved_input("0");
        let before = input.cycle_report.clone();
        let out = resolve_excluded_payments(input).unwrap();
        assert_eq!(out.cycle_report, before);
        assert!(out.cycle_report.payments.iter().all(|p| p.amount > 0));
    }

    #[test]
    fn zeroes_payments_strictly_below_threshold() {
        let input = resolved_input("2");
        let before = input.cycle_report.payments.clone();
        let out = resolve_excluded_payments(input).unwrap();
        let after = &out.cycle_report.payments;

        assert_eq!(after.len(), before.len());
        // 6 tez and exactly-2 tez survive untouched; 0.5 tez is zeroed.
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[1]);
        assert_eq!(after[1].amount, 2_000_000);
        assert_eq!(after[2].amount, 0);
        assert_eq!(after[2].delegator, before[2].delegator);
        assert_eq!(after[2].recipient, before[2].recipient);
    }

    #[test]
    fn threshold_leaves_order_and_count_intact() {
        let input = resolved_input("100");
        let delegators_before: Vec<_> = input
            .cycle_report
            .payments
            .iter()
            .map(|p| p.delegator.clone())
            .collect();
        let out = resolve_excluded_payments(input).unwrap();
        let delegators_after: Vec<_> = out
            .cycle_report
            .payments
            .iter()
            .map(|p| p.delegator.clone())
            .collect();
        assert_eq!(delegators_after, delegators_before);
        assert!(out.cycle_report.payments.iter().all(|p| p.amount == 0));
    }
}
