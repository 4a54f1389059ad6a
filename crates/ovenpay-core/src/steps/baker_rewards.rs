//! Step 1: split total cycle rewards into the baker's share and the
//! distributable pool.

use tracing::debug;

use crate::engine::ResolutionContext;
use crate::{math, CycleReport, Result};

/// `baker_reward = floor(total * default_fee)`; everything else becomes the
/// distributable pool. The flooring remainder stays with the distributable
/// side here and is swept back to the baker by later flooring, so no mutez
/// is ever dropped.
pub fn resolve_baker_rewards(ctx: ResolutionContext) -> Result<ResolutionContext> {
    let ResolutionContext {
        config,
        cycle_data,
        cycle_report,
        candidates,
        ..
    } = ctx;

    let total = cycle_data.cycle_rewards;
    let baker_reward = config.default_fee.cut(total)?;
    let distributable_rewards = math::sub(total, baker_reward)?;
    debug!(
        cycle = cycle_data.cycle,
        baker_reward, distributable_rewards, "baker reward split"
    );
    Ok(ResolutionContext {
        config,
        cycle_data,
        cycle_report: CycleReport {
            baker_reward,
            ..cycle_report
        },
        distributable_rewards,
        candidates,
    })
}
