//! The six resolution steps.
//!
//! Each step is a pure function consuming a [`crate::ResolutionContext`] and
//! returning a refined copy. Composition order lives in [`crate::engine`]
//! and is part of the financial contract; the steps themselves make no
//! assumptions beyond what their inputs carry.

mod baker_rewards;
mod delegator_rewards;
mod excluded_delegators;
mod excluded_payments;
mod fee_exceptions;
mod redirects;

pub use baker_rewards::resolve_baker_rewards;
pub use delegator_rewards::resolve_delegator_rewards;
pub use excluded_delegators::resolve_excluded_delegators;
pub use excluded_payments::resolve_excluded_payments;
pub use fee_exceptions::resolve_fee_exceptions;
pub use redirects::resolve_redirects;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::engine::ResolutionContext;
    use crate::{Address, CycleData, DelegatorShare, Mutez, PayoutConfig};

    pub(crate) const BAKER: &str = "tz1VSUr8wwNhLAzempochtzDNoKa2PYdcy4w";

    pub(crate) fn baker_address() -> Address {
        Address::parse(BAKER).unwrap()
    }

    /// Deterministic well-formed address for delegator `i`.
    pub(crate) fn address(i: usize) -> Address {
        const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz";
        let hi = ALPHABET[(i / ALPHABET.len()) % ALPHABET.len()] as char;
        let lo = ALPHABET[i % ALPHABET.len()] as char;
        Address::parse(format!("tz1{}{hi}{lo}", "x".repeat(31))).unwrap()
    }

    pub(crate) fn share(i: usize, stake_balance: Mutez, staking_balance: Mutez) -> DelegatorShare {
        DelegatorShare {
            address: address(i),
            stake_balance,
            staking_balance,
        }
    }

    /// Cycle data with the snapshot staking balance derived from the baker's
    /// own balance plus all delegated weights.
    pub(crate) fn cycle_data(
        cycle_rewards: Mutez,
        baker_balance: Mutez,
        cycle_shares: Vec<DelegatorShare>,
    ) -> CycleData {
        let delegated: Mutez = cycle_shares.iter().map(|s| s.weight()).sum();
        CycleData {
            cycle: 470,
            cycle_rewards,
            baker_balance,
            staking_balance: baker_balance + delegated,
            cycle_shares,
        }
    }

    /// 5% default fee, no overrides, guard disabled.
    pub(crate) fn default_config() -> PayoutConfig {
        PayoutConfig::builder()
            .baking_address(BAKER)
            .default_fee("0.05")
            .build()
            .unwrap()
    }

    pub(crate) fn context(config: PayoutConfig, data: CycleData) -> ResolutionContext {
        ResolutionContext::new(config, data)
    }
}
