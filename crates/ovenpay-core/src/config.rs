//! Payout configuration.
//!
//! Configuration is immutable per run and fully validated before the
//! pipeline starts: addresses, fees and amounts are parsed into exact typed
//! values at construction, so a `PayoutConfig` in hand is already
//! well-formed apart from cross-field checks done by [`PayoutConfig::validate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Address, Fee, PayoutError, Result, TezAmount};

/// Immutable per-run payout settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// The baker's own address; never paid as a delegator.
    pub baking_address: Address,
    /// Fee retained by the baker on cycle rewards.
    pub default_fee: Fee,
    /// Delegator address -> payout destination overrides.
    #[serde(default)]
    pub redirect_payments: BTreeMap<Address, Address>,
    /// Delegator address -> fee overriding `default_fee` for that delegator.
    #[serde(default)]
    pub fee_exceptions: BTreeMap<Address, Fee>,
    /// Whether the overdelegation guard runs during delegator exclusion.
    #[serde(default)]
    pub overdelegation_guard: bool,
    /// Capacity rule applied when the guard is enabled.
    #[serde(default)]
    pub overdelegation_rule: OverdelegationRule,
    /// Payments strictly below this amount are zeroed. Zero disables the
    /// threshold entirely.
    #[serde(default)]
    pub minimum_payment_amount: TezAmount,
}

impl PayoutConfig {
    pub fn builder() -> PayoutConfigBuilder {
        PayoutConfigBuilder::default()
    }

    /// Cross-field validation. Typed fields are already well-formed; this
    /// rejects the combinations types cannot rule out.
    pub fn validate(&self) -> Result<()> {
        if self.overdelegation_rule.capacity_ratio == 0 {
            return Err(PayoutError::Config(
                "overdelegation capacity_ratio must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// The overdelegation safety rule, explicitly configured rather than
/// hard-coded: the protocol's exact capacity formula is a staking-rules
/// constant that operators must be able to adjust without a code change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdelegationRule {
    /// Maximum staking balance per unit of baker-owned balance. The baker is
    /// overdelegated once `staking_balance > baker_balance * capacity_ratio`.
    pub capacity_ratio: u64,
    /// What happens to delegators once the baker is overdelegated.
    pub policy: OverdelegationPolicy,
}

impl Default for OverdelegationRule {
    fn default() -> Self {
        Self {
            capacity_ratio: 10,
            policy: OverdelegationPolicy::ExcludeLargestFirst,
        }
    }
}

/// Exclusion policy once the capacity trigger fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdelegationPolicy {
    /// Fully exclude delegators in descending weight order (input order
    /// breaks ties) until the remaining staking balance fits capacity.
    ExcludeLargestFirst,
    /// Keep every delegator but scale effective weights down to the safe
    /// capacity; the flooring slack sweeps to the baker.
    ScaleToCapacity,
}

/// Builder accepting raw string settings; `build` parses and validates the
/// lot, so malformed values surface as `PayoutError::Config` before any
/// cycle is resolved.
#[derive(Clone, Debug, Default)]
pub struct PayoutConfigBuilder {
    baking_address: Option<String>,
    default_fee: Option<String>,
    redirect_payments: Vec<(String, String)>,
    fee_exceptions: Vec<(String, String)>,
    overdelegation_guard: bool,
    overdelegation_rule: OverdelegationRule,
    minimum_payment_amount: Option<String>,
}

impl PayoutConfigBuilder {
    pub fn baking_address(mut self, address: impl Into<String>) -> Self {
        self.baking_address = Some(address.into());
        self
    }

    pub fn default_fee(mut self, fee: impl Into<String>) -> Self {
        self.default_fee = Some(fee.into());
        self
    }

    pub fn redirect(mut self, delegator: impl Into<String>, recipient: impl Into<String>) -> Self {
        self.redirect_payments.push((delegator.into(), recipient.into()));
        self
    }

    pub fn fee_exception(mut self, delegator: impl Into<String>, fee: impl Into<String>) -> Self {
        self.fee_exceptions.push((delegator.into(), fee.into()));
        self
    }

    pub fn overdelegation_guard(mut self, enabled: bool) -> Self {
        self.overdelegation_guard = enabled;
        self
    }

    pub fn overdelegation_rule(mut self, rule: OverdelegationRule) -> Self {
        self.overdelegation_rule = rule;
        self
    }

    pub fn minimum_payment_amount(mut self, amount: impl Into<String>) -> Self {
        self.minimum_payment_amount = Some(amount.into());
        self
    }

    pub fn build(self) -> Result<PayoutConfig> {
        let baking_address = self
            .baking_address
            .ok_or_else(|| PayoutError::Config("baking_address is required".into()))?;
        let default_fee = self
            .default_fee
            .ok_or_else(|| PayoutError::Config("default_fee is required".into()))?;

        let mut redirect_payments = BTreeMap::new();
        for (delegator, recipient) in self.redirect_payments {
            redirect_payments.insert(Address::parse(delegator)?, Address::parse(recipient)?);
        }
        let mut fee_exceptions = BTreeMap::new();
        for (delegator, fee) in self.fee_exceptions {
            fee_exceptions.insert(Address::parse(delegator)?, Fee::parse(&fee)?);
        }

        let config = PayoutConfig {
            baking_address: Address::parse(baking_address)?,
            default_fee: Fee::parse(&default_fee)?,
            redirect_payments,
            fee_exceptions,
            overdelegation_guard: self.overdelegation_guard,
            overdelegation_rule: self.overdelegation_rule,
            minimum_payment_amount: match self.minimum_payment_amount {
                Some(amount) => TezAmount::parse(&amount)?,
                None => TezAmount::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAKER: &str = "tz1VSUr8wwNhLAzempochtzDNoKa2PYdcy4w";
    const DELEGATOR: &str = "tz2BFTyPeYRzxd5aiBchbXN3WCZhx7BqbMBq";
    const RECIPIENT: &str = "tz3RDC3Jdn4j15J7bBHZd29EUee9gVB1CxD9";

    #[test]
    fn builder_creates_valid_config() {
        let config = PayoutConfig::builder()
            .baking_address(BAKER)
            .default_fee("0.05")
            .redirect(DELEGATOR, RECIPIENT)
            .fee_exception(DELEGATOR, "0.1")
            .overdelegation_guard(true)
            .minimum_payment_amount("2")
            .build()
            .expect("should build");

        assert_eq!(config.baking_address.as_str(), BAKER);
        assert_eq!(config.default_fee, Fee::parse("0.05").unwrap());
        assert_eq!(config.redirect_payments.len(), 1);
        assert_eq!(config.fee_exceptions.len(), 1);
        assert!(config.overdelegation_guard);
        assert_eq!(config.minimum_payment_amount.to_mutez(), 2_000_000);
        assert_eq!(config.overdelegation_rule, OverdelegationRule::default());
    }

    #[test]
    fn missing_baking_address_rejected() {
        let result = PayoutConfig::builder().default_fee("0.05").build();
        assert!(matches!(result, Err(PayoutError::Config(_))));
    }

    #[test]
    fn fee_above_one_rejected() {
        let result = PayoutConfig::builder()
            .baking_address(BAKER)
            .default_fee("1.5")
            .build();
        assert!(matches!(result, Err(PayoutError::Config(_))));
    }

    #[test]
    fn malformed_redirect_address_rejected() {
        let result = PayoutConfig::builder()
            .baking_address(BAKER)
            .default_fee("0.05")
            .redirect(DELEGATOR, "not-an-address")
            .build();
        assert!(matches!(result, Err(PayoutError::Config(_))));
    }

    #[test]
    fn negative_minimum_amount_rejected() {
        let result = PayoutConfig::builder()
            .baking_address(BAKER)
            .default_fee("0.05")
            .minimum_payment_amount("-1")
            .build();
        assert!(matches!(result, Err(PayoutError::Config(_))));
    }

    #[test]
    fn zero_capacity_ratio_rejected() {
        let result = PayoutConfig::builder()
            .baking_address(BAKER)
            .default_fee("0.05")
            .overdelegation_rule(OverdelegationRule {
                capacity_ratio: 0,
                policy: OverdelegationPolicy::ExcludeLargestFirst,
            })
            .build();
        assert!(matches!(result, Err(PayoutError::Config(_))));
    }

    #[test]
    fn config_serde_round_trips() {
        let config = PayoutConfig::builder()
            .baking_address(BAKER)
            .default_fee("0.05")
            .redirect(DELEGATOR, RECIPIENT)
            .fee_exception(DELEGATOR, "0")
            .minimum_payment_amount("1.5")
            .build()
            .unwrap();

        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: PayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn config_deserialization_rejects_bad_fee() {
        let json = format!(
            r#"{{"baking_address": "{BAKER}", "default_fee": "2.0"}}"#
        );
        assert!(serde_json::from_str::<PayoutConfig>(&json).is_err());
    }
}
