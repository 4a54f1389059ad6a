//! Exact decimal money values.
//!
//! Fees and minimum payment amounts arrive as decimal strings in
//! configuration. Both are parsed into exact integer representations up
//! front ([`Fee`] as a fraction over a power of ten, [`TezAmount`] as mutez)
//! so the pipeline never re-parses and never touches floating point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::math::{self, MUTEZ_FACTOR};
use crate::{Mutez, PayoutError, Result};

/// Most fractional digits accepted for a fee string.
const MAX_FEE_SCALE: u32 = 18;
/// Fractional digits of one tez; more would name sub-mutez amounts.
const TEZ_SCALE: u32 = 6;

/// Parse an unsigned decimal string into `(digits, scale)` where the value
/// is `digits / 10^scale`. Fail-closed: signs, exponents, empty parts and
/// excess precision are all rejected.
fn parse_decimal(s: &str, max_scale: u32) -> Result<(u128, u32)> {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PayoutError::Config(format!("invalid decimal string: {s:?}")));
    }
    if s.contains('.') && (frac_part.is_empty() || !frac_part.bytes().all(|b| b.is_ascii_digit())) {
        return Err(PayoutError::Config(format!("invalid decimal string: {s:?}")));
    }
    let scale = frac_part.len() as u32;
    if scale > max_scale {
        return Err(PayoutError::Config(format!(
            "{s:?} has more than {max_scale} decimal places"
        )));
    }
    let mut digits: u128 = 0;
    for b in int_part.bytes().chain(frac_part.bytes()) {
        digits = digits
            .checked_mul(10)
            .and_then(|d| d.checked_add((b - b'0') as u128))
            .ok_or_else(|| PayoutError::Config(format!("decimal string out of range: {s:?}")))?;
    }
    Ok((digits, scale))
}

/// An exact fee fraction in `[0, 1]`, kept as `numer / 10^scale`.
///
/// Stored normalized (no trailing zero digits), so `"0.50"` and `"0.5"`
/// compare equal and display identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fee {
    numer: u128,
    scale: u32,
}

impl Fee {
    pub fn parse(s: &str) -> Result<Self> {
        let (mut numer, mut scale) = parse_decimal(s, MAX_FEE_SCALE)?;
        let denom = 10u128.pow(scale);
        if numer > denom {
            return Err(PayoutError::Config(format!(
                "fee must be within [0, 1], got {s:?}"
            )));
        }
        while scale > 0 && numer % 10 == 0 {
            numer /= 10;
            scale -= 1;
        }
        Ok(Self { numer, scale })
    }

    pub fn zero() -> Self {
        Self { numer: 0, scale: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.numer == 0
    }

    fn denom(&self) -> u128 {
        10u128.pow(self.scale)
    }

    /// `floor(amount * fee)`, the baker's cut of `amount`.
    pub fn cut(&self, amount: Mutez) -> Result<Mutez> {
        math::mul_frac_floor(amount, self.numer, self.denom())
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            write!(f, "{}", self.numer)
        } else {
            let denom = self.denom();
            write!(
                f,
                "{}.{:0width$}",
                self.numer / denom,
                self.numer % denom,
                width = self.scale as usize
            )
        }
    }
}

impl FromStr for Fee {
    type Err = PayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Fee {
    type Error = PayoutError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Fee> for String {
    fn from(fee: Fee) -> Self {
        fee.to_string()
    }
}

/// An exact tez amount, stored as mutez.
///
/// Parsed from a decimal string in main currency units; more than six
/// fractional digits would name a sub-mutez amount and is rejected rather
/// than floored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TezAmount(Mutez);

impl TezAmount {
    pub fn parse(s: &str) -> Result<Self> {
        let (digits, scale) = parse_decimal(s, TEZ_SCALE)?;
        let mutez = digits
            .checked_mul(10u128.pow(TEZ_SCALE - scale))
            .and_then(|m| Mutez::try_from(m).ok())
            .ok_or_else(|| PayoutError::Config(format!("tez amount out of range: {s:?}")))?;
        Ok(Self(mutez))
    }

    pub fn from_mutez(mutez: Mutez) -> Self {
        Self(mutez)
    }

    pub fn to_mutez(self) -> Mutez {
        self.0
    }
}

impl fmt::Display for TezAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / MUTEZ_FACTOR;
        let frac = self.0 % MUTEZ_FACTOR;
        if frac == 0 {
            write!(f, "{int}")
        } else {
            let s = format!("{frac:06}");
            write!(f, "{int}.{}", s.trim_end_matches('0'))
        }
    }
}

impl FromStr for TezAmount {
    type Err = PayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TezAmount {
    type Error = PayoutError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<TezAmount> for String {
    fn from(amount: TezAmount) -> Self {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_parses_plain_and_fractional_strings() {
        assert_eq!(Fee::parse("0").unwrap(), Fee::zero());
        assert_eq!(Fee::parse("1").unwrap().cut(1000).unwrap(), 1000);
        assert_eq!(Fee::parse("0.05").unwrap().cut(1000).unwrap(), 50);
        assert_eq!(Fee::parse("0.5").unwrap(), Fee::parse("0.50").unwrap());
        assert_eq!(Fee::parse("1.000").unwrap(), Fee::parse("1").unwrap());
    }

    #[test]
    fn fee_cut_floors() {
        let fee = Fee::parse("0.1").unwrap();
        assert_eq!(fee.cut(19).unwrap(), 1);
        assert_eq!(fee.cut(9).unwrap(), 0);
    }

    #[test]
    fn fee_rejects_invalid_strings() {
        for bad in ["", ".", "1.", ".5", "-0.1", "1.01", "2", "0,5", "5e-2", "0.1 "] {
            assert!(
                matches!(Fee::parse(bad), Err(PayoutError::Config(_))),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn fee_rejects_excess_precision() {
        let s = format!("0.{}", "1".repeat(19));
        assert!(matches!(Fee::parse(&s), Err(PayoutError::Config(_))));
    }

    #[test]
    fn fee_display_round_trips() {
        for s in ["0", "1", "0.05", "0.123456789"] {
            assert_eq!(Fee::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn tez_amount_converts_to_mutez_exactly() {
        assert_eq!(TezAmount::parse("0").unwrap().to_mutez(), 0);
        assert_eq!(TezAmount::parse("2").unwrap().to_mutez(), 2_000_000);
        assert_eq!(TezAmount::parse("1.5").unwrap().to_mutez(), 1_500_000);
        assert_eq!(TezAmount::parse("0.000001").unwrap().to_mutez(), 1);
    }

    #[test]
    fn tez_amount_rejects_sub_mutez_precision() {
        assert!(matches!(
            TezAmount::parse("0.0000001"),
            Err(PayoutError::Config(_))
        ));
    }

    #[test]
    fn tez_amount_rejects_negative() {
        assert!(matches!(TezAmount::parse("-1"), Err(PayoutError::Config(_))));
    }

    #[test]
    fn tez_amount_display_round_trips() {
        for s in ["0", "2", "1.5", "0.000001"] {
            assert_eq!(TezAmount::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn fee_serde_round_trips_as_string() {
        let fee = Fee::parse("0.05").unwrap();
        let json = serde_json::to_string(&fee).unwrap();
        assert_eq!(json, "\"0.05\"");
        assert_eq!(serde_json::from_str::<Fee>(&json).unwrap(), fee);
        assert!(serde_json::from_str::<Fee>("\"1.5\"").is_err());
    }
}
