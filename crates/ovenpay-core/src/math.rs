//! Checked mutez arithmetic.
//!
//! Every multiply-then-divide on money goes through [`mul_div_floor`] with
//! u128 widening; plain additions and subtractions are checked. Flooring is
//! the one rounding mode in the engine and always rounds in the baker's
//! favor, never a delegator's.

use crate::{Mutez, PayoutError, Result};

/// Mutez per tez.
pub const MUTEZ_FACTOR: u64 = 1_000_000;

/// `floor(a * b / denom)` with u128 intermediates.
pub fn mul_div_floor(a: Mutez, b: Mutez, denom: Mutez) -> Result<Mutez> {
    if denom == 0 {
        return Err(PayoutError::Arithmetic("division by zero".into()));
    }
    let num = (a as u128) * (b as u128);
    let out = num / (denom as u128);
    Mutez::try_from(out)
        .map_err(|_| PayoutError::Arithmetic("mutez overflow in mul_div_floor".into()))
}

/// `floor(a * num / denom)` for u128 fraction terms (exact fee application).
pub fn mul_frac_floor(a: Mutez, num: u128, denom: u128) -> Result<Mutez> {
    if denom == 0 {
        return Err(PayoutError::Arithmetic("division by zero".into()));
    }
    let product = (a as u128)
        .checked_mul(num)
        .ok_or_else(|| PayoutError::Arithmetic("u128 overflow in mul_frac_floor".into()))?;
    let out = product / denom;
    Mutez::try_from(out)
        .map_err(|_| PayoutError::Arithmetic("mutez overflow in mul_frac_floor".into()))
}

pub fn add(a: Mutez, b: Mutez) -> Result<Mutez> {
    a.checked_add(b)
        .ok_or_else(|| PayoutError::Arithmetic("mutez overflow in add".into()))
}

pub fn sub(a: Mutez, b: Mutez) -> Result<Mutez> {
    a.checked_sub(b)
        .ok_or_else(|| PayoutError::Arithmetic("mutez underflow in sub".into()))
}

pub fn mul(a: Mutez, b: Mutez) -> Result<Mutez> {
    a.checked_mul(b)
        .ok_or_else(|| PayoutError::Arithmetic("mutez overflow in mul".into()))
}
