//! Account addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PayoutError, Result};

/// Address prefixes accepted for delegators and payout recipients: implicit
/// accounts (tz1..tz4) and originated contracts (KT1).
const PREFIXES: [&str; 5] = ["tz1", "tz2", "tz3", "tz4", "KT1"];

/// Base58check-encoded addresses are always this long.
const ADDRESS_LEN: usize = 36;

/// A validated account address.
///
/// Validation is shape-only (prefix, length, base58 alphabet); full checksum
/// verification belongs to the wallet layer, which is out of scope here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.len() != ADDRESS_LEN {
            return Err(PayoutError::Config(format!(
                "malformed address (expected {ADDRESS_LEN} characters): {s:?}"
            )));
        }
        if !PREFIXES.iter().any(|p| s.starts_with(p)) {
            return Err(PayoutError::Config(format!(
                "malformed address (unknown prefix): {s:?}"
            )));
        }
        if !s.bytes().all(is_base58) {
            return Err(PayoutError::Config(format!(
                "malformed address (invalid character): {s:?}"
            )));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Bitcoin base58 alphabet: alphanumerics minus `0`, `O`, `I`, `l`.
fn is_base58(b: u8) -> bool {
    b.is_ascii_alphanumeric() && !matches!(b, b'0' | b'O' | b'I' | b'l')
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = PayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = PayoutError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
