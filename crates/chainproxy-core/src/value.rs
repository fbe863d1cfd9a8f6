//! Arbitrary-precision amounts on the JSON wire.
//!
//! Observers expect transaction values as bare JSON numbers that may exceed
//! `u64`. Values are captured as raw JSON text so no precision is lost to `f64`.

use std::str::FromStr;

use alloy_primitives::U256;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

/// Unsigned 256-bit transaction amount.
///
/// Serialized as a bare JSON number. Deserialized from a JSON number or a
/// decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TxValue(pub U256);

impl TxValue {
    pub const ZERO: Self = Self(U256::ZERO);
}

impl From<u64> for TxValue {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl FromStr for TxValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(Self)
    }
}

impl std::fmt::Display for TxValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TxValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.0.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TxValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = decimal_text(raw.get()).map_err(D::Error::custom)?;
        parse_decimal(&text).map(Self).map_err(D::Error::custom)
    }
}

/// `deserialize_with` helper: accept a JSON number or string holding a
/// non-negative integer and keep its decimal text.
pub fn deserialize_decimal_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let text = decimal_text(raw.get()).map_err(D::Error::custom)?;
    parse_decimal(&text).map_err(D::Error::custom)?;
    Ok(text)
}

/// Unquote a raw JSON scalar.
fn decimal_text(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    if raw.starts_with('"') {
        serde_json::from_str::<String>(raw).map_err(|e| e.to_string())
    } else {
        Ok(raw.to_string())
    }
}

fn parse_decimal(s: &str) -> Result<U256, String> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("expected a non-negative integer, got {s:?}"));
    }
    U256::from_str_radix(s, 10).map_err(|e| format!("{s:?}: {e}"))
}
