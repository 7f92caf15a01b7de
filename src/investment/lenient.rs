//! Forgiving deserializers for penalty tiers and fee terms
//!
//! Malformed penalty or fee data degrades to "no penalty" / "no fee" instead of
//! rejecting the whole investment.

use super::{FeeDeductionType, GraduatedPenaltyTier, ManagementFeePolicy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number or numeric string as f64
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Tier year; anything that is not a whole number in `u32` range becomes 0 (never matches)
pub(crate) fn year<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(d)?;
    let year = as_number(&value)
        .filter(|y| y.is_finite() && y.fract() == 0.0 && *y >= 0.0 && *y <= u32::MAX as f64)
        .map(|y| y as u32)
        .unwrap_or(0);
    Ok(year)
}

/// Percentage; unparseable values become 0
pub(crate) fn percentage<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(as_number(&value).unwrap_or(0.0))
}

/// Optional rate; unparseable values become `None`
pub(crate) fn optional_rate<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(as_number(&value))
}

pub(crate) fn deduction_type<'de, D: Deserializer<'de>>(d: D) -> Result<FeeDeductionType, D::Error> {
    let value = Value::deserialize(d)?;
    let kind = match value.as_str().map(|s| s.trim().to_ascii_lowercase()) {
        Some(s) if s == "upfront" => FeeDeductionType::Upfront,
        Some(s) if s == "ongoing" => FeeDeductionType::Ongoing,
        _ => {
            log::warn!("Unknown fee deductionType {}, charging no fee", value);
            FeeDeductionType::Unknown
        }
    };
    Ok(kind)
}

/// Tier list; entries that are not objects are dropped, a non-list is empty
pub(crate) fn tiers<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<GraduatedPenaltyTier>, D::Error> {
    let value = Value::deserialize(d)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            log::warn!("Ignoring malformed graduatedPenalties {}", other);
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(tier) => Some(tier),
            Err(e) => {
                log::warn!("Skipping malformed penalty tier: {}", e);
                None
            }
        })
        .collect())
}

/// Optional fee; a fee that is not an object is treated as absent
pub(crate) fn fee<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ManagementFeePolicy>, D::Error> {
    let value = Value::deserialize(d)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(fee) => Ok(Some(fee)),
        Err(e) => {
            log::warn!("Ignoring malformed management fee: {}", e);
            Ok(None)
        }
    }
}
