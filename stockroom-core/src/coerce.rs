//! Lenient numeric coercion for form-submitted record fields.
//!
//! Browser forms post numbers as strings and leave blank inputs as `""`.
//! These deserializers accept a JSON number or a numeric string, treat `""`
//! and `null` as absent, and reject anything negative or non-numeric.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Deserialize an optional non-negative whole number.
pub fn opt_quantity<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(QuantityVisitor)
}

/// Deserialize an optional non-negative finite decimal.
pub fn opt_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(PriceVisitor)
}

fn quantity_from_f64<E: de::Error>(v: f64) -> Result<Option<u64>, E> {
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v >= u64::MAX as f64 {
        return Err(E::custom(format!(
            "expected a non-negative whole number, got {}",
            v
        )));
    }
    Ok(Some(v as u64))
}

fn price_from_f64<E: de::Error>(v: f64) -> Result<Option<f64>, E> {
    if !v.is_finite() || v < 0.0 {
        return Err(E::custom(format!(
            "expected a non-negative price, got {}",
            v
        )));
    }
    Ok(Some(v))
}

struct QuantityVisitor;

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = Option<u64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative whole number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Some)
            .map_err(|_| E::custom(format!("expected a non-negative whole number, got {}", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        quantity_from_f64(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if let Ok(n) = trimmed.parse::<u64>() {
            return Ok(Some(n));
        }
        match trimmed.parse::<f64>() {
            Ok(f) => quantity_from_f64(f),
            Err(_) => Err(E::custom(format!(
                "expected a non-negative whole number, got '{}'",
                trimmed
            ))),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(QuantityVisitor)
    }
}

struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        price_from_f64(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        price_from_f64(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.parse::<f64>() {
            Ok(f) => price_from_f64(f),
            Err(_) => Err(E::custom(format!(
                "expected a non-negative price, got '{}'",
                trimmed
            ))),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(PriceVisitor)
    }
}
