//! Applicant-count threshold ("limit").

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;

/// Boundary between "low" and "high" applicant competition.
///
/// Always a positive integer. A count strictly below the threshold renders in
/// the below-threshold style.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Threshold(u64);

impl Threshold {
    /// Used when the configuration store has no usable value.
    pub const DEFAULT: Threshold = Threshold(300);

    pub fn new(value: u64) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::validation("threshold must be positive"));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Resolve a stored configuration value into a threshold.
    ///
    /// Accepts JSON numbers and numeric strings. Fractions are truncated.
    /// Absent, non-numeric, non-finite and non-positive values fall back to
    /// [`Threshold::DEFAULT`].
    pub fn from_stored(value: Option<&Value>) -> Self {
        let number = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        number
            .filter(|n| n.is_finite() && *n >= 1.0)
            .map(|n| Self(n.trunc() as u64))
            .unwrap_or(Self::DEFAULT)
    }

    /// Strict comparison used by the renderer.
    pub fn is_below(&self, count: u64) -> bool {
        count < self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl core::fmt::Display for Threshold {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u64> for Threshold {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for u64 {
    fn from(value: Threshold) -> Self {
        value.0
    }
}

impl FromStr for Threshold {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u64>()
            .map_err(|e| DomainError::validation(format!("threshold: {e}")))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_value_uses_default() {
        assert_eq!(Threshold::from_stored(None), Threshold::DEFAULT);
        assert_eq!(Threshold::DEFAULT.get(), 300);
    }

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        assert_eq!(Threshold::from_stored(Some(&json!(150))).get(), 150);
        assert_eq!(Threshold::from_stored(Some(&json!("75"))).get(), 75);
        assert_eq!(Threshold::from_stored(Some(&json!(" 42 "))).get(), 42);
        assert_eq!(Threshold::from_stored(Some(&json!(99.9))).get(), 99);
    }

    #[test]
    fn unusable_values_use_default() {
        for value in [
            json!("abc"),
            json!(""),
            json!(0),
            json!(-5),
            json!(0.5),
            json!(null),
            json!(true),
            json!([1]),
        ] {
            assert_eq!(Threshold::from_stored(Some(&value)), Threshold::DEFAULT, "{value}");
        }
    }

    #[test]
    fn zero_is_rejected() {
        assert!(Threshold::new(0).is_err());
        assert!("0".parse::<Threshold>().is_err());
        assert!("x".parse::<Threshold>().is_err());
        assert_eq!("12".parse::<Threshold>().unwrap().get(), 12);
    }

    #[test]
    fn comparison_is_strict() {
        let t = Threshold::new(300).unwrap();
        assert!(t.is_below(299));
        assert!(!t.is_below(300));
        assert!(!t.is_below(301));
    }

    #[test]
    fn serde_rejects_zero() {
        assert!(serde_json::from_value::<Threshold>(json!(0)).is_err());
        assert_eq!(serde_json::from_value::<Threshold>(json!(10)).unwrap().get(), 10);
        assert_eq!(serde_json::to_value(Threshold::DEFAULT).unwrap(), json!(300));
    }
}
