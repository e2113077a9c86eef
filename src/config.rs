//! Evaluator configuration.

use serde::{Deserialize, Serialize};

/// Value returned by DIVIDE and MODULUS when the divisor is zero.
pub const DIVISION_BY_ZERO_SENTINEL: i64 = i32::MAX as i64;

/// How DIVIDE and MODULUS react to a zero divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivisionMode {
    /// Return [`DIVISION_BY_ZERO_SENTINEL`] instead of failing.
    #[default]
    Sentinel,
    /// Fail with `ExpressionError::DivisionByZero`.
    Error,
}

/// Evaluator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Zero-divisor behaviour for DIVIDE and MODULUS.
    #[serde(default)]
    pub division: DivisionMode,
}

impl EvalConfig {
    /// Configuration that reports division by zero as an error
    pub fn strict() -> Self {
        EvalConfig {
            division: DivisionMode::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sentinel() {
        assert_eq!(EvalConfig::default().division, DivisionMode::Sentinel);
        assert_eq!(EvalConfig::strict().division, DivisionMode::Error);
        assert_eq!(DIVISION_BY_ZERO_SENTINEL, 2147483647);
    }

    #[test]
    fn test_config_from_json() {
        let config: EvalConfig = serde_json::from_str(r#"{"division": "error"}"#).unwrap();
        assert_eq!(config, EvalConfig::strict());

        let config: EvalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EvalConfig::default());
    }
}
