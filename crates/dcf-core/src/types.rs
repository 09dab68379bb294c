use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples (e.g., 8.5x EV/EBITDA)
pub type Multiple = Decimal;

/// Floor applied to near-zero divisors. Decimal division by exact zero
/// panics; flooring keeps degenerate inputs representable (a huge, possibly
/// wrong-signed quotient) so the invariant checks can flag them instead.
/// This is an availability guard, not a modelling tolerance.
pub const EPSILON_FLOOR: Decimal = dec!(0.000000001);

/// Clamp a divisor away from zero, preserving its sign.
pub(crate) fn floor_to_epsilon(value: Decimal) -> Decimal {
    if value.abs() >= EPSILON_FLOOR {
        value
    } else if value < Decimal::ZERO {
        -EPSILON_FLOOR
    } else {
        EPSILON_FLOOR
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_preserves_ordinary_values() {
        assert_eq!(floor_to_epsilon(dec!(0.05)), dec!(0.05));
        assert_eq!(floor_to_epsilon(dec!(-0.05)), dec!(-0.05));
    }

    #[test]
    fn test_floor_clamps_near_zero() {
        assert_eq!(floor_to_epsilon(Decimal::ZERO), EPSILON_FLOOR);
        assert_eq!(floor_to_epsilon(dec!(0.0000000000001)), EPSILON_FLOOR);
        assert_eq!(floor_to_epsilon(dec!(-0.0000000000001)), -EPSILON_FLOOR);
    }
}
