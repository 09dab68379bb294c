use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, ExitMetric, TerminalMethod};
use crate::error::DcfError;
use crate::types::{floor_to_epsilon, Money, Rate};
use crate::valuation::projection::ProjectionRow;
use crate::DcfResult;

/// Terminal value with the basis it was computed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalValue {
    pub value: Money,
    /// Method slug: "gordon" or "exit_multiple"
    pub basis: String,
    /// Human-readable description of the basis
    pub label: String,
}

/// Terminal value under the configured methodology.
///
/// Gordon growth computes whatever the formula yields, including a negative
/// or huge value when the discount rate does not exceed terminal growth; the
/// denominator is only floored when within epsilon of zero. Callers that
/// depend on the Gordon constraint run the invariant checks.
pub fn terminal_value(
    assumptions: &Assumptions,
    rows: &[ProjectionRow],
    rate: Rate,
) -> DcfResult<TerminalValue> {
    let last = rows
        .last()
        .ok_or_else(|| DcfError::InsufficientData("No projection rows".into()))?;

    match &assumptions.terminal {
        TerminalMethod::Gordon { growth } => {
            let spread = floor_to_epsilon(rate - *growth);
            let value = last.fcff * (Decimal::ONE + *growth) / spread;
            Ok(TerminalValue {
                value,
                basis: "gordon".into(),
                label: format!("Gordon growth at {growth}"),
            })
        }
        TerminalMethod::ExitMultiple { multiple } => {
            let value = last.exit_metric * *multiple;
            let metric = match assumptions.exit_metric {
                ExitMetric::Ebit => "EBIT",
                ExitMetric::Ebitda => "EBITDA",
            };
            Ok(TerminalValue {
                value,
                basis: "exit_multiple".into(),
                label: format!("{multiple}x terminal {metric}"),
            })
        }
    }
}
