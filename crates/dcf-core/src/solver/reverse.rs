use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::{Assumptions, CostOfEquityMethod, TerminalMethod};
use crate::error::DcfError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::valuation::equity::run_valuation;
use crate::valuation::projection::project;
use crate::DcfResult;

/// Default width tolerance for the bisection interval.
const DEFAULT_TOLERANCE: Decimal = dec!(0.000001);

/// Default bisection iteration cap.
const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Assumption the reverse solver varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveTarget {
    /// Terminal (perpetuity) growth rate
    TerminalGrowth,
    /// Cost of equity, applied as a manual override
    CostOfEquity,
    /// Terminal EBIT margin
    TerminalMargin,
}

impl SolveTarget {
    /// Bounded search interval for this assumption.
    fn bounds(self) -> (Decimal, Decimal) {
        match self {
            SolveTarget::TerminalGrowth => (dec!(-0.05), dec!(0.20)),
            SolveTarget::CostOfEquity => (dec!(0.01), dec!(0.30)),
            SolveTarget::TerminalMargin => (dec!(0.01), dec!(0.50)),
        }
    }

    /// Whether per-share value rises as this assumption rises. Growth and
    /// margin add value; a higher discount rate removes it.
    fn value_increases(self) -> bool {
        !matches!(self, SolveTarget::CostOfEquity)
    }
}

/// Input for a reverse solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseSolveInput {
    pub target: SolveTarget,
    /// Per-share price the solved assumption must reproduce
    pub target_price: Money,
    /// Interval-width tolerance (default 1e-6)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Decimal>,
    /// Iteration cap (default 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
}

/// Result of a reverse solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOutput {
    pub target: SolveTarget,
    /// Midpoint of the final search interval
    pub implied_value: Decimal,
    pub target_price: Money,
    /// Per-share value under the unmodified assumptions
    pub baseline_per_share: Money,
    /// Per-share value with the implied assumption applied
    pub solved_per_share: Money,
    pub iterations: u32,
    /// False when the iteration cap was hit before the interval narrowed
    /// below tolerance; the midpoint is then best-effort
    pub converged: bool,
}

/// Bisection-solve for the assumption value that reproduces `target_price`.
///
/// The search interval and narrowing direction are fixed per target variable.
/// Pipeline failures at a probe point surface as `UnableToSolve`, never as a
/// raw numeric error.
pub fn solve_implied(
    assumptions: &Assumptions,
    growth_path: &[Rate],
    input: &ReverseSolveInput,
) -> DcfResult<ComputationOutput<SolveOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let tolerance = input.tolerance.unwrap_or(DEFAULT_TOLERANCE);
    if tolerance <= Decimal::ZERO {
        return Err(DcfError::InvalidInput {
            field: "tolerance".into(),
            reason: "Tolerance must be positive".into(),
        });
    }
    let max_iterations = input.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);

    let baseline_rows = project(assumptions, growth_path)
        .map_err(|e| DcfError::UnableToSolve(e.to_string()))?;
    let baseline = run_valuation(assumptions, &baseline_rows)
        .map_err(|e| DcfError::UnableToSolve(e.to_string()))?;

    let (mut lo, mut hi) = input.target.bounds();
    let rising = input.target.value_increases();

    let mut iterations = 0;
    while hi - lo > tolerance && iterations < max_iterations {
        let mid = (lo + hi) / dec!(2);
        let per_share = per_share_at(input.target, assumptions, growth_path, mid)?;
        let move_up = if rising {
            per_share < input.target_price
        } else {
            per_share > input.target_price
        };
        if move_up {
            lo = mid;
        } else {
            hi = mid;
        }
        iterations += 1;
    }

    let converged = hi - lo <= tolerance;
    let implied_value = (lo + hi) / dec!(2);
    let solved_per_share = per_share_at(input.target, assumptions, growth_path, implied_value)?;

    if !converged {
        warnings.push(format!(
            "Iteration cap of {max_iterations} reached with interval width {}; implied value is best-effort",
            hi - lo
        ));
    }

    let output = SolveOutput {
        target: input.target,
        implied_value,
        target_price: input.target_price,
        baseline_per_share: baseline.per_share,
        solved_per_share,
        iterations,
        converged,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Bisection reverse solve",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Target price implied by a desired margin of safety. No search involved.
pub fn target_price_for_margin_of_safety(price: Money, margin_of_safety: Rate) -> Money {
    price * (Decimal::ONE + margin_of_safety)
}

/// Re-run the full pipeline with one assumption replaced.
fn per_share_at(
    target: SolveTarget,
    assumptions: &Assumptions,
    growth_path: &[Rate],
    value: Decimal,
) -> DcfResult<Money> {
    let candidate = substitute(target, assumptions, value)?;
    let rows =
        project(&candidate, growth_path).map_err(|e| DcfError::UnableToSolve(e.to_string()))?;
    let valuation =
        run_valuation(&candidate, &rows).map_err(|e| DcfError::UnableToSolve(e.to_string()))?;
    Ok(valuation.per_share)
}

/// New assumptions record with the target variable set to `value`.
fn substitute(
    target: SolveTarget,
    assumptions: &Assumptions,
    value: Decimal,
) -> DcfResult<Assumptions> {
    let mut candidate = assumptions.clone();
    match target {
        SolveTarget::TerminalGrowth => match &mut candidate.terminal {
            TerminalMethod::Gordon { growth } => *growth = value,
            TerminalMethod::ExitMultiple { .. } => {
                return Err(DcfError::UnableToSolve(
                    "terminal growth is not a lever under an exit-multiple terminal value".into(),
                ));
            }
        },
        SolveTarget::CostOfEquity => {
            candidate.cost_of_equity = CostOfEquityMethod::Manual { ke: value };
        }
        SolveTarget::TerminalMargin => {
            candidate.ebit_margin_t = value;
        }
    }
    Ok(candidate)
}
