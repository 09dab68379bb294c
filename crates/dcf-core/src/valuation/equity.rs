use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::{Assumptions, TerminalMethod};
use crate::error::DcfError;
use crate::types::{floor_to_epsilon, with_metadata, ComputationOutput, Money, Rate};
use crate::valuation::projection::ProjectionRow;
use crate::valuation::terminal::terminal_value;
use crate::valuation::wacc::compute_wacc;
use crate::DcfResult;

/// Share of enterprise value above which the terminal value draws a warning.
const TV_DOMINANCE_THRESHOLD: Decimal = dec!(0.75);

/// Gordon spread below which the terminal value is warned as unstable.
const THIN_SPREAD_THRESHOLD: Decimal = dec!(0.01);

/// Present-value breakdown and equity bridge for one set of assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Valuation {
    /// WACC used for discounting
    pub discount_rate: Rate,
    /// Sum of discounted explicit-period FCFFs
    pub pv_fcff: Money,
    /// Discounted terminal value
    pub pv_terminal: Money,
    /// Undiscounted terminal value
    pub terminal_value: Money,
    pub terminal_basis: String,
    pub terminal_label: String,
    /// Enterprise value = PV(FCFF) + PV(TV)
    pub enterprise_value: Money,
    /// EV - net debt - minority interest + cash adjustment
    pub equity_value: Money,
    pub per_share: Money,
    /// (per_share - price) / price
    pub margin_of_safety: Rate,
}

/// Discount the projected rows and terminal value into a full valuation.
pub fn value_equity(
    assumptions: &Assumptions,
    rows: &[ProjectionRow],
) -> DcfResult<ComputationOutput<Valuation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let valuation = run_valuation(assumptions, rows)?;

    if !valuation.enterprise_value.is_zero() {
        let tv_pct = valuation.pv_terminal / valuation.enterprise_value;
        if tv_pct > TV_DOMINANCE_THRESHOLD {
            warnings.push(format!(
                "Terminal value represents {:.1}% of enterprise value; consider extending the explicit forecast period",
                tv_pct * dec!(100)
            ));
        }
    }
    if let TerminalMethod::Gordon { growth } = &assumptions.terminal {
        let spread = valuation.discount_rate - *growth;
        if spread < THIN_SPREAD_THRESHOLD {
            warnings.push(format!(
                "Terminal growth ({growth}) is within 100bp of the discount rate ({}); terminal value is unstable",
                valuation.discount_rate
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "FCFF DCF (WACC-based)",
        assumptions,
        warnings,
        elapsed,
        valuation,
    ))
}

/// Envelope-free pipeline body, shared with the solver and invariant checks.
pub(crate) fn run_valuation(
    assumptions: &Assumptions,
    rows: &[ProjectionRow],
) -> DcfResult<Valuation> {
    if rows.is_empty() {
        return Err(DcfError::InsufficientData("No projection rows".into()));
    }
    if assumptions.shares <= Decimal::ZERO {
        return Err(DcfError::InvalidInput {
            field: "shares".into(),
            reason: "Shares outstanding must be positive".into(),
        });
    }

    let rate = compute_wacc(assumptions);
    if rate <= dec!(-1) {
        return Err(DcfError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    // Running discount factor; after the loop it holds (1 + rate)^n
    let one_plus_rate = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;
    let mut pv_fcff = Decimal::ZERO;
    for row in rows {
        discount *= one_plus_rate;
        pv_fcff += row.fcff / discount;
    }

    let tv = terminal_value(assumptions, rows, rate)?;
    let pv_terminal = tv.value / discount;

    let enterprise_value = pv_fcff + pv_terminal;
    let equity_value = enterprise_value - assumptions.net_debt - assumptions.minority_interest
        + assumptions.cash_adjust;
    let per_share = equity_value / assumptions.shares;
    let margin_of_safety = (per_share - assumptions.price) / floor_to_epsilon(assumptions.price);

    Ok(Valuation {
        discount_rate: rate,
        pv_fcff,
        pv_terminal,
        terminal_value: tv.value,
        terminal_basis: tv.basis,
        terminal_label: tv.label,
        enterprise_value,
        equity_value,
        per_share,
        margin_of_safety,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{CostOfEquityMethod, ExitMetric, ReinvestmentMethod};
    use crate::valuation::projection::project;
    use rust_decimal_macros::dec;

    fn sample_assumptions() -> Assumptions {
        Assumptions {
            rev0: dec!(1000),
            years: 5,
            growth_years: 5,
            ebit_margin0: dec!(0.10),
            ebit_margin_t: dec!(0.15),
            tax_rate: dec!(0.25),
            reinvestment: ReinvestmentMethod::Components {
                dep_pct_sales: dec!(0.05),
                capex_pct_sales: dec!(0.06),
                nwc_pct_sales: dec!(0.02),
            },
            exit_metric: ExitMetric::Ebitda,
            cost_of_equity: CostOfEquityMethod::Manual { ke: dec!(0.10) },
            wd: dec!(0.3),
            we: dec!(0.7),
            kd: dec!(0.05),
            terminal: TerminalMethod::Gordon { growth: dec!(0.025) },
            net_debt: dec!(100),
            minority_interest: Decimal::ZERO,
            cash_adjust: dec!(50),
            shares: dec!(100),
            price: dec!(50),
        }
    }

    #[test]
    fn test_enterprise_value_identity() {
        let a = sample_assumptions();
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        let v = value_equity(&a, &rows).unwrap().result;

        assert_eq!(v.enterprise_value, v.pv_fcff + v.pv_terminal);
        assert!(v.per_share > Decimal::ZERO);
    }

    #[test]
    fn test_discount_rate_comes_from_wacc() {
        let a = sample_assumptions();
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        let v = value_equity(&a, &rows).unwrap().result;
        assert_eq!(v.discount_rate, dec!(0.08125));
    }

    #[test]
    fn test_equity_bridge() {
        let a = sample_assumptions();
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        let v = value_equity(&a, &rows).unwrap().result;

        assert_eq!(v.equity_value, v.enterprise_value - dec!(100) + dec!(50));
        assert_eq!(v.per_share, v.equity_value / dec!(100));
    }

    #[test]
    fn test_margin_of_safety() {
        let a = sample_assumptions();
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        let v = value_equity(&a, &rows).unwrap().result;

        assert_eq!(v.margin_of_safety, (v.per_share - dec!(50)) / dec!(50));
    }

    #[test]
    fn test_identical_inputs_identical_outputs() {
        let a = sample_assumptions();
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        let v1 = value_equity(&a, &rows).unwrap().result;
        let v2 = value_equity(&a, &rows).unwrap().result;

        assert_eq!(v1.per_share, v2.per_share);
        assert_eq!(v1.enterprise_value, v2.enterprise_value);
    }

    #[test]
    fn test_tv_dominance_warning() {
        let a = sample_assumptions();
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        let out = value_equity(&a, &rows).unwrap();

        // Low discount rate and short horizon: terminal value dominates
        let tv_pct = out.result.pv_terminal / out.result.enterprise_value;
        assert!(tv_pct > dec!(0.75));
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("Terminal value represents")));
    }

    #[test]
    fn test_thin_spread_warning() {
        let mut a = sample_assumptions();
        a.terminal = TerminalMethod::Gordon { growth: dec!(0.075) };
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        let out = value_equity(&a, &rows).unwrap();

        assert!(out.warnings.iter().any(|w| w.contains("within 100bp")));
    }

    #[test]
    fn test_non_positive_shares_rejected() {
        let mut a = sample_assumptions();
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        a.shares = Decimal::ZERO;
        assert!(value_equity(&a, &rows).is_err());
    }

    #[test]
    fn test_empty_rows_rejected() {
        let a = sample_assumptions();
        assert!(value_equity(&a, &[]).is_err());
    }

    #[test]
    fn test_degenerate_gordon_still_values() {
        let mut a = sample_assumptions();
        a.terminal = TerminalMethod::Gordon { growth: dec!(0.20) };
        let rows = project(&a, &[dec!(0.08)]).unwrap();

        // Rate (8.125%) below terminal growth: no error, negative TV flows through
        let v = value_equity(&a, &rows).unwrap().result;
        assert!(v.terminal_value < Decimal::ZERO);
    }

    #[test]
    fn test_methodology_string() {
        let a = sample_assumptions();
        let rows = project(&a, &[dec!(0.08)]).unwrap();
        let out = value_equity(&a, &rows).unwrap();
        assert_eq!(out.methodology, "FCFF DCF (WACC-based)");
    }
}
