use rust_decimal::Decimal;

use crate::assumptions::{Assumptions, CostOfEquityMethod};
use crate::types::Rate;

/// Cost of equity under the configured method.
///
/// CAPM: Ke = rf + beta * ERP. Manual mode echoes the supplied value.
pub fn cost_of_equity(assumptions: &Assumptions) -> Rate {
    match &assumptions.cost_of_equity {
        CostOfEquityMethod::Capm { rf, beta, erp } => *rf + *beta * *erp,
        CostOfEquityMethod::Manual { ke } => *ke,
    }
}

/// Weighted average cost of capital.
///
/// WACC = wd * kd * (1 - t) + we * Ke.
///
/// Pure in its inputs: weights and rates are used exactly as supplied,
/// including zero or negative values. Whether wd + we describes a complete
/// capital structure is the caller's concern.
pub fn compute_wacc(assumptions: &Assumptions) -> Rate {
    let ke = cost_of_equity(assumptions);
    let kd_after_tax = assumptions.kd * (Decimal::ONE - assumptions.tax_rate);
    assumptions.wd * kd_after_tax + assumptions.we * ke
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{ExitMetric, ReinvestmentMethod, TerminalMethod};
    use rust_decimal_macros::dec;

    fn sample_assumptions(coe: CostOfEquityMethod) -> Assumptions {
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
            cost_of_equity: coe,
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
    fn test_manual_ke_wacc() {
        let a = sample_assumptions(CostOfEquityMethod::Manual { ke: dec!(0.10) });
        // 0.3 * 0.05 * 0.75 + 0.7 * 0.10 = 0.01125 + 0.07
        assert_eq!(compute_wacc(&a), dec!(0.08125));
    }

    #[test]
    fn test_capm_cost_of_equity() {
        let a = sample_assumptions(CostOfEquityMethod::Capm {
            rf: dec!(0.042),
            beta: dec!(1.10),
            erp: dec!(0.055),
        });
        // Ke = 0.042 + 1.10 * 0.055 = 0.1025
        assert_eq!(cost_of_equity(&a), dec!(0.1025));
    }

    #[test]
    fn test_capm_wacc_reference() {
        // US industrial reference: Rf=4.2%, ERP=5.5%, beta=1.10, Kd=5.5%,
        // t=21%, 30/70 debt/equity => WACC ~8.5%
        let mut a = sample_assumptions(CostOfEquityMethod::Capm {
            rf: dec!(0.042),
            beta: dec!(1.10),
            erp: dec!(0.055),
        });
        a.kd = dec!(0.055);
        a.tax_rate = dec!(0.21);
        let wacc = compute_wacc(&a);
        assert!(
            (wacc - dec!(0.084785)).abs() < dec!(0.000001),
            "expected ~0.084785, got {wacc}"
        );
    }

    #[test]
    fn test_zero_debt_weight_collapses_to_ke() {
        let mut a = sample_assumptions(CostOfEquityMethod::Manual { ke: dec!(0.09) });
        a.wd = Decimal::ZERO;
        a.we = Decimal::ONE;
        assert_eq!(compute_wacc(&a), dec!(0.09));
    }

    #[test]
    fn test_negative_weights_pass_through() {
        // The function does not police capital-structure completeness
        let mut a = sample_assumptions(CostOfEquityMethod::Manual { ke: dec!(0.10) });
        a.wd = dec!(-0.1);
        a.we = dec!(1.1);
        let wacc = compute_wacc(&a);
        assert_eq!(wacc, dec!(-0.1) * dec!(0.05) * dec!(0.75) + dec!(1.1) * dec!(0.10));
    }
}
