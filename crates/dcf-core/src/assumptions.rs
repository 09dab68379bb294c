use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Multiple, Rate};

/// How annual reinvestment is derived from the revenue build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReinvestmentMethod {
    /// Depreciation, capex and working capital each as a percentage of sales;
    /// reinvestment = max(0, (capex - depreciation) + delta NWC).
    Components {
        dep_pct_sales: Rate,
        capex_pct_sales: Rate,
        nwc_pct_sales: Rate,
    },
    /// Damodaran-style: reinvestment = max(0, delta revenue / sales-to-capital).
    /// Depreciation and NWC percentages are kept for the display split.
    SalesToCapital {
        sales_to_capital: Decimal,
        dep_pct_sales: Rate,
        nwc_pct_sales: Rate,
    },
}

/// How the cost of equity is sourced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CostOfEquityMethod {
    /// CAPM: Ke = rf + beta * ERP
    Capm { rf: Rate, beta: Decimal, erp: Rate },
    /// Analyst-supplied cost of equity
    Manual { ke: Rate },
}

/// Terminal value methodology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TerminalMethod {
    /// Gordon growth model: TV = FCFF_n * (1 + g) / (rate - g)
    Gordon { growth: Rate },
    /// Exit multiple applied to the final-year exit metric
    ExitMultiple { multiple: Multiple },
}

/// Metric the exit-multiple terminal value applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitMetric {
    Ebit,
    Ebitda,
}

/// Immutable input record for the valuation pipeline.
///
/// Treated strictly as a value type: perturbation (solver probes, invariant
/// re-runs) always clones and adjusts the copy; nothing mutates a record the
/// caller handed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assumptions {
    /// Base (Year 0) revenue
    pub rev0: Money,
    /// Explicit projection horizon in years
    pub years: u32,
    /// Years over which the EBIT margin glides from `ebit_margin0` to
    /// `ebit_margin_t`; flat thereafter
    pub growth_years: u32,
    /// Year-1 EBIT margin
    pub ebit_margin0: Rate,
    /// Terminal EBIT margin
    pub ebit_margin_t: Rate,
    /// Marginal tax rate on operating income
    pub tax_rate: Rate,
    /// Reinvestment derivation
    pub reinvestment: ReinvestmentMethod,
    /// Metric projected on every row for exit-multiple valuation
    pub exit_metric: ExitMetric,
    /// Cost-of-equity derivation
    pub cost_of_equity: CostOfEquityMethod,
    /// Debt weight in the capital structure (market value basis)
    pub wd: Rate,
    /// Equity weight in the capital structure (market value basis)
    pub we: Rate,
    /// Pre-tax cost of debt
    pub kd: Rate,
    /// Terminal value methodology
    pub terminal: TerminalMethod,
    /// Net debt for the equity bridge (debt minus cash; may be negative)
    pub net_debt: Money,
    /// Minority interest subtracted in the equity bridge
    pub minority_interest: Money,
    /// Additional cash adjustment added in the equity bridge
    pub cash_adjust: Money,
    /// Diluted shares outstanding
    pub shares: Decimal,
    /// Current market price per share
    pub price: Money,
}
