use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use dcf_core::assumptions::{
    Assumptions, CostOfEquityMethod, ExitMetric, ReinvestmentMethod, TerminalMethod,
};
use dcf_core::valuation::equity::value_equity;
use dcf_core::valuation::projection::project;
use dcf_core::valuation::wacc::{compute_wacc, cost_of_equity};

use super::load_request;
use crate::input;

/// Arguments for WACC calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct WaccArgs {
    /// Path to a JSON assumptions record (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Manually supplied cost of equity (alternative to the CAPM flags)
    #[arg(long)]
    pub ke: Option<Decimal>,

    /// Risk-free rate for CAPM (e.g. 0.042 for 4.2%)
    #[arg(long)]
    pub risk_free_rate: Option<Decimal>,

    /// Levered beta for CAPM
    #[arg(long)]
    pub beta: Option<Decimal>,

    /// Equity risk premium for CAPM (e.g. 0.055 for 5.5%)
    #[arg(long, alias = "erp")]
    pub equity_risk_premium: Option<Decimal>,

    /// Debt weight in the capital structure
    #[arg(long)]
    pub debt_weight: Option<Decimal>,

    /// Equity weight in the capital structure
    #[arg(long)]
    pub equity_weight: Option<Decimal>,

    /// Pre-tax cost of debt
    #[arg(long)]
    pub cost_of_debt: Option<Decimal>,

    /// Marginal corporate tax rate
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
}

/// Arguments for the projection schedule
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a JSON valuation request (assumptions + growth inputs)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the full valuation
#[derive(Args)]
pub struct ValueArgs {
    /// Path to a JSON valuation request (assumptions + growth inputs)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_wacc(args: WaccArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions: Assumptions = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        assumptions_from_flags(&args)?
    };

    let wacc = compute_wacc(&assumptions);
    let ke = cost_of_equity(&assumptions);
    Ok(serde_json::json!({
        "wacc": wacc.to_string(),
        "cost_of_equity": ke.to_string(),
    }))
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.input)?;
    let path = request.resolve_growth_path()?;
    let rows = project(&request.assumptions, &path)?;
    Ok(serde_json::to_value(rows)?)
}

pub fn run_value(args: ValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.input)?;
    let path = request.resolve_growth_path()?;
    let rows = project(&request.assumptions, &path)?;
    let result = value_equity(&request.assumptions, &rows)?;
    Ok(serde_json::to_value(result)?)
}

/// Build a rate-only assumptions record from CLI flags. The projection and
/// bridge fields never reach the WACC formula, so neutral fillers are fine.
fn assumptions_from_flags(args: &WaccArgs) -> Result<Assumptions, Box<dyn std::error::Error>> {
    let coe = if let Some(ke) = args.ke {
        CostOfEquityMethod::Manual { ke }
    } else {
        CostOfEquityMethod::Capm {
            rf: args
                .risk_free_rate
                .ok_or("--ke or --risk-free-rate is required (or provide --input)")?,
            beta: args.beta.unwrap_or(dec!(1.0)),
            erp: args
                .equity_risk_premium
                .ok_or("--equity-risk-premium is required with --risk-free-rate")?,
        }
    };

    Ok(Assumptions {
        rev0: Decimal::ONE,
        years: 1,
        growth_years: 1,
        ebit_margin0: Decimal::ZERO,
        ebit_margin_t: Decimal::ZERO,
        tax_rate: args
            .tax_rate
            .ok_or("--tax-rate is required (or provide --input)")?,
        reinvestment: ReinvestmentMethod::Components {
            dep_pct_sales: Decimal::ZERO,
            capex_pct_sales: Decimal::ZERO,
            nwc_pct_sales: Decimal::ZERO,
        },
        exit_metric: ExitMetric::Ebitda,
        cost_of_equity: coe,
        wd: args
            .debt_weight
            .ok_or("--debt-weight is required (or provide --input)")?,
        we: args
            .equity_weight
            .ok_or("--equity-weight is required (or provide --input)")?,
        kd: args
            .cost_of_debt
            .ok_or("--cost-of-debt is required (or provide --input)")?,
        terminal: TerminalMethod::Gordon {
            growth: Decimal::ZERO,
        },
        net_debt: Decimal::ZERO,
        minority_interest: Decimal::ZERO,
        cash_adjust: Decimal::ZERO,
        shares: Decimal::ONE,
        price: Decimal::ONE,
    })
}
