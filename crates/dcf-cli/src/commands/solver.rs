use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use dcf_core::solver::reverse::{
    solve_implied, target_price_for_margin_of_safety, ReverseSolveInput, SolveTarget,
};

use super::load_request;

/// CLI spelling of the solvable assumption.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SolveFor {
    /// Terminal (perpetuity) growth rate
    Growth,
    /// Cost of equity
    CostOfEquity,
    /// Terminal EBIT margin
    TerminalMargin,
}

impl From<SolveFor> for SolveTarget {
    fn from(value: SolveFor) -> Self {
        match value {
            SolveFor::Growth => SolveTarget::TerminalGrowth,
            SolveFor::CostOfEquity => SolveTarget::CostOfEquity,
            SolveFor::TerminalMargin => SolveTarget::TerminalMargin,
        }
    }
}

/// Arguments for the reverse solve
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SolveArgs {
    /// Path to a JSON valuation request (assumptions + growth inputs)
    #[arg(long)]
    pub input: Option<String>,

    /// Assumption to solve for
    #[arg(long, value_enum, default_value = "growth")]
    pub solve_for: SolveFor,

    /// Per-share price the solved assumption must reproduce
    #[arg(long)]
    pub target_price: Option<Decimal>,

    /// Derive the target price from a desired margin of safety instead
    #[arg(long)]
    pub margin_of_safety: Option<Decimal>,

    /// Bisection interval tolerance (default 1e-6)
    #[arg(long)]
    pub tolerance: Option<Decimal>,

    /// Bisection iteration cap (default 100)
    #[arg(long)]
    pub max_iterations: Option<u32>,
}

pub fn run_solve(args: SolveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.input)?;
    let path = request.resolve_growth_path()?;

    let target_price = match (args.target_price, args.margin_of_safety) {
        (Some(price), _) => price,
        (None, Some(mos)) => target_price_for_margin_of_safety(request.assumptions.price, mos),
        (None, None) => return Err("provide --target-price or --margin-of-safety".into()),
    };

    let solve_input = ReverseSolveInput {
        target: args.solve_for.into(),
        target_price,
        tolerance: args.tolerance,
        max_iterations: args.max_iterations,
    };

    let result = solve_implied(&request.assumptions, &path, &solve_input)?;
    Ok(serde_json::to_value(result)?)
}
