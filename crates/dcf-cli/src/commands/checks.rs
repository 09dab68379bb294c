use clap::Args;
use serde_json::Value;

use dcf_core::checks::invariants::run_invariant_checks;
use dcf_core::valuation::equity::value_equity;
use dcf_core::valuation::projection::project;

use super::load_request;

/// Arguments for the invariant diagnostic report
#[derive(Args)]
pub struct ChecksArgs {
    /// Path to a JSON valuation request (assumptions + growth inputs)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_checks(args: ChecksArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.input)?;
    let path = request.resolve_growth_path()?;

    let rows = project(&request.assumptions, &path)?;
    let valuation = value_equity(&request.assumptions, &rows)?.result;
    let checks = run_invariant_checks(&request.assumptions, &rows, &valuation);

    Ok(serde_json::to_value(checks)?)
}
