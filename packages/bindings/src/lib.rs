use napi::Result as NapiResult;
use napi_derive::napi;

use rust_decimal::Decimal;

use dcf_core::assumptions::Assumptions;
use dcf_core::checks::invariants::run_invariant_checks;
use dcf_core::solver::reverse::{solve_implied, ReverseSolveInput};
use dcf_core::types::Rate;
use dcf_core::valuation::equity::value_equity;
use dcf_core::valuation::projection::project;
use dcf_core::valuation::wacc::{compute_wacc, cost_of_equity};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_assumptions(json: &str) -> NapiResult<Assumptions> {
    serde_json::from_str(json).map_err(to_napi_error)
}

fn parse_growth_path(json: &str) -> NapiResult<Vec<Rate>> {
    serde_json::from_str(json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// WACC
// ---------------------------------------------------------------------------

#[napi]
pub fn wacc(assumptions_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&assumptions_json)?;
    let output = serde_json::json!({
        "wacc": compute_wacc(&assumptions).to_string(),
        "cost_of_equity": cost_of_equity(&assumptions).to_string(),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection and valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn project_cash_flows(assumptions_json: String, growth_path_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&assumptions_json)?;
    let growth_path = parse_growth_path(&growth_path_json)?;
    let rows = project(&assumptions, &growth_path).map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

#[napi]
pub fn value_equity_dcf(assumptions_json: String, growth_path_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&assumptions_json)?;
    let growth_path = parse_growth_path(&growth_path_json)?;
    let rows = project(&assumptions, &growth_path).map_err(to_napi_error)?;
    let output = value_equity(&assumptions, &rows).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reverse solver
// ---------------------------------------------------------------------------

#[napi]
pub fn solve_implied_assumption(
    assumptions_json: String,
    growth_path_json: String,
    solve_json: String,
) -> NapiResult<String> {
    let assumptions = parse_assumptions(&assumptions_json)?;
    let growth_path = parse_growth_path(&growth_path_json)?;
    let solve_input: ReverseSolveInput =
        serde_json::from_str(&solve_json).map_err(to_napi_error)?;
    let output =
        solve_implied(&assumptions, &growth_path, &solve_input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Invariant diagnostics
// ---------------------------------------------------------------------------

#[napi]
pub fn invariant_report(assumptions_json: String, growth_path_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&assumptions_json)?;
    let growth_path = parse_growth_path(&growth_path_json)?;
    let rows = project(&assumptions, &growth_path).map_err(to_napi_error)?;
    let valuation = value_equity(&assumptions, &rows)
        .map_err(to_napi_error)?
        .result;
    let checks = run_invariant_checks(&assumptions, &rows, &valuation);
    serde_json::to_string(&checks).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Growth path builder
// ---------------------------------------------------------------------------

#[napi]
pub fn growth_vector(start_rate: String, years: u32, fade_after_year: u32) -> NapiResult<String> {
    let rate: Decimal = start_rate.parse().map_err(to_napi_error)?;
    let path = dcf_core::growth::growth_vector(rate, years, fade_after_year);
    serde_json::to_string(&path).map_err(to_napi_error)
}
