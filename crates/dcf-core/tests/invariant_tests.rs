use dcf_core::assumptions::{
    Assumptions, CostOfEquityMethod, ExitMetric, ReinvestmentMethod, TerminalMethod,
};
use dcf_core::checks::invariants::{run_invariant_checks, InvariantCheck};
use dcf_core::growth::growth_vector;
use dcf_core::valuation::equity::{value_equity, Valuation};
use dcf_core::valuation::projection::{project, ProjectionRow};
use rust_decimal::Decimal;
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

fn evaluate(a: &Assumptions) -> (Vec<ProjectionRow>, Valuation) {
    let path = growth_vector(dec!(0.08), a.years, a.years);
    let rows = project(a, &path).unwrap();
    let valuation = value_equity(a, &rows).unwrap().result;
    (rows, valuation)
}

fn find<'a>(checks: &'a [InvariantCheck], name: &str) -> &'a InvariantCheck {
    checks
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("missing check {name}"))
}

#[test]
fn test_base_scenario_report_is_all_green() {
    let a = sample_assumptions();
    let (rows, valuation) = evaluate(&a);
    let checks = run_invariant_checks(&a, &rows, &valuation);

    assert!(!checks.is_empty());
    for check in &checks {
        assert!(check.pass, "{} failed: {:?}", check.name, check.detail);
    }
}

#[test]
fn test_report_is_serializable_for_ui_badges() {
    let a = sample_assumptions();
    let (rows, valuation) = evaluate(&a);
    let checks = run_invariant_checks(&a, &rows, &valuation);

    let json = serde_json::to_value(&checks).unwrap();
    assert!(json[0].get("name").is_some());
    assert!(json[0].get("pass").is_some());
}

#[test]
fn test_rf_perturbation_moves_per_share_monotonically() {
    let mut a = sample_assumptions();
    a.cost_of_equity = CostOfEquityMethod::Capm {
        rf: dec!(0.042),
        beta: dec!(1.10),
        erp: dec!(0.055),
    };
    let (_, base) = evaluate(&a);

    let mut up = a.clone();
    up.cost_of_equity = CostOfEquityMethod::Capm {
        rf: dec!(0.047),
        beta: dec!(1.10),
        erp: dec!(0.055),
    };
    let (_, vu) = evaluate(&up);

    let mut down = a.clone();
    down.cost_of_equity = CostOfEquityMethod::Capm {
        rf: dec!(0.037),
        beta: dec!(1.10),
        erp: dec!(0.055),
    };
    let (_, vd) = evaluate(&down);

    assert!(vu.per_share < base.per_share);
    assert!(vd.per_share > base.per_share);
}

#[test]
fn test_degenerate_gordon_flags_constraint_and_nothing_throws() {
    let mut a = sample_assumptions();
    a.terminal = TerminalMethod::Gordon { growth: dec!(0.12) };
    let (rows, valuation) = evaluate(&a);
    let checks = run_invariant_checks(&a, &rows, &valuation);

    assert!(!find(&checks, "gordon_growth_constraint").pass);
    assert!(find(&checks, "ev_identity").pass);
    assert!(find(&checks, "fcff_finite").pass);
}

#[test]
fn test_net_cash_company_gets_bridge_check() {
    let mut a = sample_assumptions();
    a.net_debt = dec!(-250);
    let (rows, valuation) = evaluate(&a);
    let checks = run_invariant_checks(&a, &rows, &valuation);

    assert!(find(&checks, "net_cash_bridge").pass);
}

#[test]
fn test_positive_net_debt_omits_bridge_check() {
    let a = sample_assumptions();
    let (rows, valuation) = evaluate(&a);
    let checks = run_invariant_checks(&a, &rows, &valuation);

    assert!(checks.iter().all(|c| c.name != "net_cash_bridge"));
}

#[test]
fn test_parity_check_present_only_with_valid_gordon_spread() {
    let a = sample_assumptions();
    let (rows, valuation) = evaluate(&a);
    let checks = run_invariant_checks(&a, &rows, &valuation);
    assert!(find(&checks, "terminal_method_parity").pass);

    // Zero terminal growth: parity precondition (positive growth) not met
    let mut flat = sample_assumptions();
    flat.terminal = TerminalMethod::Gordon {
        growth: Decimal::ZERO,
    };
    let (rows, valuation) = evaluate(&flat);
    let checks = run_invariant_checks(&flat, &rows, &valuation);
    assert!(checks.iter().all(|c| c.name != "terminal_method_parity"));
}

#[test]
fn test_checks_are_independent_of_each_other() {
    // Degenerate spread breaks the Gordon constraint; every other check in
    // the report still gets evaluated rather than short-circuiting.
    let mut a = sample_assumptions();
    a.terminal = TerminalMethod::Gordon { growth: dec!(0.12) };
    let (rows, valuation) = evaluate(&a);
    let checks = run_invariant_checks(&a, &rows, &valuation);

    let failed: Vec<_> = checks.iter().filter(|c| !c.pass).collect();
    let passed: Vec<_> = checks.iter().filter(|c| c.pass).collect();
    assert!(!failed.is_empty());
    assert!(passed.len() >= 4);
}
