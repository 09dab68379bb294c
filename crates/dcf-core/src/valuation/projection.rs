use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, ExitMetric, ReinvestmentMethod};
use crate::error::DcfError;
use crate::types::{Money, Rate};
use crate::DcfResult;

/// One projected fiscal year. Rows are produced fresh on every call and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// 1-indexed projection year
    pub year: u32,
    pub revenue: Money,
    /// Interpolated EBIT margin for this year
    pub ebit_margin: Rate,
    pub ebit: Money,
    pub nopat: Money,
    pub depreciation: Money,
    pub capex: Money,
    /// Change in net working capital vs the prior year
    pub nwc_change: Money,
    /// Floored at zero; negative reinvestment is never credited as inflow
    pub reinvestment: Money,
    /// Free cash flow to the firm: NOPAT - reinvestment
    pub fcff: Money,
    /// EBIT or EBITDA per `Assumptions::exit_metric`
    pub exit_metric: Money,
}

/// Project the year-by-year operating schedule.
///
/// The growth path is clamped, not extrapolated: when it is shorter than the
/// horizon, its last entry repeats. The EBIT margin glides linearly from
/// `ebit_margin0` to `ebit_margin_t` over `growth_years` and stays flat after.
pub fn project(assumptions: &Assumptions, growth_path: &[Rate]) -> DcfResult<Vec<ProjectionRow>> {
    validate_projection_input(assumptions, growth_path)?;

    let mut rows = Vec::with_capacity(assumptions.years as usize);
    let mut prev_revenue = assumptions.rev0;

    for year in 1..=assumptions.years {
        let idx = ((year - 1) as usize).min(growth_path.len() - 1);
        let growth = growth_path[idx];
        let revenue = prev_revenue * (Decimal::ONE + growth);

        let ebit_margin = glide_margin(assumptions, year);
        let ebit = revenue * ebit_margin;
        let nopat = ebit * (Decimal::ONE - assumptions.tax_rate);

        let delta_revenue = revenue - prev_revenue;
        let (depreciation, capex, nwc_change, reinvestment) = match &assumptions.reinvestment {
            ReinvestmentMethod::Components {
                dep_pct_sales,
                capex_pct_sales,
                nwc_pct_sales,
            } => {
                let depreciation = revenue * *dep_pct_sales;
                let capex = revenue * *capex_pct_sales;
                let nwc_change = delta_revenue * *nwc_pct_sales;
                let reinvestment = (capex - depreciation + nwc_change).max(Decimal::ZERO);
                (depreciation, capex, nwc_change, reinvestment)
            }
            ReinvestmentMethod::SalesToCapital {
                sales_to_capital,
                dep_pct_sales,
                nwc_pct_sales,
            } => {
                let reinvestment = (delta_revenue / *sales_to_capital).max(Decimal::ZERO);
                let nwc_change = delta_revenue * *nwc_pct_sales;
                let depreciation = revenue * *dep_pct_sales;
                // Display-only back-solve; FCFF uses the reinvestment total
                let capex = reinvestment - nwc_change + depreciation;
                (depreciation, capex, nwc_change, reinvestment)
            }
        };

        let fcff = nopat - reinvestment;
        let exit_metric = match assumptions.exit_metric {
            ExitMetric::Ebit => ebit,
            ExitMetric::Ebitda => ebit + depreciation,
        };

        rows.push(ProjectionRow {
            year,
            revenue,
            ebit_margin,
            ebit,
            nopat,
            depreciation,
            capex,
            nwc_change,
            reinvestment,
            fcff,
            exit_metric,
        });

        prev_revenue = revenue;
    }

    Ok(rows)
}

/// Linear margin glide: t = (year - 1) / (growth_years - 1), clamped to [0, 1].
/// A one-year glide is already at the terminal margin.
fn glide_margin(assumptions: &Assumptions, year: u32) -> Rate {
    let t = if assumptions.growth_years <= 1 {
        Decimal::ONE
    } else {
        let span = Decimal::from(assumptions.growth_years - 1);
        (Decimal::from(year - 1) / span).clamp(Decimal::ZERO, Decimal::ONE)
    };
    assumptions.ebit_margin0 + (assumptions.ebit_margin_t - assumptions.ebit_margin0) * t
}

fn validate_projection_input(assumptions: &Assumptions, growth_path: &[Rate]) -> DcfResult<()> {
    if assumptions.years == 0 {
        return Err(DcfError::InvalidInput {
            field: "years".into(),
            reason: "Projection horizon must be at least 1 year".into(),
        });
    }
    if growth_path.is_empty() {
        return Err(DcfError::InsufficientData("Growth path is empty".into()));
    }
    if assumptions.rev0 <= Decimal::ZERO {
        return Err(DcfError::InvalidInput {
            field: "rev0".into(),
            reason: "Base revenue must be positive".into(),
        });
    }
    if let ReinvestmentMethod::SalesToCapital {
        sales_to_capital, ..
    } = &assumptions.reinvestment
    {
        if sales_to_capital.is_zero() {
            return Err(DcfError::InvalidInput {
                field: "sales_to_capital".into(),
                reason: "Sales-to-capital ratio must be non-zero".into(),
            });
        }
    }
    Ok(())
}
