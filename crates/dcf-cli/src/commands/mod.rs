pub mod checks;
pub mod solver;
pub mod valuation;

use serde::Deserialize;

use dcf_core::assumptions::Assumptions;
use dcf_core::growth::growth_vector;
use dcf_core::types::Rate;

/// JSON input document shared by the projection-based subcommands.
///
/// Either an explicit `growth_path` or a `growth_rate` (with optional
/// `fade_after_year`) must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct ValuationRequest {
    pub assumptions: Assumptions,
    /// Explicit per-year growth path; takes precedence when present
    #[serde(default)]
    pub growth_path: Option<Vec<Rate>>,
    /// Start rate for a generated flat-then-fade path
    #[serde(default)]
    pub growth_rate: Option<Rate>,
    /// Last year the generated path holds flat (defaults to the full horizon)
    #[serde(default)]
    pub fade_after_year: Option<u32>,
}

impl ValuationRequest {
    pub fn resolve_growth_path(&self) -> Result<Vec<Rate>, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.growth_path {
            return Ok(path.clone());
        }
        let rate = self
            .growth_rate
            .ok_or("input must provide either growth_path or growth_rate")?;
        let fade = self.fade_after_year.unwrap_or(self.assumptions.years);
        Ok(growth_vector(rate, self.assumptions.years, fade))
    }
}

/// Resolve a request document from `--input` or piped stdin.
pub fn load_request(path: &Option<String>) -> Result<ValuationRequest, Box<dyn std::error::Error>> {
    if let Some(ref file) = path {
        return crate::input::file::read_json(file);
    }
    if let Some(data) = crate::input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Err("provide --input <file> or pipe a JSON request on stdin".into())
}
