pub mod assumptions;
pub mod checks;
pub mod error;
pub mod growth;
pub mod solver;
pub mod types;
pub mod valuation;

pub use error::DcfError;
pub use types::*;

/// Standard result type for all valuation operations
pub type DcfResult<T> = Result<T, DcfError>;
