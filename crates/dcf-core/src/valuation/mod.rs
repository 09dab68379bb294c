pub mod equity;
pub mod projection;
pub mod terminal;
pub mod wacc;
