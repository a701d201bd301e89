pub mod cost;
pub mod linreg;

pub use cost::{evaluate, CostGradient};
pub use linreg::LinReg;
