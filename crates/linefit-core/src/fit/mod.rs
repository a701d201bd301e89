pub mod fiterror;
pub mod trainer;

pub use fiterror::{FitError, FitResult};
pub use trainer::{fit, TrainingConfig};
