use crate::dataset::Dataset;
use crate::fit::{FitError, FitResult};
use crate::stats::LinReg;

/// Mean squared error of a model and its partial derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostGradient {
    pub cost: f64,
    /// d(cost)/d(slope)
    pub grad_slope: f64,
    /// d(cost)/d(intercept)
    pub grad_intercept: f64,
}

/// With r_i = y_i - (m * x_i + c):
/// cost = 1/n * sum(r_i^2), dm = -2/n * sum(x_i * r_i), dc = -2/n * sum(r_i)
pub fn evaluate(dataset: &Dataset, model: LinReg) -> FitResult<CostGradient> {
    if dataset.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    let n = dataset.len() as f64;

    let mut cost = 0.0;
    let mut dm = 0.0;
    let mut dc = 0.0;
    for obs in dataset {
        let residual = obs.y - model.calculate(obs.x);
        dm += -obs.x * residual;
        dc += -residual;
        cost += residual * residual;
    }

    Ok(CostGradient { cost: cost / n, grad_slope: 2.0 / n * dm, grad_intercept: 2.0 / n * dc })
}
