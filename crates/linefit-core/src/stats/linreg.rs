use crate::fit::{FitError, FitResult};

use std::fmt;

/// y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinReg {
    pub intercept: f64,
    pub slope: f64,
}

impl fmt::Display for LinReg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "y = {:.6}·x + {:.6}", self.slope, self.intercept)
    }
}

impl Default for LinReg {
    fn default() -> Self {
        Self::new()
    }
}

impl LinReg {
    pub fn new() -> Self {
        Self { intercept: 0., slope: 0. }
    }
    pub fn calculate(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
    pub fn from_val(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// Closed-form least squares solution, used as a reference for the
    /// iterative fit.
    pub fn train(x: &[f64], y: &[f64]) -> FitResult<Self> {
        if x.len() != y.len() {
            return Err(FitError::LengthMismatch { len_x: x.len(), len_y: y.len() });
        }
        if x.is_empty() {
            return Err(FitError::EmptyDataset);
        }

        let avg_x: f64 = x.iter().sum::<f64>() / x.len() as f64;
        let x_differences_to_average: Vec<f64> = x.iter().map(|value| value - avg_x).collect();

        let ss_xx: f64 = x_differences_to_average.iter().map(|value| value.powi(2)).sum();
        if ss_xx == 0.0 {
            return Err(FitError::DegenerateX);
        }

        let avg_y = y.iter().sum::<f64>() / y.len() as f64;
        let ss_xy: f64 = x_differences_to_average
            .iter()
            .zip(y.iter())
            .map(|(dx, value)| dx * (value - avg_y))
            .sum();
        let slope = ss_xy / ss_xx;
        let intercept = avg_y - slope * avg_x;

        Ok(Self { intercept, slope })
    }
}
