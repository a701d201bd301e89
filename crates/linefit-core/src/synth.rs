use crate::dataset::{Dataset, Observation};

use csv::WriterBuilder;
use rand::Rng;
use serde::Deserialize;
use std::io::Write;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SynthError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("x_min {x_min} is larger than x_max {x_max}")]
    EmptyRange { x_min: f64, x_max: f64 },
}

/// Sample points around y = slope * x + intercept.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SyntheticLine {
    pub slope: f64,
    pub intercept: f64,
    pub count: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Half width of the uniform noise added to y.
    pub noise: f64,
}

impl Default for SyntheticLine {
    fn default() -> Self {
        Self { slope: 2., intercept: 3., count: 100, x_min: 0., x_max: 10., noise: 0. }
    }
}

impl SyntheticLine {
    pub fn validate(&self) -> Result<(), SynthError> {
        let fields = [
            ("slope", self.slope),
            ("intercept", self.intercept),
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("noise", self.noise),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SynthError::NonFinite { field, value });
            }
        }
        if self.x_min > self.x_max {
            return Err(SynthError::EmptyRange { x_min: self.x_min, x_max: self.x_max });
        }
        Ok(())
    }

    /// x drawn uniformly from [x_min, x_max]. Expects a validated line.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Dataset {
        let noise = self.noise.abs();
        (0..self.count)
            .filter_map(|_| {
                let x = rng.random_range(self.x_min..=self.x_max);
                let e = if noise > 0.0 { rng.random_range(-noise..=noise) } else { 0.0 };
                Observation::new(x, self.slope * x + self.intercept + e)
            })
            .collect()
    }

    /// Evenly spaced x over [x_min, x_max], no noise.
    pub fn evenly_spaced(&self) -> Dataset {
        let step =
            if self.count > 1 { (self.x_max - self.x_min) / (self.count - 1) as f64 } else { 0.0 };
        (0..self.count)
            .filter_map(|i| {
                let x = self.x_min + step * i as f64;
                Observation::new(x, self.slope * x + self.intercept)
            })
            .collect()
    }
}

/// Writes "x,y" lines without a header, the same format the parser reads.
pub fn write_dataset<W: Write>(dataset: &Dataset, writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    for obs in dataset {
        wtr.write_record(&[obs.x.to_string(), obs.y.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
