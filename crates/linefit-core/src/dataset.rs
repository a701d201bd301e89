use std::slice;

/// A single (x, y) point. Both coordinates are always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
}

impl Observation {
    /// Returns `None` if either coordinate is NaN or infinite.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        if x.is_finite() && y.is_finite() {
            Some(Self { x, y })
        } else {
            None
        }
    }
}

/// Observations in input order. Built once, never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl FromIterator<Observation> for Dataset {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self { observations: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Observation;
    type IntoIter = slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-finite pairs are dropped.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        pairs.iter().filter_map(|&(x, y)| Observation::new(x, y)).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.y).collect()
    }

    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.observations.iter().map(|o| o.x))
    }

    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.observations.iter().map(|o| o.y))
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
