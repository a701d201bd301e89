use crate::processevent::{EpochProgress, TrainEventSink};

use csv::Writer;
use std::io::Write;
use std::path::Path;

/// Keeps every progress record of a run, in epoch order.
#[derive(Debug, Clone, Default)]
pub struct ProgressHistory {
    records: Vec<EpochProgress>,
}

impl TrainEventSink for ProgressHistory {
    fn on_progress(&mut self, ev: &EpochProgress) {
        self.records.push(*ev);
    }
}

impl ProgressHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EpochProgress] {
        &self.records
    }

    pub fn costs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.cost).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), csv::Error> {
        self.write_to(Writer::from_path(path)?)
    }

    pub fn write_to<W: Write>(&self, mut wtr: Writer<W>) -> Result<(), csv::Error> {
        wtr.write_record(["epoch", "slope", "intercept", "cost"])?;
        for r in &self.records {
            wtr.write_record(&[
                r.epoch.to_string(),
                r.slope.to_string(),
                r.intercept.to_string(),
                r.cost.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
