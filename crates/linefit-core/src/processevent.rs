use crate::stats::LinReg;

/// Parameters at the start of an epoch and the cost they produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochProgress {
    pub epoch: usize,
    pub slope: f64,
    pub intercept: f64,
    pub cost: f64,
}

/// Receives everything the training loop reports. Sinks observe only, the
/// loop never reads anything back from them.
pub trait TrainEventSink {
    /// Called once per epoch before the update.
    fn on_progress(&mut self, _ev: &EpochProgress) {}
    /// Called once per epoch with the updated model.
    fn on_step(&mut self, _epoch: usize, _model: LinReg) {}
}

impl TrainEventSink for () {}
