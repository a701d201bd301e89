use crate::dataset::Dataset;
use crate::fit::{FitError, FitResult};
use crate::processevent::{EpochProgress, TrainEventSink};
use crate::stats::{evaluate, CostGradient, LinReg};

use log::debug;
use serde::Deserialize;

pub const DEFAULT_EPOCHS: usize = 10_000;
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    #[serde(alias = "alpha")]
    pub learning_rate: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { epochs: DEFAULT_EPOCHS, learning_rate: DEFAULT_LEARNING_RATE }
    }
}

impl TrainingConfig {
    pub fn new(epochs: usize, learning_rate: f64) -> FitResult<Self> {
        let cfg = Self { epochs, learning_rate };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> FitResult<()> {
        if self.learning_rate.is_finite() && self.learning_rate > 0.0 {
            Ok(())
        } else {
            Err(FitError::InvalidLearningRate(self.learning_rate))
        }
    }
}

/// Batch gradient descent from (0, 0) for exactly `config.epochs` epochs.
///
/// Each epoch evaluates the gradient at the current model, reports the
/// pre-update progress, steps both parameters using that same gradient and
/// then hands the updated model to `sink.on_step`. There is no early stop and
/// no divergence guard; a growing cost shows up in the progress stream.
///
/// Fails with [`FitError::EmptyDataset`] on the first epoch if `dataset` is
/// empty. With zero epochs the initial model is returned and nothing is
/// evaluated.
pub fn fit<S: TrainEventSink + ?Sized>(
    dataset: &Dataset,
    config: &TrainingConfig,
    sink: &mut S,
) -> FitResult<LinReg> {
    let mut model = LinReg::new();
    debug!(
        "fitting {} observations for {} epochs at alpha {}",
        dataset.len(),
        config.epochs,
        config.learning_rate
    );

    for epoch in 0..config.epochs {
        let grad = evaluate(dataset, model)?;
        sink.on_progress(&EpochProgress {
            epoch,
            slope: model.slope,
            intercept: model.intercept,
            cost: grad.cost,
        });
        model = step(model, &grad, config.learning_rate);
        sink.on_step(epoch, model);
    }

    Ok(model)
}

fn step(model: LinReg, grad: &CostGradient, alpha: f64) -> LinReg {
    LinReg::from_val(
        model.intercept - alpha * grad.grad_intercept,
        model.slope - alpha * grad.grad_slope,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ProgressHistory;

    #[derive(Default)]
    struct CountingSink {
        progress: Vec<EpochProgress>,
        steps: Vec<(usize, LinReg)>,
    }

    impl TrainEventSink for CountingSink {
        fn on_progress(&mut self, ev: &EpochProgress) {
            self.progress.push(*ev);
        }
        fn on_step(&mut self, epoch: usize, model: LinReg) {
            self.steps.push((epoch, model));
        }
    }

    fn line_2x_plus_3() -> Dataset {
        Dataset::from_pairs(&(0..=10).map(|i| (i as f64, 2.0 * i as f64 + 3.0)).collect::<Vec<_>>())
    }

    #[test]
    fn test_default_config() {
        let cfg = TrainingConfig::default();
        assert_eq!(cfg.epochs, 10_000);
        assert_eq!(cfg.learning_rate, 0.001);
    }

    #[test]
    fn test_invalid_learning_rate() {
        assert_eq!(TrainingConfig::new(10, 0.0), Err(FitError::InvalidLearningRate(0.0)));
        assert_eq!(TrainingConfig::new(10, -0.5), Err(FitError::InvalidLearningRate(-0.5)));
        assert!(TrainingConfig::new(10, f64::NAN).is_err());
        assert!(TrainingConfig::new(10, f64::INFINITY).is_err());
        assert!(TrainingConfig::new(0, 0.1).is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let cfg: TrainingConfig = serde_json::from_str(r#"{"epochs": 5}"#).unwrap();
        assert_eq!(cfg, TrainingConfig { epochs: 5, learning_rate: 0.001 });
        let cfg: TrainingConfig = serde_json::from_str(r#"{"alpha": 0.01}"#).unwrap();
        assert_eq!(cfg.learning_rate, 0.01);
        assert_eq!(cfg.epochs, 10_000);
    }

    #[test]
    fn test_converges_to_2x_plus_3() {
        let ds = line_2x_plus_3();
        let model = fit(&ds, &TrainingConfig::default(), &mut ()).unwrap();
        dbg!(model.slope, model.intercept);
        assert!((model.slope - 2.0).abs() < 0.05);
        assert!((model.intercept - 3.0).abs() < 0.05);
    }

    #[test]
    fn test_cost_never_increases() {
        let ds = line_2x_plus_3();
        let cfg = TrainingConfig::new(2_000, 0.001).unwrap();
        let mut history = ProgressHistory::new();
        fit(&ds, &cfg, &mut history).unwrap();

        let costs = history.costs();
        assert_eq!(costs.len(), 2_000);
        for pair in costs.windows(2) {
            assert!(pair[1] <= pair[0], "cost went up: {} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_zero_epochs_returns_origin_without_evaluating() {
        let mut sink = CountingSink::default();
        let cfg = TrainingConfig::new(0, 0.1).unwrap();

        // an empty dataset would fail evaluation, so Ok proves it never ran
        let model = fit(&Dataset::new(), &cfg, &mut sink).unwrap();
        assert_eq!(model, LinReg::new());

        let model = fit(&line_2x_plus_3(), &cfg, &mut sink).unwrap();
        assert_eq!(model, LinReg::new());
        assert!(sink.progress.is_empty());
        assert!(sink.steps.is_empty());
    }

    #[test]
    fn test_empty_dataset_fails_before_any_update() {
        let mut sink = CountingSink::default();
        let cfg = TrainingConfig::new(100, 0.5).unwrap();
        let res = fit(&Dataset::new(), &cfg, &mut sink);
        assert_eq!(res, Err(FitError::EmptyDataset));
        assert!(sink.progress.is_empty());
        assert!(sink.steps.is_empty());
    }

    #[test]
    fn test_progress_is_pre_update_and_steps_are_post_update() {
        let ds = Dataset::from_pairs(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let cfg = TrainingConfig::new(3, 0.01).unwrap();
        let mut sink = CountingSink::default();
        let model = fit(&ds, &cfg, &mut sink).unwrap();

        assert_eq!(sink.progress.len(), 3);
        assert_eq!(sink.steps.len(), 3);
        assert_eq!(sink.progress[0].slope, 0.0);
        assert_eq!(sink.progress[0].intercept, 0.0);
        assert!((sink.progress[0].cost - 14.0 / 3.0).abs() < 1e-12);

        // first step from the gradient at the origin, both parameters at once
        let (epoch, first) = sink.steps[0];
        assert_eq!(epoch, 0);
        assert!((first.slope - 0.01 * 2.0 / 3.0 * 14.0).abs() < 1e-12);
        assert!((first.intercept - 0.01 * 2.0 / 3.0 * 6.0).abs() < 1e-12);

        for i in 1..3 {
            assert_eq!(sink.progress[i].epoch, i);
            assert_eq!(sink.progress[i].slope, sink.steps[i - 1].1.slope);
            assert_eq!(sink.progress[i].intercept, sink.steps[i - 1].1.intercept);
        }
        assert_eq!(sink.steps[2].1, model);
    }

    #[test]
    fn test_large_learning_rate_diverges_without_error() {
        let ds = line_2x_plus_3();
        let cfg = TrainingConfig::new(50, 1.0).unwrap();
        let mut history = ProgressHistory::new();
        let model = fit(&ds, &cfg, &mut history).unwrap();
        let costs = history.costs();
        assert!(costs.last().unwrap() > &costs[0] || !costs.last().unwrap().is_finite());
        dbg!(model);
    }
}
