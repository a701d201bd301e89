use crate::cadence::RenderCadence;
use crate::csv_parse::{read_dataset_file, DatasetError};
use crate::dataset::Dataset;
use crate::fit::{fit, FitError, TrainingConfig};
use crate::fit_plot::{draw_fit_plot, PlotSettings, RenderRequest};
use crate::history::ProgressHistory;
use crate::processevent::{EpochProgress, TrainEventSink};
use crate::stats::{evaluate, LinReg};
use crate::synth::{write_dataset, SyntheticLine};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/* =================== Public configuration types =================== */

#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
}

#[derive(Debug, Clone)]
pub enum Action {
    Fit(RunConfig),
    Generate(Generate),
}

/// Everything a fit run needs. Defaults, then an optional JSON file, then
/// command line flags; fixed once the run starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub history: Option<PathBuf>,
    pub training: TrainingConfig,
    pub plot: PlotSettings,
    pub render: RenderCadence,
    /// Delay after each per-epoch render, purely cosmetic.
    pub pace_ms: u64,
    pub report_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.txt"),
            output: PathBuf::from("out.png"),
            history: None,
            training: TrainingConfig::default(),
            plot: PlotSettings::default(),
            render: RenderCadence::default(),
            pace_ms: 0,
            report_every: 1000,
        }
    }
}

impl RunConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CmdError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| CmdError::ConfigFile { path: path.to_path_buf(), source })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn validate(&self) -> Result<(), CmdError> {
        self.training.validate().map_err(|e| CmdError::Config(e.to_string()))?;
        self.plot.validate().map_err(|e| CmdError::Config(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Generate {
    pub output: PathBuf,
    pub line: SyntheticLine,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub model: LinReg,
    pub observations: usize,
    pub skipped: usize,
    pub final_cost: Option<f64>,
    pub render_failures: usize,
}

/* =================== Error type (no process::exit) =================== */

#[derive(thiserror::Error, Debug)]
pub enum CmdError {
    #[error("reading input {}: {source}", .path.display())]
    Input { path: PathBuf, source: DatasetError },
    #[error("training failed: {0}")]
    Fit(#[from] FitError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("reading config {}: {source}", .path.display())]
    ConfigFile { path: PathBuf, source: io::Error },
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("writing {}: {source}", .path.display())]
    Output { path: PathBuf, source: io::Error },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/* =================== Entry point =================== */

impl Config {
    pub fn run(&self) -> Result<(), CmdError> {
        match &self.action {
            Action::Fit(r) => run_fit(r).map(|_| ()),
            Action::Generate(g) => run_generate(g),
        }
    }
}

/* =================== Actions =================== */

pub fn run_fit(run: &RunConfig) -> Result<FitSummary, CmdError> {
    run.validate()?;

    let outcome = read_dataset_file(&run.input)
        .map_err(|source| CmdError::Input { path: run.input.clone(), source })?;
    let dataset = outcome.dataset;
    info!(
        "Read {} observations from {}, discarded {} bad records",
        dataset.len(),
        run.input.display(),
        outcome.skipped.len()
    );

    let mut sink = CliSink::new(&dataset, run);
    let model = fit(&dataset, &run.training, &mut sink)?;
    if run.render == RenderCadence::FinalOnly {
        sink.render(model);
    }
    if sink.render_failures > 0 {
        warn!("{} of the plots could not be written", sink.render_failures);
    }

    if let (Some(history), Some(path)) = (&sink.history, &run.history) {
        history.write_to_csv(path)?;
        info!("Progress history written to {}", path.display());
    }

    let final_cost = evaluate(&dataset, model).ok().map(|g| g.cost);
    info!("Final model after {} epochs: {}", run.training.epochs, model);
    if let Some(cost) = final_cost {
        info!("Final cost: {:.6}", cost);
    }
    match LinReg::train(&dataset.xs(), &dataset.ys()) {
        Ok(reference) => info!(
            "Least squares solution: {} (slope off by {:.6}, intercept off by {:.6})",
            reference,
            (model.slope - reference.slope).abs(),
            (model.intercept - reference.intercept).abs()
        ),
        Err(e) => debug!("No least squares solution: {}", e),
    }

    Ok(FitSummary {
        model,
        observations: dataset.len(),
        skipped: outcome.skipped.len(),
        final_cost,
        render_failures: sink.render_failures,
    })
}

pub fn run_generate(g: &Generate) -> Result<(), CmdError> {
    g.line.validate().map_err(|e| CmdError::Config(e.to_string()))?;

    let dataset = match g.seed {
        Some(seed) => g.line.generate(&mut StdRng::seed_from_u64(seed)),
        None => g.line.generate(&mut rand::rng()),
    };
    let file = File::create(&g.output)
        .map_err(|source| CmdError::Output { path: g.output.clone(), source })?;
    write_dataset(&dataset, file)?;

    info!(
        "Wrote {} points around {} to {}",
        dataset.len(),
        LinReg::from_val(g.line.intercept, g.line.slope),
        g.output.display()
    );
    Ok(())
}

/* =================== Progress handling =================== */

struct CliSink<'a> {
    dataset: &'a Dataset,
    run: &'a RunConfig,
    pace: Option<Duration>,
    history: Option<ProgressHistory>,
    last_cost: Option<f64>,
    warned_divergence: bool,
    render_failures: usize,
}

impl<'a> CliSink<'a> {
    fn new(dataset: &'a Dataset, run: &'a RunConfig) -> Self {
        Self {
            dataset,
            run,
            pace: (run.pace_ms > 0).then(|| Duration::from_millis(run.pace_ms)),
            history: run.history.as_ref().map(|_| ProgressHistory::new()),
            last_cost: None,
            warned_divergence: false,
            render_failures: 0,
        }
    }

    // a failed plot only loses that frame
    fn render(&mut self, model: LinReg) {
        let request = RenderRequest::new(self.dataset, model, &self.run.plot);
        if let Err(e) = draw_fit_plot(&request, &self.run.output, &self.run.plot) {
            if self.render_failures == 0 {
                warn!("failed to create {}: {}", self.run.output.display(), e);
            } else {
                debug!("failed to create {}: {}", self.run.output.display(), e);
            }
            self.render_failures += 1;
        }
    }
}

impl TrainEventSink for CliSink<'_> {
    fn on_progress(&mut self, ev: &EpochProgress) {
        let last = ev.epoch + 1 == self.run.training.epochs;
        let scheduled = self.run.report_every > 0 && ev.epoch % self.run.report_every == 0;
        if scheduled || last {
            info!("epoch {}: cost({:.6}, {:.6}) = {:.6}", ev.epoch, ev.slope, ev.intercept, ev.cost);
        } else {
            debug!("epoch {}: cost({:.6}, {:.6}) = {:.6}", ev.epoch, ev.slope, ev.intercept, ev.cost);
        }

        if !self.warned_divergence {
            let grew = self.last_cost.is_some_and(|prev| ev.cost > prev);
            if grew || !ev.cost.is_finite() {
                warn!(
                    "cost is {} at epoch {} and rising, the learning rate {} may be too large",
                    ev.cost, ev.epoch, self.run.training.learning_rate
                );
                self.warned_divergence = true;
            }
        }
        self.last_cost = Some(ev.cost);

        if let Some(history) = self.history.as_mut() {
            history.on_progress(ev);
        }
    }

    fn on_step(&mut self, _epoch: usize, model: LinReg) {
        if self.run.render == RenderCadence::EveryEpoch {
            self.render(model);
            if let Some(pace) = self.pace {
                thread::sleep(pace);
            }
        }
    }
}
