use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::cadence::RenderCadence;
use crate::cmd::config::{Action, CmdError, Config, Generate, RunConfig};
use crate::synth::SyntheticLine;

#[derive(Debug, Parser)]
#[command(
    name = "linefit",
    about = "Fit a line to x,y data with batch gradient descent and plot every step",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fit y = m*x + c to a file of "x,y" lines
    Fit(FitArgs),

    /// Write sample data around a known line
    Generate(GenerateArgs),
}

/* ------------------------- fit ------------------------- */

#[derive(Debug, Args)]
pub struct FitArgs {
    /// JSON file with run settings, flags given here take precedence
    #[arg(short = 'c', long = "config", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Input file, one "x,y" pair per line [default: data.txt]
    #[arg(short = 'i', long = "input", value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Plot written after each epoch [default: out.png]
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Number of epochs for gradient descent [default: 10000]
    #[arg(short = 'e', long)]
    pub epochs: Option<usize>,

    /// Learning rate [default: 0.001]
    #[arg(short = 'a', long = "alpha", visible_alias = "learning-rate")]
    pub alpha: Option<f64>,

    /// When to write the plot: every, final or never [default: every]
    #[arg(short = 'r', long = "render", value_name = "CADENCE")]
    pub render: Option<RenderCadence>,

    /// Left end of the drawn line [default: 1]
    #[arg(long = "x-min", allow_negative_numbers = true)]
    pub x_min: Option<f64>,

    /// Right end of the drawn line [default: 30]
    #[arg(long = "x-max", allow_negative_numbers = true)]
    pub x_max: Option<f64>,

    /// Width and height of the plot in pixels [default: 256]
    #[arg(long = "size", value_name = "PX")]
    pub size: Option<u32>,

    /// Pause after each rendered epoch, in milliseconds [default: 0]
    #[arg(long = "pace-ms", value_name = "MS")]
    pub pace_ms: Option<u64>,

    /// Log progress at info level every N epochs, 0 for last only [default: 1000]
    #[arg(long = "report-every", value_name = "N")]
    pub report_every: Option<usize>,

    /// Write per-epoch progress to this CSV file
    #[arg(long = "history", value_hint = ValueHint::FilePath)]
    pub history: Option<PathBuf>,
}

impl FitArgs {
    pub fn into_run_config(self) -> Result<RunConfig, CmdError> {
        let mut run = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(input) = self.input {
            run.input = input;
        }
        if let Some(output) = self.output {
            run.output = output;
        }
        if let Some(epochs) = self.epochs {
            run.training.epochs = epochs;
        }
        if let Some(alpha) = self.alpha {
            run.training.learning_rate = alpha;
        }
        if let Some(render) = self.render {
            run.render = render;
        }
        if let Some(x_min) = self.x_min {
            run.plot.x_min = x_min;
        }
        if let Some(x_max) = self.x_max {
            run.plot.x_max = x_max;
        }
        if let Some(size) = self.size {
            run.plot.width = size;
            run.plot.height = size;
        }
        if let Some(pace_ms) = self.pace_ms {
            run.pace_ms = pace_ms;
        }
        if let Some(report_every) = self.report_every {
            run.report_every = report_every;
        }
        if self.history.is_some() {
            run.history = self.history;
        }

        run.validate()?;
        Ok(run)
    }
}

/* ----------------------- generate ----------------------- */

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Where to write the points
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Number of points
    #[arg(short = 'n', long, default_value_t = 100)]
    pub count: usize,

    #[arg(short = 'm', long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub slope: f64,

    #[arg(short = 'b', long, default_value_t = 3.0, allow_negative_numbers = true)]
    pub intercept: f64,

    #[arg(long = "x-min", default_value_t = 0.0, allow_negative_numbers = true)]
    pub x_min: f64,

    #[arg(long = "x-max", default_value_t = 10.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Half width of the uniform noise added to y
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

// -------- Map CLI -> Config/Action types --------

impl Cli {
    pub fn into_config(self) -> Result<Config, CmdError> {
        let action = match self.command {
            Commands::Fit(args) => Action::Fit(args.into_run_config()?),
            Commands::Generate(g) => Action::Generate(Generate {
                output: g.output,
                line: SyntheticLine {
                    slope: g.slope,
                    intercept: g.intercept,
                    count: g.count,
                    x_min: g.x_min,
                    x_max: g.x_max,
                    noise: g.noise,
                },
                seed: g.seed,
            }),
        };
        Ok(Config { action })
    }
}
