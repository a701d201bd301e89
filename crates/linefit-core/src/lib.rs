pub mod cadence;
pub mod cmd;
pub mod csv_parse;
pub mod dataset;
pub mod fit;
pub mod fit_plot;
pub mod history;
pub mod processevent;
pub mod stats;
pub mod synth;
