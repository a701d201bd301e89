use linefit_core::cmd::cli::Cli;

use clap::Parser;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = match cli.into_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        },
    };
    if let Err(e) = cfg.run() {
        eprintln!("{e}");
        process::exit(1);
    }
}
