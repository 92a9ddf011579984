//! SingleStepTests runner for the clown68000 interpreter.
//!
//! Usage: `m68k-single-step <FIXTURE>`. Exits 0 when every vector passed.
//! Diagnostics go to stderr; set `RUST_LOG=info` for per-file summaries.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use m68k_single_step::cli::{self, Cli};
use m68k_single_step::clown::Clown68000;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let mut stderr = io::stderr().lock();
    match cli::run(Clown68000, &cli, &mut stderr) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
