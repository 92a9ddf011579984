//! Command-line front end.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::engine::InstructionCore;
use crate::error::HarnessError;
use crate::fixture;
use crate::runner::Runner;

#[derive(Parser, Debug)]
#[command(
    name = "m68k-single-step",
    version,
    about = "Check a 68000 core against SingleStepTests vectors"
)]
pub struct Cli {
    /// Fixture file (JSON or packed binary), or a directory of them
    pub fixture: PathBuf,
}

/// Run every fixture named by `cli`, writing diagnostics to `out`.
///
/// Returns whether every vector passed.
pub fn run<C: InstructionCore, W: Write>(core: C, cli: &Cli, out: &mut W) -> Result<bool, HarnessError> {
    let files = fixture::discover(&cli.fixture)?;
    let mut runner = Runner::new(core);
    let mut success = true;

    for path in &files {
        let vectors = fixture::load(path)?;
        let report = runner.run_suite(&vectors, out)?;
        info!(
            "{}: {} passed, {} failed",
            path.display(),
            report.passed,
            report.failed
        );
        success &= report.success();
    }
    Ok(success)
}
