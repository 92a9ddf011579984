//! Running a suite of vectors against one core.

use std::io::Write;

use log::{debug, trace};

use crate::compare::{Verdict, compare};
use crate::driver;
use crate::engine::InstructionCore;
use crate::error::HarnessError;
use crate::fixture::TestVector;
use crate::memory::Memory;

/// Pass/fail counts for one suite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
}

impl SuiteReport {
    #[must_use]
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Owns the core and the RAM shared by every vector it runs.
pub struct Runner<C> {
    core: C,
    memory: Memory,
}

impl<C: InstructionCore> Runner<C> {
    pub fn new(core: C) -> Self {
        Self {
            core,
            memory: Memory::new(),
        }
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Execute and check a single vector.
    pub fn run_vector(&mut self, vector: &TestVector) -> Verdict {
        let execution = driver::execute(&mut self.core, &mut self.memory, vector);
        trace!("{}: {} cycles", vector.name, execution.cycles);

        let verdict = compare(&self.memory, &execution, vector);
        if let Some(group) = verdict.exception {
            debug!("{}: {group:?} exception", vector.name);
        }
        verdict
    }

    /// Run every vector in order, writing the diagnostics of each failure
    /// followed by its name to `out`.
    ///
    /// A failing vector never stops the suite.
    pub fn run_suite<W: Write>(&mut self, vectors: &[TestVector], out: &mut W) -> Result<SuiteReport, HarnessError> {
        let mut report = SuiteReport::default();
        for vector in vectors {
            let verdict = self.run_vector(vector);
            if verdict.passed() {
                report.passed += 1;
                continue;
            }

            report.failed += 1;
            for mismatch in &verdict.mismatches {
                writeln!(out, "{mismatch}")?;
            }
            writeln!(out, "Failure in test {}.", vector.name)?;
        }
        Ok(report)
    }
}
