//! Conformance runner for Motorola 68000 instruction cores.
//!
//! Each SingleStepTests vector describes exactly one instruction: registers
//! and RAM before, registers and RAM after, and the cycle count. The runner
//! loads a vector into a flat 16MB RAM, asks the core to execute one
//! instruction through a word-wide bus, and reports every register, RAM byte
//! and timing difference.
//!
//! # Usage
//!
//! ```ignore
//! use m68k_single_step::{Runner, fixture};
//!
//! let vectors = fixture::load(Path::new("ABCD.json"))?;
//! let mut runner = Runner::new(my_core);
//! let report = runner.run_suite(&vectors, &mut std::io::stderr())?;
//! assert!(report.success());
//! ```
//!
//! The core is anything implementing [`InstructionCore`]. With the
//! `clown68000` feature the crate also binds the clown68000 interpreter and
//! builds the `m68k-single-step` binary around it.

pub mod bus;
pub mod cli;
pub mod compare;
pub mod driver;
pub mod engine;
pub mod error;
pub mod fixture;
pub mod memory;
pub mod runner;
pub mod state;

#[cfg(feature = "clown68000")]
#[allow(unsafe_code)]
pub mod clown;

pub use bus::{Lanes, WordBus};
pub use compare::{ExceptionGroup, Mismatch, Verdict};
pub use driver::Execution;
pub use engine::InstructionCore;
pub use error::HarnessError;
pub use fixture::{TestVector, WireRegisters, WireState};
pub use memory::Memory;
pub use runner::{Runner, SuiteReport};
pub use state::CpuState;
