//! The instruction core under test.

use crate::bus::WordBus;
use crate::state::CpuState;

/// A 68000 core that can execute one instruction at a time.
///
/// The harness owns both the register file and the memory; the core borrows
/// them for the duration of a single [`step`](InstructionCore::step).
pub trait InstructionCore {
    /// Execute exactly one instruction, performing every memory access
    /// through `bus`. Returns the number of clock cycles it took.
    fn step<B: WordBus>(&mut self, state: &mut CpuState, bus: &mut B) -> u32;
}
