//! Set up memory and registers for one vector, then step the core once.

use crate::engine::InstructionCore;
use crate::fixture::TestVector;
use crate::memory::Memory;
use crate::state::CpuState;

/// State and timing captured after a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    pub state: CpuState,
    pub cycles: u32,
}

/// Run the instruction described by `vector`.
///
/// Every address the final snapshot lists is zeroed before the initial
/// snapshot is loaded, so nothing a previous vector wrote can leak into the
/// comparison.
pub fn execute<C: InstructionCore>(core: &mut C, memory: &mut Memory, vector: &TestVector) -> Execution {
    memory.clear(&vector.final_state.ram);
    memory.load(&vector.initial.ram);

    let mut state = CpuState::decode(&vector.initial.registers);
    let cycles = core.step(&mut state, memory);
    Execution { state, cycles }
}
