//! Scripted cores and vector builders shared by the integration tests.

#![allow(dead_code)]

use m68k_single_step::{CpuState, InstructionCore, TestVector, WireRegisters, WireState, WordBus};

/// A core whose single instruction is a closure.
pub struct Scripted<F>(pub F);

impl<F> InstructionCore for Scripted<F>
where
    F: FnMut(&mut CpuState, &mut dyn WordBus) -> u32,
{
    fn step<B: WordBus>(&mut self, state: &mut CpuState, bus: &mut B) -> u32 {
        let bus: &mut dyn WordBus = bus;
        (self.0)(state, bus)
    }
}

/// Address of the instruction under test.
pub const ORIGIN: u32 = 0x0C00;

/// NOP: advance past one opcode word in four cycles.
pub fn nop(state: &mut CpuState, _bus: &mut dyn WordBus) -> u32 {
    state.pc = state.pc.wrapping_add(2);
    4
}

/// Supervisor-mode registers with the fixture PC pointing at `ORIGIN`.
pub fn registers() -> WireRegisters {
    WireRegisters {
        d0: 0x0000_0008,
        d1: 0x1111_1111,
        a0: 0x0000_2000,
        usp: 0x0000_3000,
        ssp: 0x0000_0800,
        sr: 0x2700,
        pc: ORIGIN,
        ..WireRegisters::default()
    }
}

/// The opcode 0x4E71 at `ORIGIN`.
pub fn program() -> Vec<(u32, u8)> {
    vec![(ORIGIN, 0x4E), (ORIGIN + 1, 0x71)]
}

/// A vector whose expected outcome is a NOP.
pub fn nop_vector(name: &str) -> TestVector {
    let initial = WireState {
        registers: registers(),
        ram: program(),
    };
    let mut final_state = initial.clone();
    final_state.registers.pc = ORIGIN + 2;
    TestVector {
        name: name.into(),
        initial,
        final_state,
        length: 4,
    }
}
