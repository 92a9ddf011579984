//! Binding to the clown68000 interpreter.
//!
//! `build.rs` compiles the interpreter together with `csrc/clown_shim.c`,
//! which exposes a flat state struct and plain function-pointer callbacks so
//! the Rust side never depends on the interpreter's own struct layout.

use std::ffi::{c_ulong, c_void};

use crate::bus::{Lanes, WordBus};
use crate::engine::InstructionCore;
use crate::state::CpuState;

/// Mirror of `HarnessState` in `csrc/clown_shim.c`.
#[repr(C)]
struct RawState {
    data_registers: [u32; 8],
    address_registers: [u32; 8],
    user_stack_pointer: u32,
    supervisor_stack_pointer: u32,
    program_counter: u32,
    status_register: u16,
    instruction_register: u16,
    halted: u8,
    stopped: u8,
}

impl From<&CpuState> for RawState {
    fn from(state: &CpuState) -> Self {
        Self {
            data_registers: state.d,
            address_registers: state.a,
            user_stack_pointer: state.usp,
            supervisor_stack_pointer: state.ssp,
            program_counter: state.pc,
            status_register: state.sr,
            instruction_register: state.ir,
            halted: state.halted.into(),
            stopped: state.stopped.into(),
        }
    }
}

impl From<&RawState> for CpuState {
    fn from(raw: &RawState) -> Self {
        Self {
            d: raw.data_registers,
            a: raw.address_registers,
            usp: raw.user_stack_pointer,
            ssp: raw.supervisor_stack_pointer,
            sr: raw.status_register,
            pc: raw.program_counter,
            ir: raw.instruction_register,
            halted: raw.halted != 0,
            stopped: raw.stopped != 0,
        }
    }
}

type ReadFn = unsafe extern "C" fn(context: *mut c_void, address: u32, high: u8, low: u8) -> u16;
type WriteFn = unsafe extern "C" fn(context: *mut c_void, address: u32, high: u8, low: u8, value: u16);

unsafe extern "C" {
    fn harness_do_cycle(state: *mut RawState, read: ReadFn, write: WriteFn, context: *mut c_void) -> c_ulong;
}

/// # Safety
///
/// `context` must be the `&mut B` passed to `harness_do_cycle`.
unsafe extern "C" fn read_word<B: WordBus>(context: *mut c_void, address: u32, high: u8, low: u8) -> u16 {
    let bus = unsafe { &mut *context.cast::<B>() };
    bus.read_word(address, Lanes::new(high != 0, low != 0))
}

/// # Safety
///
/// `context` must be the `&mut B` passed to `harness_do_cycle`.
unsafe extern "C" fn write_word<B: WordBus>(context: *mut c_void, address: u32, high: u8, low: u8, value: u16) {
    let bus = unsafe { &mut *context.cast::<B>() };
    bus.write_word(address, Lanes::new(high != 0, low != 0), value);
}

/// The clown68000 interpreter. Stateless: all CPU state lives in [`CpuState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Clown68000;

impl InstructionCore for Clown68000 {
    fn step<B: WordBus>(&mut self, state: &mut CpuState, bus: &mut B) -> u32 {
        let mut raw = RawState::from(&*state);
        let context = std::ptr::from_mut(bus).cast::<c_void>();
        // SAFETY: `raw` and `bus` outlive the call, and the callbacks are
        // instantiated for the same `B` that `context` points to.
        let cycles = unsafe { harness_do_cycle(&mut raw, read_word::<B>, write_word::<B>, context) };
        *state = CpuState::from(&raw);
        u32::try_from(cycles).unwrap_or(u32::MAX)
    }
}
