//! 68000 register file and its mapping to and from fixture registers.
//!
//! Fixtures carry both stack pointers as plain fields and a program counter
//! that points past the two prefetched words. Cores work with A7 as the
//! live stack pointer and a program counter at the prefetch address, so the
//! conversion has to resolve A7 from the S bit and shift the PC.

use crate::fixture::WireRegisters;

/// Supervisor bit of the status register.
pub const SUPERVISOR: u16 = 0x2000;

/// Distance between the fixture PC and the core's prefetch PC.
pub const PREFETCH_OFFSET: u32 = 4;

/// Architectural state of a 68000 as seen by the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuState {
    /// Data registers D0-D7.
    pub d: [u32; 8],
    /// Address registers A0-A7. A7 is the active stack pointer.
    pub a: [u32; 8],
    /// User stack pointer (banked while in supervisor mode).
    pub usp: u32,
    /// Supervisor stack pointer (banked while in user mode).
    pub ssp: u32,
    /// Status register.
    pub sr: u16,
    /// Program counter.
    pub pc: u32,
    /// Instruction register.
    pub ir: u16,
    /// Double bus fault.
    pub halted: bool,
    /// Waiting after STOP.
    pub stopped: bool,
}

impl CpuState {
    #[must_use]
    pub const fn is_supervisor(&self) -> bool {
        self.sr & SUPERVISOR != 0
    }

    /// Stack pointer for the given mode.
    ///
    /// For the active mode this is A7, since the banked copy is only
    /// written back when the mode changes.
    #[must_use]
    pub const fn stack_pointer(&self, supervisor: bool) -> u32 {
        if supervisor == self.is_supervisor() {
            self.a[7]
        } else if supervisor {
            self.ssp
        } else {
            self.usp
        }
    }

    /// Build the state a vector starts from. The core is always running.
    #[must_use]
    pub fn decode(wire: &WireRegisters) -> Self {
        let mut state = Self {
            d: [
                wire.d0, wire.d1, wire.d2, wire.d3, wire.d4, wire.d5, wire.d6, wire.d7,
            ],
            a: [wire.a0, wire.a1, wire.a2, wire.a3, wire.a4, wire.a5, wire.a6, 0],
            usp: wire.usp,
            ssp: wire.ssp,
            sr: wire.sr,
            pc: wire.pc.wrapping_sub(PREFETCH_OFFSET),
            ir: 0,
            halted: false,
            stopped: false,
        };
        state.a[7] = if state.is_supervisor() {
            state.ssp
        } else {
            state.usp
        };
        state
    }

    /// Fixture registers for this state.
    #[must_use]
    pub fn encode(&self) -> WireRegisters {
        WireRegisters {
            d0: self.d[0],
            d1: self.d[1],
            d2: self.d[2],
            d3: self.d[3],
            d4: self.d[4],
            d5: self.d[5],
            d6: self.d[6],
            d7: self.d[7],
            a0: self.a[0],
            a1: self.a[1],
            a2: self.a[2],
            a3: self.a[3],
            a4: self.a[4],
            a5: self.a[5],
            a6: self.a[6],
            usp: self.stack_pointer(false),
            ssp: self.stack_pointer(true),
            sr: self.sr,
            pc: self.pc.wrapping_add(PREFETCH_OFFSET),
        }
    }
}
