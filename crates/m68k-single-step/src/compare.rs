//! Checking an execution against a vector's expected outcome.
//!
//! Comparison never stops at the first difference: every register and every
//! listed RAM byte is checked and each difference becomes one [`Mismatch`].
//!
//! Exception processing is partly unverifiable. The register contents and
//! some stack-frame bytes a real 68000 leaves behind after a bus or address
//! error depend on where in its microcode the fault hit, so:
//!
//! - a group 0 exception (bus/address error) passes once the cycle count
//!   matches, without looking at registers or RAM;
//! - the memory check on its own skips the microcode-dependent frame bytes
//!   of a group 0 frame;
//! - group 1/2 exceptions (traps, interrupts) are recognised but still fully
//!   checked. Their frames are not exempted yet.

use std::fmt;

use crate::driver::Execution;
use crate::fixture::TestVector;
use crate::memory::Memory;
use crate::state::CpuState;

/// Vector-table slots of the bus error and address error handlers.
const GROUP_0_SLOTS: std::ops::Range<u32> = 2..4;
/// Remaining slots of the 256-byte exception vector table.
const GROUP_1_2_SLOTS: std::ops::Range<u32> = 4..64;

/// Word at the top of a group 0 frame, with the R/W bit masked out, as left
/// by the reference hardware.
const FRAME_MASK: u16 = 0xFFEF;
const FRAME_SENTINEL: u16 = 0xFFEE;

/// Bytes of a group 0 frame, relative to A7, that vary with microcode.
const GROUP_0_FRAME_OFFSETS: [u32; 5] = [1, 10, 11, 12, 13];

/// Correction applied to the PC of a stopped core.
const STOPPED_PC_CORRECTION: u32 = 4;

const DATA_REGISTERS: [&str; 8] = ["D0", "D1", "D2", "D3", "D4", "D5", "D6", "D7"];
const ADDRESS_REGISTERS: [&str; 8] = ["A0", "A1", "A2", "A3", "A4", "A5", "A6", "A7"];

/// Exception class the core appears to have entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionGroup {
    /// Bus error or address error.
    Group0,
    /// Trap, interrupt, illegal instruction, privilege violation, etc.
    Group1Or2,
}

/// One difference between the obtained and expected outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Duration { expected: u32, obtained: u32 },
    Register { name: &'static str, expected: u32, obtained: u32 },
    Memory { address: u32, expected: u8, obtained: u8 },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Duration { expected, obtained } => {
                write!(f, "Duration differs (should be {expected} but was {obtained}).")
            }
            Self::Register {
                name,
                expected,
                obtained,
            } => write!(f, "{name} differs (should be {expected:X} but was {obtained:X})."),
            Self::Memory {
                address,
                expected,
                obtained,
            } => write!(
                f,
                "RAM at address {address:X} differs (should be {expected:X} but was {obtained:X})."
            ),
        }
    }
}

/// Outcome of checking one vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub exception: Option<ExceptionGroup>,
    pub mismatches: Vec<Mismatch>,
}

impl Verdict {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Work out whether the core has just taken an exception.
///
/// Both the handler addresses and the stack frame are read from the memory
/// the vector itself set up.
#[must_use]
pub fn classify(memory: &Memory, state: &CpuState) -> Option<ExceptionGroup> {
    let handler = |slot: u32| memory.peek_long(slot * 4);

    let frame_tagged = memory.peek_word(state.a[7]) & FRAME_MASK == FRAME_SENTINEL;
    if frame_tagged && GROUP_0_SLOTS.map(handler).any(|address| address == state.pc) {
        return Some(ExceptionGroup::Group0);
    }
    if GROUP_1_2_SLOTS.map(handler).any(|address| address == state.pc) {
        return Some(ExceptionGroup::Group1Or2);
    }
    None
}

/// Check an execution against everything `vector` expects.
#[must_use]
pub fn compare(memory: &Memory, execution: &Execution, vector: &TestVector) -> Verdict {
    let exception = classify(memory, &execution.state);

    if execution.cycles != vector.length {
        return Verdict {
            exception,
            mismatches: vec![Mismatch::Duration {
                expected: vector.length,
                obtained: execution.cycles,
            }],
        };
    }

    if exception == Some(ExceptionGroup::Group0) {
        return Verdict {
            exception,
            mismatches: Vec::new(),
        };
    }

    let expected = CpuState::decode(&vector.final_state.registers);
    let mut mismatches = compare_registers(&execution.state, &expected);
    mismatches.extend(compare_memory(memory, &execution.state, &vector.final_state.ram));
    Verdict {
        exception,
        mismatches,
    }
}

/// Compare every register the fixture records.
///
/// The active stack pointer is checked as A7. Of the banked copies only the
/// one for the mode the core did not end up in is checked; the other is
/// stale while its mode is active.
#[must_use]
pub fn compare_registers(obtained: &CpuState, expected: &CpuState) -> Vec<Mismatch> {
    let banked = if obtained.is_supervisor() {
        ("USP", obtained.usp, expected.usp)
    } else {
        ("SSP", obtained.ssp, expected.ssp)
    };
    let obtained_pc = if obtained.stopped {
        obtained.pc.wrapping_sub(STOPPED_PC_CORRECTION)
    } else {
        obtained.pc
    };

    let data = DATA_REGISTERS
        .iter()
        .zip(obtained.d.iter().zip(&expected.d))
        .map(|(&name, (&o, &e))| (name, o, e));
    let address = ADDRESS_REGISTERS
        .iter()
        .zip(obtained.a.iter().zip(&expected.a))
        .map(|(&name, (&o, &e))| (name, o, e));
    let control = [
        banked,
        ("PC", obtained_pc, expected.pc),
        ("SR", u32::from(obtained.sr), u32::from(expected.sr)),
    ];

    data.chain(address)
        .chain(control)
        .filter(|&(_, o, e)| o != e)
        .map(|(name, obtained, expected)| Mismatch::Register {
            name,
            expected,
            obtained,
        })
        .collect()
}

/// Compare every byte of the expected final RAM.
///
/// Classifies the exception itself so it can be used without
/// [`compare`]; for a group 0 frame the microcode-dependent bytes are skipped.
#[must_use]
pub fn compare_memory(memory: &Memory, obtained: &CpuState, expected: &[(u32, u8)]) -> Vec<Mismatch> {
    let group_0 = classify(memory, obtained) == Some(ExceptionGroup::Group0);
    let sp = obtained.a[7];
    let exempt = |address: u32| {
        group_0
            && GROUP_0_FRAME_OFFSETS
                .iter()
                .any(|&offset| same_byte(address, sp.wrapping_add(offset)))
    };

    expected
        .iter()
        .filter(|&&(address, _)| !exempt(address))
        .filter_map(|&(address, expected)| {
            let obtained = memory.peek(address);
            (obtained != expected).then_some(Mismatch::Memory {
                address,
                expected,
                obtained,
            })
        })
        .collect()
}

fn same_byte(a: u32, b: u32) -> bool {
    (a ^ b) & 0x00FF_FFFF == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{WireRegisters, WireState};

    const HANDLER: u32 = 0x0000_1400;
    const STACK: u32 = 0x0000_0800;

    fn state(sr: u16) -> CpuState {
        CpuState {
            d: [1, 2, 3, 4, 5, 6, 7, 8],
            a: [0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, STACK],
            usp: 0x0900,
            ssp: STACK,
            sr,
            pc: 0x0C00,
            ..CpuState::default()
        }
    }

    fn write_long(memory: &mut Memory, address: u32, value: u32) {
        for (i, byte) in value.to_be_bytes().into_iter().enumerate() {
            memory.poke(address + i as u32, byte);
        }
    }

    /// Memory holding an address-error frame at `STACK` and its handler in slot 3.
    fn group_0_memory() -> Memory {
        let mut memory = Memory::new();
        write_long(&mut memory, 3 * 4, HANDLER);
        memory.poke(STACK, 0xFF);
        memory.poke(STACK + 1, 0xFE);
        memory
    }

    #[test]
    fn identical_states_have_no_mismatches() {
        let s = state(0x2700);
        assert!(compare_registers(&s, &s).is_empty());
    }

    #[test]
    fn every_differing_register_is_reported_in_order() {
        let expected = state(0x2700);
        let mut obtained = expected;
        obtained.d[0] = 8;
        obtained.a[3] = 0;
        obtained.sr = 0x2701;

        let names: Vec<_> = compare_registers(&obtained, &expected)
            .into_iter()
            .map(|m| match m {
                Mismatch::Register { name, .. } => name,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(names, ["D0", "A3", "SR"]);
    }

    #[test]
    fn banked_pointer_follows_obtained_mode() {
        let mut expected = state(0x0700);
        expected.usp = 0x0900;
        expected.ssp = 0x0A00;
        expected.a[7] = 0x0900;

        // Obtained is in supervisor mode, so its SSP shadow is stale and
        // only the USP is checked.
        let mut obtained = state(0x2700);
        obtained.a[7] = 0x0900;
        obtained.usp = 0x0900;
        obtained.ssp = 0x0B00;

        assert_eq!(
            compare_registers(&obtained, &expected),
            [Mismatch::Register {
                name: "SR",
                expected: 0x0700,
                obtained: 0x2700,
            }]
        );
    }

    #[test]
    fn corrupted_usp_is_caught_in_supervisor_mode() {
        let expected = state(0x2700);
        let mut obtained = expected;
        obtained.usp = 0xDEAD;

        assert_eq!(
            compare_registers(&obtained, &expected),
            [Mismatch::Register {
                name: "USP",
                expected: 0x0900,
                obtained: 0xDEAD,
            }]
        );
    }

    #[test]
    fn corrupted_ssp_is_caught_in_user_mode() {
        let mut expected = state(0x0700);
        expected.a[7] = 0x0900;
        let mut obtained = expected;
        obtained.ssp = 0x0801;

        assert_eq!(
            compare_registers(&obtained, &expected),
            [Mismatch::Register {
                name: "SSP",
                expected: STACK,
                obtained: 0x0801,
            }]
        );
    }

    #[test]
    fn active_stack_pointer_is_reported_once() {
        let expected = state(0x2700);
        let mut obtained = expected;
        obtained.a[7] = STACK + 2;

        assert_eq!(
            compare_registers(&obtained, &expected),
            [Mismatch::Register {
                name: "A7",
                expected: STACK,
                obtained: STACK + 2,
            }]
        );
    }

    #[test]
    fn stopped_core_pc_is_corrected() {
        let expected = state(0x2700);
        let mut obtained = expected;
        obtained.stopped = true;
        obtained.pc = expected.pc + 4;
        assert!(compare_registers(&obtained, &expected).is_empty());

        obtained.stopped = false;
        assert_eq!(
            compare_registers(&obtained, &expected),
            vec![Mismatch::Register {
                name: "PC",
                expected: 0x0C00,
                obtained: 0x0C04,
            }]
        );
    }

    #[test]
    fn classify_group_0_needs_frame_sentinel() {
        let mut memory = group_0_memory();
        let mut s = state(0x2700);
        s.pc = HANDLER;
        assert_eq!(classify(&memory, &s), Some(ExceptionGroup::Group0));

        // R/W bit (0x10) is ignored.
        memory.poke(STACK + 1, 0xEE);
        assert_eq!(classify(&memory, &s), Some(ExceptionGroup::Group0));

        memory.poke(STACK + 1, 0x00);
        assert_eq!(classify(&memory, &s), None);
    }

    #[test]
    fn classify_group_1_2_by_handler_address() {
        let mut memory = Memory::new();
        write_long(&mut memory, 32 * 4, HANDLER);
        let mut s = state(0x2700);
        s.pc = HANDLER;
        assert_eq!(classify(&memory, &s), Some(ExceptionGroup::Group1Or2));

        s.pc = HANDLER + 2;
        assert_eq!(classify(&memory, &s), None);
    }

    #[test]
    fn classify_ignores_slots_outside_table() {
        let mut memory = Memory::new();
        write_long(&mut memory, 64 * 4, HANDLER);
        write_long(&mut memory, 4, HANDLER);
        let mut s = state(0x2700);
        s.pc = HANDLER;
        assert_eq!(classify(&memory, &s), None);
    }

    #[test]
    fn memory_mismatches_are_all_reported() {
        let mut memory = Memory::new();
        memory.load(&[(0x100, 1), (0x101, 2), (0x102, 3)]);
        let expected = [(0x100, 1), (0x101, 9), (0x102, 8)];
        assert_eq!(
            compare_memory(&memory, &state(0x2700), &expected),
            vec![
                Mismatch::Memory {
                    address: 0x101,
                    expected: 9,
                    obtained: 2,
                },
                Mismatch::Memory {
                    address: 0x102,
                    expected: 8,
                    obtained: 3,
                },
            ]
        );
    }

    #[test]
    fn group_0_frame_bytes_are_exempt() {
        let memory = group_0_memory();
        let mut s = state(0x2700);
        s.pc = HANDLER;

        let expected: Vec<_> = (0..16).map(|offset| (STACK + offset, 0x55)).collect();
        let flagged: Vec<u32> = compare_memory(&memory, &s, &expected)
            .into_iter()
            .map(|m| match m {
                Mismatch::Memory { address, .. } => address - STACK,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(flagged, [0, 2, 3, 4, 5, 6, 7, 8, 9, 14, 15]);
    }

    #[test]
    fn frame_bytes_are_checked_without_group_0() {
        let memory = Memory::new();
        let expected = [(STACK + 1, 0x55), (STACK + 10, 0x55)];
        assert_eq!(compare_memory(&memory, &state(0x2700), &expected).len(), 2);
    }

    fn vector(length: u32, final_registers: WireRegisters) -> TestVector {
        TestVector {
            name: "t".into(),
            initial: WireState::default(),
            final_state: WireState {
                registers: final_registers,
                ram: vec![(0x200, 0x77)],
            },
            length,
        }
    }

    #[test]
    fn duration_mismatch_skips_state_checks() {
        let memory = Memory::new();
        let execution = Execution {
            state: state(0x2700),
            cycles: 6,
        };
        let verdict = compare(&memory, &execution, &vector(4, WireRegisters::default()));
        assert_eq!(
            verdict.mismatches,
            vec![Mismatch::Duration {
                expected: 4,
                obtained: 6,
            }]
        );
    }

    #[test]
    fn group_0_passes_regardless_of_state() {
        let memory = group_0_memory();
        let mut s = state(0x2700);
        s.pc = HANDLER;
        let execution = Execution { state: s, cycles: 50 };

        let verdict = compare(&memory, &execution, &vector(50, WireRegisters::default()));
        assert!(verdict.passed());
        assert_eq!(verdict.exception, Some(ExceptionGroup::Group0));
    }

    #[test]
    fn diagnostics_are_hexadecimal() {
        let register = Mismatch::Register {
            name: "D0",
            expected: 0x1F,
            obtained: 0xABCD,
        };
        assert_eq!(register.to_string(), "D0 differs (should be 1F but was ABCD).");

        let memory = Mismatch::Memory {
            address: 0xFF_0010,
            expected: 0x0A,
            obtained: 0,
        };
        assert_eq!(memory.to_string(), "RAM at address FF0010 differs (should be A but was 0).");

        let duration = Mismatch::Duration {
            expected: 12,
            obtained: 10,
        };
        assert_eq!(duration.to_string(), "Duration differs (should be 12 but was 10).");
    }
}
