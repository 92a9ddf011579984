//! Decoder for the packed SingleStepTests format (`*.json.bin`).
//!
//! All integers are little-endian. Every block starts with a byte count
//! followed by a block magic:
//!
//! ```text
//! file:         magic 0x1A3F5D71, test count
//! test:         size, magic 0xABC12367, name, initial state, final state, transactions
//! name:         size, magic 0x89ABCDEF, length, bytes
//! state:        size, magic 0x01234567, d0-d7 a0-a6 usp ssp sr pc, prefetch x2,
//!               RAM count, RAM count x (address: u32, word: u16)
//! transactions: size, magic 0x456789AB, cycle count, transaction count,
//!               per transaction: kind (u8), cycles (u32), and for non-idle
//!               kinds fc, address, data, uds, lds (u32 each)
//! ```

use std::path::Path;

use crate::error::HarnessError;
use crate::fixture::{TestVector, WireRegisters, WireState};

const FILE_MAGIC: u32 = 0x1A3F_5D71;
const TEST_MAGIC: u32 = 0xABC1_2367;
const NAME_MAGIC: u32 = 0x89AB_CDEF;
const STATE_MAGIC: u32 = 0x0123_4567;
const TRANSACTIONS_MAGIC: u32 = 0x4567_89AB;

/// Whether `bytes` starts with the packed-format file magic.
pub(super) fn is_binary(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) == FILE_MAGIC
}

pub(super) fn decode(bytes: &[u8], path: &Path) -> Result<Vec<TestVector>, HarnessError> {
    let mut reader = Reader {
        bytes,
        offset: 0,
        path,
    };

    if reader.u32("file magic")? != FILE_MAGIC {
        return Err(reader.error("bad file magic"));
    }
    let count = reader.u32("test count")? as usize;

    // Cap the preallocation; a corrupt count should fail on EOF, not on alloc.
    let mut vectors = Vec::with_capacity(count.min(0x1_0000));
    for _ in 0..count {
        vectors.push(reader.test()?);
    }
    Ok(vectors)
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
    path: &'a Path,
}

impl<'a> Reader<'a> {
    fn error(&self, reason: impl Into<String>) -> HarnessError {
        HarnessError::Binary {
            path: self.path.to_path_buf(),
            offset: self.offset,
            reason: reason.into(),
        }
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], HarnessError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| self.error(format!("unexpected EOF reading {what}")))?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn u8(&mut self, what: &str) -> Result<u8, HarnessError> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &str) -> Result<u16, HarnessError> {
        let b = self.take(2, what)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self, what: &str) -> Result<u32, HarnessError> {
        let b = self.take(4, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Skip a block's byte count and check its magic.
    fn block(&mut self, magic: u32, what: &str) -> Result<(), HarnessError> {
        self.u32(what)?;
        let found = self.u32(what)?;
        if found == magic {
            Ok(())
        } else {
            Err(self.error(format!("bad {what} magic 0x{found:08X}")))
        }
    }

    fn test(&mut self) -> Result<TestVector, HarnessError> {
        self.block(TEST_MAGIC, "test")?;
        let name = self.name()?;
        let initial = self.state()?;
        let final_state = self.state()?;
        let length = self.transactions()?;
        Ok(TestVector {
            name,
            initial,
            final_state,
            length,
        })
    }

    fn name(&mut self) -> Result<String, HarnessError> {
        self.block(NAME_MAGIC, "name")?;
        let len = self.u32("name length")? as usize;
        let raw = self.take(len, "name")?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    fn state(&mut self) -> Result<WireState, HarnessError> {
        self.block(STATE_MAGIC, "state")?;

        let mut regs = [0u32; 19];
        for reg in &mut regs {
            *reg = self.u32("registers")?;
        }
        let [d0, d1, d2, d3, d4, d5, d6, d7, a0, a1, a2, a3, a4, a5, a6, usp, ssp, sr, pc] = regs;
        let sr = u16::try_from(sr).map_err(|_| self.error(format!("SR 0x{sr:X} out of range")))?;

        // Prefetch words are implied by RAM.
        self.take(8, "prefetch")?;

        let entries = self.u32("RAM count")? as usize;
        let mut ram = Vec::with_capacity(entries.min(0x1_0000) * 2);
        for _ in 0..entries {
            let address = self.u32("RAM address")?;
            let word = self.u16("RAM data")?;
            ram.push((address, (word >> 8) as u8));
            ram.push((address | 1, word as u8));
        }

        Ok(WireState {
            registers: WireRegisters {
                d0,
                d1,
                d2,
                d3,
                d4,
                d5,
                d6,
                d7,
                a0,
                a1,
                a2,
                a3,
                a4,
                a5,
                a6,
                usp,
                ssp,
                sr,
                pc,
            },
            ram,
        })
    }

    /// Skip the bus transactions; only their total cycle count is checked.
    fn transactions(&mut self) -> Result<u32, HarnessError> {
        self.block(TRANSACTIONS_MAGIC, "transactions")?;
        let cycles = self.u32("cycle count")?;
        let count = self.u32("transaction count")?;
        for _ in 0..count {
            let kind = self.u8("transaction kind")?;
            self.take(4, "transaction cycles")?;
            if kind != 0 {
                self.take(20, "transaction")?;
            }
        }
        Ok(cycles)
    }
}
