//! Flat RAM backing the test bus.
//!
//! One buffer covers the whole 24-bit address space of the 68000. Every
//! address is masked into range, so vector fetches and stack accesses beyond
//! the bytes a fixture lists wrap instead of faulting.

use crate::bus::{Lanes, WordBus};

/// Size of the backing store: the full 16MB (24-bit) address space.
pub const MEMORY_SIZE: usize = 1 << 24;

const ADDRESS_MASK: u32 = (MEMORY_SIZE as u32) - 1;

/// Byte-addressable RAM shared by every vector in a run.
pub struct Memory {
    data: Vec<u8>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: vec![0; MEMORY_SIZE],
        }
    }

    /// Read the byte at a byte address.
    #[must_use]
    pub fn peek(&self, address: u32) -> u8 {
        self.data[(address & ADDRESS_MASK) as usize]
    }

    /// Write the byte at a byte address.
    pub fn poke(&mut self, address: u32, value: u8) {
        self.data[(address & ADDRESS_MASK) as usize] = value;
    }

    /// Big-endian word at a byte address.
    #[must_use]
    pub fn peek_word(&self, address: u32) -> u16 {
        u16::from(self.peek(address)) << 8 | u16::from(self.peek(address.wrapping_add(1)))
    }

    /// Big-endian longword at a byte address.
    #[must_use]
    pub fn peek_long(&self, address: u32) -> u32 {
        u32::from(self.peek_word(address)) << 16 | u32::from(self.peek_word(address.wrapping_add(2)))
    }

    /// Zero every address a snapshot mentions.
    pub fn clear(&mut self, ram: &[(u32, u8)]) {
        for &(address, _) in ram {
            self.poke(address, 0);
        }
    }

    /// Store every byte of a snapshot.
    pub fn load(&mut self, ram: &[(u32, u8)]) {
        for &(address, value) in ram {
            self.poke(address, value);
        }
    }
}

impl WordBus for Memory {
    fn read_word(&mut self, address: u32, lanes: Lanes) -> u16 {
        let byte = address << 1;
        let mut value = 0;
        if lanes.high {
            value |= u16::from(self.peek(byte)) << 8;
        }
        if lanes.low {
            value |= u16::from(self.peek(byte | 1));
        }
        value
    }

    fn write_word(&mut self, address: u32, lanes: Lanes, value: u16) {
        let byte = address << 1;
        if lanes.high {
            self.poke(byte, (value >> 8) as u8);
        }
        if lanes.low {
            self.poke(byte | 1, value as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn word_index_maps_to_byte_pair() {
        let mut mem = Memory::new();
        mem.write_word(0x800, Lanes::BOTH, 0x1234);
        assert_eq!(mem.peek(0x1000), 0x12);
        assert_eq!(mem.peek(0x1001), 0x34);
        assert_eq!(mem.read_word(0x800, Lanes::BOTH), 0x1234);
    }

    #[test]
    fn disabled_lane_reads_zero() {
        let mut mem = Memory::new();
        mem.load(&[(0x2000, 0xAB), (0x2001, 0xCD)]);
        assert_eq!(mem.read_word(0x1000, Lanes::HIGH), 0xAB00);
        assert_eq!(mem.read_word(0x1000, Lanes::LOW), 0x00CD);
        assert_eq!(mem.read_word(0x1000, Lanes::new(false, false)), 0);
    }

    #[test]
    fn disabled_lane_is_not_written() {
        let mut mem = Memory::new();
        mem.load(&[(0x2000, 0xAB), (0x2001, 0xCD)]);
        mem.write_word(0x1000, Lanes::LOW, 0x1234);
        assert_eq!(mem.peek(0x2000), 0xAB);
        assert_eq!(mem.peek(0x2001), 0x34);
        mem.write_word(0x1000, Lanes::HIGH, 0x5678);
        assert_eq!(mem.peek(0x2000), 0x56);
        assert_eq!(mem.peek(0x2001), 0x34);
    }

    #[test]
    fn addresses_wrap_into_range() {
        let mut mem = Memory::new();
        mem.poke(0x0100_0010, 0x42);
        assert_eq!(mem.peek(0x10), 0x42);
        // Word index 0x0080_0008 is byte 0x0100_0010.
        assert_eq!(mem.read_word(0x0080_0008, Lanes::HIGH), 0x4200);
        assert_eq!(mem.peek_long(0xFF_FFFE), 0);
    }

    #[test]
    fn peek_long_is_big_endian() {
        let mut mem = Memory::new();
        mem.load(&[(8, 0x00), (9, 0x12), (10, 0x34), (11, 0x56)]);
        assert_eq!(mem.peek_long(8), 0x0012_3456);
        assert_eq!(mem.peek_word(10), 0x3456);
    }

    #[test]
    fn clear_zeroes_only_listed_addresses() {
        let mut mem = Memory::new();
        mem.load(&[(0x10, 1), (0x11, 2), (0x12, 3)]);
        mem.clear(&[(0x11, 0xFF)]);
        assert_eq!(mem.peek(0x10), 1);
        assert_eq!(mem.peek(0x11), 0);
        assert_eq!(mem.peek(0x12), 3);
    }

    proptest! {
        #[test]
        fn lane_writes_respect_mask(address in 0u32..0x80_0000, old in any::<u16>(), new in any::<u16>(),
                                    high in any::<bool>(), low in any::<bool>()) {
            let mut mem = Memory::new();
            let lanes = Lanes::new(high, low);
            mem.write_word(address, Lanes::BOTH, old);
            mem.write_word(address, lanes, new);
            let expected = (old & !lanes.mask()) | (new & lanes.mask());
            prop_assert_eq!(mem.read_word(address, Lanes::BOTH), expected);
            prop_assert_eq!(mem.read_word(address, lanes), expected & lanes.mask());
        }
    }
}
