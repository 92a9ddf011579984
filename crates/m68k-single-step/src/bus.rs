//! Word-granular bus between an instruction core and memory.
//!
//! The 68000 has a 16-bit data bus. A byte access still runs a full word
//! cycle; the upper and lower data strobes (UDS/LDS) select which half of
//! the word is live. [`Lanes`] models those two strobes.

/// Byte lanes enabled for one bus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lanes {
    /// Upper data strobe: the byte at the even address.
    pub high: bool,
    /// Lower data strobe: the byte at the odd address.
    pub low: bool,
}

impl Lanes {
    /// Full word access.
    pub const BOTH: Self = Self::new(true, true);
    /// Even byte only.
    pub const HIGH: Self = Self::new(true, false);
    /// Odd byte only.
    pub const LOW: Self = Self::new(false, true);

    #[must_use]
    pub const fn new(high: bool, low: bool) -> Self {
        Self { high, low }
    }

    /// Data bits carried by the enabled lanes.
    #[must_use]
    pub const fn mask(self) -> u16 {
        let high = if self.high { 0xFF00 } else { 0 };
        let low = if self.low { 0x00FF } else { 0 };
        high | low
    }
}

/// Memory as seen by an instruction core.
///
/// Addresses are word indices: word `n` covers bytes `2n` (high lane) and
/// `2n + 1` (low lane).
pub trait WordBus {
    /// Read a word. Disabled lanes read as zero.
    fn read_word(&mut self, address: u32, lanes: Lanes) -> u16;

    /// Write a word. Disabled lanes are left untouched.
    fn write_word(&mut self, address: u32, lanes: Lanes, value: u16);
}
