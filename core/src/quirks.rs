use crate::constants::MEMORY_SIZE;
use crate::error::FaultKind;

/// # Quirks
/// Points where Chip-8 interpreters disagree on behavior.
///
/// The defaults match the COSMAC VIP interpreter that most Chip-8 programs were written against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    pub shift_source: ShiftSource,
    pub font_addressing: FontAddressing,
    pub sprite_edge: SpriteEdge,
    pub addressing: Addressing,
}

/// Which register 8XY6 and 8XYE shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShiftSource {
    /// Vy is copied into Vx and then shifted
    #[default]
    Vy,
    /// Vx is shifted in place and Vy is ignored
    Vx,
}

/// How FX29 turns a digit into a glyph address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontAddressing {
    /// I = FONT_BASE + Vx * 5
    #[default]
    Scaled,
    /// I = FONT_BASE + Vx
    Unscaled,
}

/// What DXYN does with pixels past the right or bottom edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpriteEdge {
    /// Pixels past the edge are dropped
    #[default]
    Clip,
    /// Pixels past the edge reappear on the opposite edge
    Wrap,
}

/// What happens when PC or I points past the end of memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Addressing {
    /// Addresses are taken modulo the memory size
    #[default]
    Wrap,
    /// Any access past the end of memory faults
    Strict,
}

impl Addressing {
    /// Maps a machine address onto an index into memory.
    pub fn resolve(self, address: u16) -> Result<usize, FaultKind> {
        let index = usize::from(address);
        match self {
            Addressing::Wrap => Ok(index % MEMORY_SIZE),
            Addressing::Strict if index < MEMORY_SIZE => Ok(index),
            Addressing::Strict => Err(FaultKind::AddressOutOfRange(address)),
        }
    }

    /// Resolves `base + offset`, carrying the sum in 16 bits.
    pub fn resolve_offset(self, base: u16, offset: usize) -> Result<usize, FaultKind> {
        // offsets are bounded by a sprite height or a register count
        self.resolve(base.wrapping_add(offset as u16))
    }
}
