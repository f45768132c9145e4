use crate::constants::{FONT_BASE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::{Fault, FaultKind};
use crate::frame::{FrameBuffer, BLANK_FRAME};
use crate::quirks::Addressing;
use crate::stack::Stack;
use crate::timers::Timers;

/// Index of the flag register
pub const VF: usize = 0xF;

/// What the machine does on its next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fetching and executing instructions
    Running,
    /// Paused on FX0A until a key is pressed; the key is then written to `register`
    AwaitingKey { register: usize },
    /// Stopped by a fault; no further instructions will execute
    Halted(Fault),
}

/// A snapshot of the Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Timers
/// - 2 8-bit timers (delay & sound)
///
/// ## Memory
/// - 16 entry call stack
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the sprite sheet
///     - 0x200.. holds the loaded program
/// - 32x64 frame buffer
///     - stores the contents of the next frame to be drawn
///
/// ## Execution
/// - the current `Mode`
/// - whether the frame buffer changed since it was last taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: Stack,
    pub timers: Timers,
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub mode: Mode,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = usize::from(FONT_BASE);
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: Stack::new(),
            timers: Timers::new(),
            memory,
            frame_buffer: BLANK_FRAME,
            draw_flag: false,
            mode: Mode::Running,
        }
    }

    pub fn read(&self, address: u16, addressing: Addressing) -> Result<u8, FaultKind> {
        Ok(self.memory[addressing.resolve(address)?])
    }

    /// Fills `buffer` from consecutive addresses starting at I.
    pub fn read_from_i(&self, buffer: &mut [u8], addressing: Addressing) -> Result<(), FaultKind> {
        for (offset, byte) in buffer.iter_mut().enumerate() {
            *byte = self.memory[addressing.resolve_offset(self.i, offset)?];
        }
        Ok(())
    }

    /// Writes `bytes` to consecutive addresses starting at I; at most 16 bytes.
    ///
    /// Every address is resolved before anything is written, so a fault leaves memory untouched.
    pub fn write_from_i(&mut self, bytes: &[u8], addressing: Addressing) -> Result<(), FaultKind> {
        let mut addresses = [0; 16];
        let addresses = &mut addresses[..bytes.len()];
        for (offset, address) in addresses.iter_mut().enumerate() {
            *address = addressing.resolve_offset(self.i, offset)?;
        }
        for (&address, &byte) in addresses.iter().zip(bytes) {
            self.memory[address] = byte;
        }
        Ok(())
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self, addressing: Addressing) -> Result<u16, FaultKind> {
        let high = self.read(self.pc, addressing)?;
        let low = self.read(self.pc.wrapping_add(1), addressing)?;
        Ok(crate::opcode::from_bytes(high, low))
    }

    /// Moves the pc past the instruction after the current one
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
