use std::collections::VecDeque;
use std::io::Read;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{MAX_SAVED_STATES, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Fault, RomError};
use crate::frame::FrameBuffer;
use crate::instruction::from_op;
use crate::keypad::Keypad;
use crate::operations::Context;
use crate::quirks::Quirks;
use crate::state::{Mode, State};

/// What to do with a ROM too large to fit in memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Oversize {
    /// Load as much as fits and report what was dropped
    #[default]
    Truncate,
    /// Refuse to load anything
    Reject,
}

/// How much of a ROM made it into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loaded {
    pub bytes: usize,
    pub truncated: usize,
}

/// The outcome of a single call to `Chip8::step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// An instruction was fetched and executed
    Executed { opcode: u16, mnemonic: &'static str },
    /// An opcode outside the instruction set was fetched and skipped over
    Ignored(u16),
    /// Still waiting on FX0A for a key
    Waiting,
    /// A key arrived for FX0A and execution resumes next cycle
    KeyLatched(u8),
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding, one per frame
///  - `keypad` with public interfaces for manipulating it
///  - the `quirks` it was configured with and its random number generator
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - stepping the CPU and running whole frames
/// - rewinding a frame at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    keypad: Keypad,
    quirks: Quirks,
    rng: StdRng,
}

impl Chip8 {
    pub fn new(quirks: Quirks) -> Self {
        Self::with_rng(quirks, StdRng::from_entropy())
    }

    /// A machine whose random numbers are reproducible
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        Self::with_rng(quirks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(quirks: Quirks, rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::with_capacity(MAX_SAVED_STATES),
            keypad: Keypad::new(),
            quirks,
            rng,
        }
    }

    /// Copies a ROM into memory at 0x200
    ///
    /// # Arguments
    /// * `rom` the raw program image
    /// * `policy` what to do if the image doesn't fit
    pub fn load_rom(&mut self, rom: &[u8], policy: Oversize) -> Result<Loaded, RomError> {
        let start = usize::from(PROGRAM_START);
        let capacity = MEMORY_SIZE - start;

        if rom.len() > capacity && policy == Oversize::Reject {
            return Err(RomError::ImageTooLarge {
                size: rom.len(),
                capacity,
            });
        }

        let bytes = rom.len().min(capacity);
        self.state.memory[start..start + bytes].copy_from_slice(&rom[..bytes]);

        let loaded = Loaded {
            bytes,
            truncated: rom.len() - bytes,
        };
        if loaded.truncated > 0 {
            warn!(
                "ROM is {} bytes; dropped the last {} that don't fit in memory",
                rom.len(),
                loaded.truncated
            );
        }
        debug!("loaded {} byte ROM at {:#05X}", loaded.bytes, PROGRAM_START);
        Ok(loaded)
    }

    /// Load a rom from a reader
    ///
    /// # Arguments
    /// * `reader` a reader positioned at the start of a ROM
    /// * `policy` what to do if the image doesn't fit
    pub fn load_rom_from(
        &mut self,
        reader: &mut dyn Read,
        policy: Oversize,
    ) -> Result<Loaded, RomError> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_rom(&rom, policy)
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// Replace the pressed status of every key at once
    pub fn set_keys(&mut self, pressed: [bool; 16]) {
        self.keypad = Keypad::from(pressed);
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn quirks(&self) -> &Quirks {
        &self.quirks
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Whether the sound timer is running
    pub fn sound_active(&self) -> bool {
        self.state.timers.sound_active()
    }

    /// Advances the CPU by a single cycle
    /// - latches a key if awaiting a keypress, otherwise does nothing while awaiting
    /// - gets and executes the next opcode
    /// - halts on a fault; every later call returns the same fault
    pub fn step(&mut self) -> Result<Cycle, Fault> {
        match self.state.mode {
            Mode::Halted(fault) => Err(fault),
            Mode::AwaitingKey { register } => Ok(self.await_key(register)),
            Mode::Running => self.execute(),
        }
    }

    fn await_key(&mut self, register: usize) -> Cycle {
        match self.keypad.first_pressed() {
            Some(key) => {
                self.state.v[register] = key;
                self.state.mode = Mode::Running;
                debug!("latched key {:X} into V{:X}", key, register);
                Cycle::KeyLatched(key)
            }
            None => Cycle::Waiting,
        }
    }

    fn execute(&mut self) -> Result<Cycle, Fault> {
        let pc = self.state.pc;
        let opcode = match self.state.fetch(self.quirks.addressing) {
            Ok(opcode) => opcode,
            Err(kind) => return Err(self.halt(Fault { kind, pc, opcode: 0 })),
        };
        self.state.pc = pc.wrapping_add(2);

        let instruction = match from_op(opcode) {
            Some(instruction) => instruction,
            None => {
                warn!("ignoring unknown opcode {:04X} at pc {:04X}", opcode, pc);
                return Ok(Cycle::Ignored(opcode));
            }
        };

        let mut ctx = Context {
            keypad: &self.keypad,
            quirks: &self.quirks,
            rng: &mut self.rng,
        };
        if let Err(kind) = (instruction.execute)(opcode, &mut self.state, &mut ctx) {
            return Err(self.halt(Fault { kind, pc, opcode }));
        }

        trace!(
            "{:04X} {:<14} v{:02X?} i{:04X} pc{:04X} ret{:04X?}",
            opcode,
            instruction.mnemonic,
            self.state.v,
            self.state.i,
            self.state.pc,
            self.state.stack.peek()
        );
        if let Mode::AwaitingKey { register } = self.state.mode {
            debug!("awaiting key for V{:X}", register);
        }

        Ok(Cycle::Executed {
            opcode,
            mnemonic: instruction.mnemonic,
        })
    }

    /// Stops the machine for good.
    /// The pc is put back on the faulting instruction.
    fn halt(&mut self, fault: Fault) -> Fault {
        self.state.pc = fault.pc;
        self.state.mode = Mode::Halted(fault);
        fault
    }

    /// Decrements both timers; called once per frame
    pub fn tick_timers(&mut self) {
        let was_sounding = self.sound_active();
        self.state.timers.tick();
        if was_sounding && !self.sound_active() {
            debug!("sound off");
        }
    }

    /// Runs one frame's worth of the machine
    /// - saves the current state for rewinding
    /// - executes `cycles` CPU cycles, stopping early on a fault
    /// - ticks the timers
    pub fn run_frame(&mut self, cycles: u32) -> Result<(), Fault> {
        self.save_state();
        let was_sounding = self.sound_active();
        for _ in 0..cycles {
            self.step()?;
        }
        if !was_sounding && self.sound_active() {
            debug!("sound on");
        }
        self.tick_timers();
        Ok(())
    }

    /// Reverses the machine by a single frame if possible
    /// - if there are previous_states, pops the last one and restores it
    /// - the restored frame is always redrawn
    pub fn reverse_frame(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = state;
                self.state.draw_flag = true;
                true
            }
            None => false,
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already MAX_SAVED_STATES saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.previous_states.len() == MAX_SAVED_STATES {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the draw flag
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// The FrameBuffer as it stands, whether or not it changed
    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(Quirks::default())
    }
}
