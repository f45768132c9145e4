//! A Chip-8 interpreter core with no opinions about windows, keyboards or clocks.
//!
//! Drive it by calling [`Chip8::run_frame`] (or [`Chip8::step`] and [`Chip8::tick_timers`])
//! at 60Hz and drawing whatever [`Chip8::take_frame`] hands back.

pub use chip8::{Chip8, Cycle, Loaded, Oversize};
pub use error::{Fault, FaultKind, RomError};
pub use frame::FrameBuffer;
pub use keypad::Keypad;
pub use quirks::{Addressing, FontAddressing, Quirks, ShiftSource, SpriteEdge};
pub use state::{Mode, State};

mod chip8;
pub mod constants;
mod error;
pub mod frame;
mod instruction;
mod keypad;
mod opcode;
mod operations;
mod quirks;
mod stack;
pub mod state;
mod timers;

pub use stack::Stack;
pub use timers::Timers;
