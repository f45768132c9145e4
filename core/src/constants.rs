/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where ROMs are loaded into memory
pub const PROGRAM_START: u16 = 0x200;

/// Where the sprite sheet is installed
pub const FONT_BASE: u16 = 0x050;

/// Bytes per glyph in the sprite sheet
pub const GLYPH_SIZE: u16 = 5;

/// Number of return addresses the call stack can hold
pub const STACK_DEPTH: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Instructions executed per second unless configured otherwise
pub const DEFAULT_IPS: u32 = 700;

/// Frames per second; the timers tick once per frame
pub const DEFAULT_FPS: u32 = 60;

/// Frames of history kept for rewinding (10 seconds at 60fps)
pub const MAX_SAVED_STATES: usize = 600;

/// # Sprite Sheet
/// Hexadecimal digits 0..F, each 8 pixels wide and 5 rows tall.
/// Only the high nibble of each row is lit.
///
/// ```text
/// "0"   Binary   Hex
/// ****  11110000 0xF0
/// *  *  10010000 0x90
/// *  *  10010000 0x90
/// *  *  10010000 0x90
/// ****  11110000 0xF0
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
