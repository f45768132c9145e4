//! SDL2 window that draws a Chip-8 frame buffer.

pub use display::{Display, DisplayError, Palette, Rgb};

mod display;
