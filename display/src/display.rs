use std::str::FromStr;

use sdl2::pixels::PixelFormatEnum;
use thiserror::Error;

use vip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vip8_core::FrameBuffer;

const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("sdl: {0}")]
    Sdl(String),
    #[error("invalid color {0:?}; expected six hex digits like ffb000")]
    Color(String),
}

fn sdl_err(e: impl ToString) -> DisplayError {
    DisplayError::Sdl(e.to_string())
}

/// An RGB color, parsed from `RRGGBB` with an optional leading `#`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(DisplayError::Color(s.to_string()));
        }
        let channel = |at: usize| {
            u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| DisplayError::Color(s.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Colors for lit and unlit pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Rgb,
    pub background: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            foreground: Rgb(0xFF, 0xFF, 0xFF),
            background: Rgb(0x00, 0x00, 0x00),
        }
    }
}

/// # Display
/// The Chip-8 display is composed of 64x32 pixels black/white pixels.
/// The on/off state of these pixels is encoded as true/false respectively in a 2d array of 64x32 bools.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    palette: Palette,
    title: String,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `title` the window title
    /// * `scale` the size multiplier for each pixel
    /// * `palette` the colors to draw with
    pub fn new(sdl: &sdl2::Sdl, title: &str, scale: u32, palette: Palette) -> Result<Self, DisplayError> {
        let video_subsystem = sdl.video().map_err(sdl_err)?;
        let window = video_subsystem
            .window(title, DISPLAY_WIDTH as u32 * scale, DISPLAY_HEIGHT as u32 * scale)
            .position_centered()
            .build()
            .map_err(sdl_err)?;
        let canvas = window.into_canvas().build().map_err(sdl_err)?;

        let mut display = Display {
            canvas,
            palette,
            title: title.to_string(),
        };
        display.render(&vip8_core::frame::BLANK_FRAME)?;
        Ok(display)
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 RGB24 texture is a 1D array of bytes; each row is `pitch` bytes long and holds
    /// three bytes per pixel followed by any padding.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    /// * `palette` the colors for lit and unlit pixels
    /// * `pitch` the length of a texture row in bytes
    fn frame_to_sdl_texture(frame: &FrameBuffer, palette: &Palette, pitch: usize) -> Vec<u8> {
        let mut texture = vec![0; pitch * DISPLAY_HEIGHT];
        for (row, pixels) in texture.chunks_mut(pitch).zip(frame.iter()) {
            for (pixel, &lit) in row.chunks_mut(BYTES_PER_PIXEL).zip(pixels.iter()) {
                let Rgb(r, g, b) = if lit {
                    palette.foreground
                } else {
                    palette.background
                };
                pixel.copy_from_slice(&[r, g, b]);
            }
        }
        texture
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32)
            .map_err(sdl_err)?;

        let palette = self.palette;
        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                let pixels = Display::frame_to_sdl_texture(frame, &palette, pitch);
                let len = buffer.len().min(pixels.len());
                buffer[..len].copy_from_slice(&pixels[..len]);
            })
            .map_err(sdl_err)?;

        self.canvas.copy(&texture, None, None).map_err(sdl_err)?;
        self.canvas.present();
        Ok(())
    }

    /// Shows whether the machine is beeping in the window title.
    /// There is no audio output; this is the sound timer made visible.
    pub fn show_sound(&mut self, active: bool) -> Result<(), DisplayError> {
        let title = if active {
            format!("{} \u{266A}", self.title)
        } else {
            self.title.clone()
        };
        self.canvas.window_mut().set_title(&title).map_err(sdl_err)
    }
}
