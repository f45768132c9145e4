//! Runs a Chip-8 ROM in an SDL2 window.
//!
//! ```bash
//! vip8 roms/pong.ch8 --ips 1000 --sprite-edge wrap
//! ```
//!
//! Keys `1234/QWER/ASDF/ZXCV` stand in for the hex keypad. Hold Space to
//! fast-forward, hold Backspace to rewind, press Escape to quit.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use vip8_core::constants::{DEFAULT_FPS, DEFAULT_IPS};
use vip8_core::{Chip8, Oversize, Quirks};
use vip8_display::{Palette, Rgb};

use crate::run::Settings;

mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = DEFAULT_IPS)]
    ips: u32,

    /// Timer ticks and screen refreshes per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Window pixels per Chip-8 pixel
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Seed for RND; random if unset
    #[arg(long)]
    seed: Option<u64>,

    /// Register shifted by 8XY6/8XYE
    #[arg(long, value_enum, default_value_t = ShiftSource::Vy)]
    shift_source: ShiftSource,

    /// How FX29 locates a digit's glyph
    #[arg(long, value_enum, default_value_t = FontAddressing::Scaled)]
    font_addressing: FontAddressing,

    /// What sprites do at the screen edge
    #[arg(long, value_enum, default_value_t = SpriteEdge::Clip)]
    sprite_edge: SpriteEdge,

    /// What happens to addresses past the end of memory
    #[arg(long, value_enum, default_value_t = Addressing::Wrap)]
    addressing: Addressing,

    /// What to do with a ROM too large for memory
    #[arg(long, value_enum, default_value_t = OversizeRom::Truncate)]
    oversize: OversizeRom,

    /// Color of lit pixels as RRGGBB
    #[arg(long, default_value = "ffffff")]
    foreground: Rgb,

    /// Color of unlit pixels as RRGGBB
    #[arg(long, default_value = "000000")]
    background: Rgb,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftSource {
    Vy,
    Vx,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum FontAddressing {
    Scaled,
    Unscaled,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SpriteEdge {
    Clip,
    Wrap,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Addressing {
    Wrap,
    Strict,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OversizeRom {
    Truncate,
    Reject,
}

impl Args {
    fn quirks(&self) -> Quirks {
        Quirks {
            shift_source: match self.shift_source {
                ShiftSource::Vy => vip8_core::ShiftSource::Vy,
                ShiftSource::Vx => vip8_core::ShiftSource::Vx,
            },
            font_addressing: match self.font_addressing {
                FontAddressing::Scaled => vip8_core::FontAddressing::Scaled,
                FontAddressing::Unscaled => vip8_core::FontAddressing::Unscaled,
            },
            sprite_edge: match self.sprite_edge {
                SpriteEdge::Clip => vip8_core::SpriteEdge::Clip,
                SpriteEdge::Wrap => vip8_core::SpriteEdge::Wrap,
            },
            addressing: match self.addressing {
                Addressing::Wrap => vip8_core::Addressing::Wrap,
                Addressing::Strict => vip8_core::Addressing::Strict,
            },
        }
    }

    fn oversize(&self) -> Oversize {
        match self.oversize {
            OversizeRom::Truncate => Oversize::Truncate,
            OversizeRom::Reject => Oversize::Reject,
        }
    }

    fn settings(&self) -> Settings {
        let name = self
            .rom
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Settings {
            ips: self.ips,
            fps: self.fps,
            scale: self.scale,
            palette: Palette {
                foreground: self.foreground,
                background: self.background,
            },
            title: format!("vip8 - {}", name),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.fps == 0 || args.ips == 0 {
        bail!("--ips and --fps must both be at least 1");
    }

    let quirks = args.quirks();
    let mut chip8 = match args.seed {
        Some(seed) => Chip8::with_seed(quirks, seed),
        None => Chip8::new(quirks),
    };
    info!("quirks: {:?}", chip8.quirks());

    let rom = fs::read(&args.rom)
        .with_context(|| format!("unable to read ROM {}", args.rom.display()))?;
    let loaded = chip8
        .load_rom(&rom, args.oversize())
        .with_context(|| format!("unable to load ROM {}", args.rom.display()))?;
    info!("successfully loaded {} byte ROM", loaded.bytes);

    run::run(chip8, args.settings())
}
