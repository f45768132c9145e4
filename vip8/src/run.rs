use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{debug, error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vip8_core::Chip8;
use vip8_display::{Display, Palette};

use crate::keymap::keymap;

/// How the window and frame loop should behave
pub struct Settings {
    pub ips: u32,
    pub fps: u32,
    pub scale: u32,
    pub palette: Palette,
    pub title: String,
}

impl Settings {
    /// Instructions executed between two timer ticks; at least one
    pub fn cycles_per_frame(&self) -> u32 {
        (self.ips / self.fps.max(1)).max(1)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

pub fn run(mut chip8: Chip8, settings: Settings) -> Result<()> {
    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, &settings.title, settings.scale, settings.palette)?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let cycles = settings.cycles_per_frame();
    let frame_time = settings.frame_time();
    info!(
        "running {} instructions per frame at {} frames per second",
        cycles, settings.fps
    );

    // Whether or not the frame rate should be respected
    let mut fast_forward = false;
    // Whether the game's state should be cycled forwards or backwards
    let mut rewind = false;
    let mut sounding = false;

    'event: loop {
        let frame_start = Instant::now();

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Backspace, _) => rewind = true,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc),
                    (Keycode::Space, _) => fast_forward = false,
                    (Keycode::Backspace, _) => rewind = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        if rewind {
            if !chip8.reverse_frame() {
                debug!("no earlier frames to rewind to");
            }
        } else if let Err(fault) = chip8.run_frame(cycles) {
            error!("machine halted: {}", fault);
            return Err(fault.into());
        }

        if chip8.sound_active() != sounding {
            sounding = chip8.sound_active();
            display.show_sound(sounding)?;
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(frame)?;
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if !fast_forward && frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(ips: u32, fps: u32) -> Settings {
        Settings {
            ips,
            fps,
            scale: 10,
            palette: Palette::default(),
            title: "test".to_string(),
        }
    }

    #[test]
    fn test_cycles_per_frame() {
        assert_eq!(settings(700, 60).cycles_per_frame(), 11);
        assert_eq!(settings(600, 60).cycles_per_frame(), 10);
        assert_eq!(settings(10, 60).cycles_per_frame(), 1);
    }

    #[test]
    fn test_frame_time() {
        assert_eq!(settings(700, 50).frame_time(), Duration::from_millis(20));
        assert_eq!(settings(700, 0).frame_time(), Duration::from_secs(1));
    }
}
