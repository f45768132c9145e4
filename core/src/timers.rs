/// # Timers
/// The delay and sound timers count down towards 0 once per tick.
///
/// Ticks are driven at 60Hz by whoever runs the machine, independent of how many instructions
/// execute in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Timers { delay: 0, sound: 0 }
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Whether a tone should currently be playing
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Decrements each non-zero timer by one
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_counts_down_to_zero() {
        let mut timers = Timers::new();
        timers.set_delay(5);
        for _ in 0..5 {
            timers.tick();
        }
        assert_eq!(timers.delay(), 0);
        timers.tick();
        assert_eq!(timers.delay(), 0);
    }

    #[test]
    fn test_timers_tick_independently() {
        let mut timers = Timers::new();
        timers.set_delay(1);
        timers.set_sound(3);
        timers.tick();
        assert_eq!(timers.delay(), 0);
        assert_eq!(timers.sound(), 2);
    }

    #[test]
    fn test_sound_active_while_positive() {
        let mut timers = Timers::new();
        assert!(!timers.sound_active());
        timers.set_sound(1);
        assert!(timers.sound_active());
        timers.tick();
        assert!(!timers.sound_active());
    }
}
