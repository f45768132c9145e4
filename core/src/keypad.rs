/// # Keypad
/// Chip-8 input is generated with a 16 key hexadecimal keypad.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
///
/// The machine only ever reads this; it is refreshed from outside between cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            pressed: [false; 16],
        }
    }

    /// Keys outside 0x0..=0xF are ignored.
    pub fn press(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(usize::from(key)) {
            *pressed = true;
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(usize::from(key)) {
            *pressed = false;
        }
    }

    /// Registers may hold any byte; only the low nibble names a key.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed[usize::from(key & 0xF)]
    }

    /// The lowest numbered key currently held down
    pub fn first_pressed(&self) -> Option<u8> {
        self.pressed.iter().position(|&p| p).map(|key| key as u8)
    }
}

impl From<[bool; 16]> for Keypad {
    fn from(pressed: [bool; 16]) -> Self {
        Keypad { pressed }
    }
}
