use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::quirks::SpriteEdge;

/// The FrameBuffer is indexed as [y][x]; `true` is a lit pixel.
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

pub const BLANK_FRAME: FrameBuffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Unlights every pixel
pub fn clear(frame: &mut FrameBuffer) {
    *frame = BLANK_FRAME;
}

/// XORs an 8 pixel wide sprite onto the frame with its top left corner at `(x, y)`.
///
/// The origin is wrapped onto the screen once; `edge` decides what happens to the pixels that
/// then run past the right or bottom edge.
///
/// Returns whether any lit pixel was turned off.
pub fn draw_sprite(
    frame: &mut FrameBuffer,
    x: u8,
    y: u8,
    rows: &[u8],
    edge: SpriteEdge,
) -> bool {
    let origin_x = usize::from(x) % DISPLAY_WIDTH;
    let origin_y = usize::from(y) % DISPLAY_HEIGHT;
    let mut collision = false;

    for (row, byte) in rows.iter().enumerate() {
        let py = match place(origin_y + row, DISPLAY_HEIGHT, edge) {
            Some(py) => py,
            None => break,
        };
        for bit in 0..8 {
            if byte & (0x80 >> bit) == 0 {
                continue;
            }
            let px = match place(origin_x + bit, DISPLAY_WIDTH, edge) {
                Some(px) => px,
                None => break,
            };
            let pixel = &mut frame[py][px];
            collision |= *pixel;
            *pixel = !*pixel;
        }
    }

    collision
}

fn place(coordinate: usize, limit: usize, edge: SpriteEdge) -> Option<usize> {
    match edge {
        SpriteEdge::Clip if coordinate >= limit => None,
        SpriteEdge::Clip => Some(coordinate),
        SpriteEdge::Wrap => Some(coordinate % limit),
    }
}

/// Number of lit pixels in the frame
pub fn lit(frame: &FrameBuffer) -> usize {
    frame.iter().flatten().filter(|&&p| p).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_msb_first() {
        let mut frame = BLANK_FRAME;
        let collided = draw_sprite(&mut frame, 1, 1, &[0b1010_0000], SpriteEdge::Clip);
        assert!(!collided);
        assert_eq!(frame[1][1..5], [true, false, true, false]);
        assert_eq!(lit(&frame), 2);
    }

    #[test]
    fn test_redraw_erases_and_collides() {
        let mut frame = BLANK_FRAME;
        let sprite = [0xF0, 0x90, 0xF0];
        draw_sprite(&mut frame, 10, 10, &sprite, SpriteEdge::Clip);
        assert!(draw_sprite(&mut frame, 10, 10, &sprite, SpriteEdge::Clip));
        assert_eq!(frame, BLANK_FRAME);
    }

    #[test]
    fn test_origin_wraps_once() {
        let mut frame = BLANK_FRAME;
        // (64 + 2, 32 + 3) lands on (2, 3)
        draw_sprite(&mut frame, 66, 35, &[0x80], SpriteEdge::Clip);
        assert!(frame[3][2]);
        assert_eq!(lit(&frame), 1);
    }

    #[test]
    fn test_clips_right_and_bottom_edges() {
        let mut frame = BLANK_FRAME;
        draw_sprite(&mut frame, 60, 30, &[0xFF, 0xFF, 0xFF], SpriteEdge::Clip);
        // 4 columns by 2 rows survive
        assert_eq!(lit(&frame), 8);
        assert!(frame[31][63]);
        assert!(!frame[0][0]);
    }

    #[test]
    fn test_wraps_right_and_bottom_edges() {
        let mut frame = BLANK_FRAME;
        draw_sprite(&mut frame, 60, 31, &[0xFF, 0xFF], SpriteEdge::Wrap);
        assert_eq!(lit(&frame), 16);
        assert!(frame[0][0..4].iter().all(|&p| p));
        assert!(frame[31][60..64].iter().all(|&p| p));
    }

    #[test]
    fn test_clear() {
        let mut frame = [[true; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        clear(&mut frame);
        assert_eq!(lit(&frame), 0);
    }
}
