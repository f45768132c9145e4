use rand::rngs::StdRng;
use rand::Rng;

use crate::constants::{FONT_BASE, GLYPH_SIZE};
use crate::error::FaultKind;
use crate::frame;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::quirks::{FontAddressing, Quirks, ShiftSource};
use crate::state::{Mode, State, VF};

/// Everything an operation may consult besides the machine state itself.
pub struct Context<'a> {
    pub keypad: &'a Keypad,
    pub quirks: &'a Quirks,
    pub rng: &'a mut StdRng,
}

/// Operations run after the pc has already moved past their opcode.
pub type Operation = fn(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind>;

/// clear
pub fn clr(_op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    frame::clear(&mut state.frame_buffer);
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
pub fn rts(_op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.pc = state.stack.pop()?;
    Ok(())
}

/// PC = addr
pub fn jump(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.pc = op.nnn();
    Ok(())
}

/// STACK.push(PC); PC = addr
pub fn call(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.stack.push(state.pc)?;
    state.pc = op.nnn();
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    if state.v[op.x()] == op.nn() {
        state.skip();
    }
    Ok(())
}

/// if Vx != kk then pc += 2
pub fn skne(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    if state.v[op.x()] != op.nn() {
        state.skip();
    }
    Ok(())
}

/// if Vx == Vy then pc += 2
pub fn skre(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    if state.v[op.x()] == state.v[op.y()] {
        state.skip();
    }
    Ok(())
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    if state.v[op.x()] != state.v[op.y()] {
        state.skip();
    }
    Ok(())
}

/// Vx = kk
pub fn load(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.v[op.x()] = op.nn();
    Ok(())
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.nn());
    Ok(())
}

/// Vx = Vy
pub fn mv(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.v[op.x()] = state.v[op.y()];
    Ok(())
}

/// Vx |= Vy
pub fn or(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.v[op.x()] |= state.v[op.y()];
    Ok(())
}

/// Vx &= Vy
pub fn and(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.v[op.x()] &= state.v[op.y()];
    Ok(())
}

/// Vx ^= Vy
pub fn xor(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.v[op.x()] ^= state.v[op.y()];
    Ok(())
}

// The flag is written after the result so that it wins when x is VF.

/// Vx += Vy; VF = overflow
pub fn addr(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[VF] = u8::from(over);
    Ok(())
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    let (res, under) = state.v[op.x()].overflowing_sub(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[VF] = u8::from(!under);
    Ok(())
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    let (res, under) = state.v[op.y()].overflowing_sub(state.v[op.x()]);
    state.v[op.x()] = res;
    state.v[VF] = u8::from(!under);
    Ok(())
}

fn shift_source(op: u16, state: &State, quirks: &Quirks) -> u8 {
    match quirks.shift_source {
        ShiftSource::Vy => state.v[op.y()],
        ShiftSource::Vx => state.v[op.x()],
    }
}

/// Vx = src >> 1; VF = shifted out bit
pub fn shr(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    let src = shift_source(op, state, ctx.quirks);
    state.v[op.x()] = src >> 1;
    state.v[VF] = src & 0x1;
    Ok(())
}

/// Vx = src << 1; VF = shifted out bit
pub fn shl(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    let src = shift_source(op, state, ctx.quirks);
    state.v[op.x()] = src << 1;
    state.v[VF] = src >> 7;
    Ok(())
}

/// I = addr
pub fn loadi(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.i = op.nnn();
    Ok(())
}

/// PC = V0 + addr
pub fn jumpi(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.pc = op.nnn() + u16::from(state.v[0x0]);
    Ok(())
}

/// Vx = rand_byte & kk
pub fn rnd(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    let rand_byte: u8 = ctx.rng.gen();
    state.v[op.x()] = rand_byte & op.nn();
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
/// Sets VF if any pixels were erased
pub fn draw(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    let mut sprite = [0; 16];
    let rows = &mut sprite[..usize::from(op.n())];
    state.read_from_i(rows, ctx.quirks.addressing)?;
    let (x, y) = (state.v[op.x()], state.v[op.y()]);

    // Reset the flag (used for collision detection)
    state.v[VF] = 0x0;
    let collision = frame::draw_sprite(&mut state.frame_buffer, x, y, rows, ctx.quirks.sprite_edge);
    state.v[VF] = u8::from(collision);
    state.draw_flag = true;
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    if ctx.keypad.is_pressed(state.v[op.x()]) {
        state.skip();
    }
    Ok(())
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    if !ctx.keypad.is_pressed(state.v[op.x()]) {
        state.skip();
    }
    Ok(())
}

/// Vx = DT
pub fn getdt(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.v[op.x()] = state.timers.delay();
    Ok(())
}

/// await keypress for Vx
/// A key that is already held is taken straight away; otherwise the machine waits for one.
pub fn keyd(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    match ctx.keypad.first_pressed() {
        Some(key) => state.v[op.x()] = key,
        None => state.mode = Mode::AwaitingKey { register: op.x() },
    }
    Ok(())
}

/// DT = Vx
pub fn setdt(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.timers.set_delay(state.v[op.x()]);
    Ok(())
}

/// ST = Vx
pub fn setst(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.timers.set_sound(state.v[op.x()]);
    Ok(())
}

/// I += Vx; VF = 1 if I leaves the 12-bit address space
/// VF is left alone when it doesn't.
pub fn addi(op: u16, state: &mut State, _ctx: &mut Context) -> Result<(), FaultKind> {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x()]));
    if state.i > 0x0FFF {
        state.v[VF] = 0x1;
    }
    Ok(())
}

/// I = address of the sprite for digit Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    let digit = u16::from(state.v[op.x()]);
    state.i = match ctx.quirks.font_addressing {
        FontAddressing::Scaled => FONT_BASE + digit * GLYPH_SIZE,
        FontAddressing::Unscaled => FONT_BASE + digit,
    };
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    let value = state.v[op.x()];
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.write_from_i(&digits, ctx.quirks.addressing)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    let registers = state.v;
    state.write_from_i(&registers[..=op.x()], ctx.quirks.addressing)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: u16, state: &mut State, ctx: &mut Context) -> Result<(), FaultKind> {
    let mut registers = [0; 16];
    let bytes = &mut registers[..=op.x()];
    state.read_from_i(bytes, ctx.quirks.addressing)?;
    state.v[..=op.x()].copy_from_slice(bytes);
    Ok(())
}
