use crate::opcode::Opcode;
use crate::operations::*;

/// A decoded opcode: what to call it and how to carry it out
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub execute: Operation,
}

const fn instruction(mnemonic: &'static str, execute: Operation) -> Option<Instruction> {
    Some(Instruction { mnemonic, execute })
}

/// Selects the correct Instruction for a given Opcode
///
/// Returns `None` for opcodes that aren't part of the Chip-8 instruction set.
pub fn from_op(op: u16) -> Option<Instruction> {
    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => instruction("CLS", clr),
        (0x0, 0x0, 0xE, 0xE) => instruction("RET", rts),
        (0x1, ..) => instruction("JP addr", jump),
        (0x2, ..) => instruction("CALL addr", call),
        (0x3, ..) => instruction("SE Vx, byte", ske),
        (0x4, ..) => instruction("SNE Vx, byte", skne),
        (0x5, ..) => instruction("SE Vx, Vy", skre),
        (0x6, ..) => instruction("LD Vx, byte", load),
        (0x7, ..) => instruction("ADD Vx, byte", add),
        (0x8, .., 0x0) => instruction("LD Vx, Vy", mv),
        (0x8, .., 0x1) => instruction("OR Vx, Vy", or),
        (0x8, .., 0x2) => instruction("AND Vx, Vy", and),
        (0x8, .., 0x3) => instruction("XOR Vx, Vy", xor),
        (0x8, .., 0x4) => instruction("ADD Vx, Vy", addr),
        (0x8, .., 0x5) => instruction("SUB Vx, Vy", sub),
        (0x8, .., 0x6) => instruction("SHR Vx, Vy", shr),
        (0x8, .., 0x7) => instruction("SUBN Vx, Vy", subn),
        (0x8, .., 0xE) => instruction("SHL Vx, Vy", shl),
        (0x9, ..) => instruction("SNE Vx, Vy", skrne),
        (0xA, ..) => instruction("LD I, addr", loadi),
        (0xB, ..) => instruction("JP V0, addr", jumpi),
        (0xC, ..) => instruction("RND Vx, byte", rnd),
        (0xD, ..) => instruction("DRW Vx, Vy, n", draw),
        (0xE, _, 0x9, 0xE) => instruction("SKP Vx", skpr),
        (0xE, _, 0xA, 0x1) => instruction("SKNP Vx", skup),
        (0xF, _, 0x0, 0x7) => instruction("LD Vx, DT", getdt),
        (0xF, _, 0x0, 0xA) => instruction("LD Vx, K", keyd),
        (0xF, _, 0x1, 0x5) => instruction("LD DT, Vx", setdt),
        (0xF, _, 0x1, 0x8) => instruction("LD ST, Vx", setst),
        (0xF, _, 0x1, 0xE) => instruction("ADD I, Vx", addi),
        (0xF, _, 0x2, 0x9) => instruction("LD F, Vx", ldspr),
        (0xF, _, 0x3, 0x3) => instruction("LD B, Vx", bcd),
        (0xF, _, 0x5, 0x5) => instruction("LD [I], Vx", stor),
        (0xF, _, 0x6, 0x5) => instruction("LD Vx, [I]", read),
        _ => None,
    }
}

#[cfg(test)]
mod test_instruction {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_BASE, SPRITE_SHEET};
    use crate::error::FaultKind;
    use crate::frame::BLANK_FRAME;
    use crate::keypad::Keypad;
    use crate::quirks::{Addressing, FontAddressing, Quirks, ShiftSource};
    use crate::state::{Mode, State, VF};

    /// Executes `op` the way the machine would: with the pc already moved past it
    fn exec_with(
        op: u16,
        state: &mut State,
        keypad: Keypad,
        quirks: Quirks,
    ) -> Result<(), FaultKind> {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut ctx = Context {
            keypad: &keypad,
            quirks: &quirks,
            rng: &mut rng,
        };
        let instruction = from_op(op).expect("opcode should decode");
        state.pc += 0x2;
        (instruction.execute)(op, state, &mut ctx)
    }

    fn exec(op: u16, state: &mut State) -> Result<(), FaultKind> {
        exec_with(op, state, Keypad::new(), Quirks::default())
    }

    fn pressing(key: u8) -> Keypad {
        let mut keypad = Keypad::new();
        keypad.press(key);
        keypad
    }

    #[test]
    fn test_unknown_opcodes_dont_decode() {
        for op in [0x0000, 0x00E1, 0x0123, 0x8128, 0xE19F, 0xF1FF] {
            assert!(from_op(op).is_none(), "{:04X} decoded", op);
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(from_op(0x00E0).unwrap().mnemonic, "CLS");
        assert_eq!(from_op(0xD125).unwrap().mnemonic, "DRW Vx, Vy, n");
        assert_eq!(from_op(0xF565).unwrap().mnemonic, "LD Vx, [I]");
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer[0][0] = true;
        state.frame_buffer[31][63] = true;
        exec(0x00E0, &mut state).unwrap();
        assert_eq!(state.frame_buffer, BLANK_FRAME);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.stack.push(0x0ABC).unwrap();
        exec(0x00EE, &mut state).unwrap();
        assert!(state.stack.is_empty());
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let mut state = State::new();
        assert_eq!(exec(0x00EE, &mut state), Err(FaultKind::StackUnderflow));
    }

    #[test]
    fn test_1nnn_jp() {
        let mut state = State::new();
        exec(0x1ABC, &mut state).unwrap();
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_1nnn_jp_to_self() {
        let mut state = State::new();
        exec(0x1200, &mut state).unwrap();
        assert_eq!(state.pc, 0x0200);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        exec(0x2123, &mut state).unwrap();
        assert_eq!(state.stack.depth(), 1);
        // the return address is the instruction after the call
        assert_eq!(state.stack.peek(), Some(0x0202));
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut state = State::new();
        for _ in 0..16 {
            state.stack.push(0x0200).unwrap();
        }
        assert_eq!(exec(0x2123, &mut state), Err(FaultKind::StackOverflow));
    }

    #[test]
    fn test_3xkk_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        exec(0x3111, &mut state).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_3xkk_se_doesntskip() {
        let mut state = State::new();
        exec(0x3111, &mut state).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_4xkk_sne_skips() {
        let mut state = State::new();
        exec(0x4111, &mut state).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_4xkk_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        exec(0x4111, &mut state).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        exec(0x5120, &mut state).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        exec(0x5120, &mut state).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xyn_se_ignores_low_nibble() {
        let mut state = State::new();
        state.v[0x0] = 0x01;
        state.v[0x1] = 0x01;
        exec(0x5011, &mut state).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_6xkk_ld() {
        let mut state = State::new();
        exec(0x6122, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xkk_add_wraps_without_flag() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        exec(0x7102, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x01);
        assert_eq!(state.v[VF], 0x0);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        exec(0x8120, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        exec(0x8121, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        exec(0x8122, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        exec(0x8123, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = State::new();
        state.v[0x1] = 10;
        state.v[0x2] = 10;
        exec(0x8124, &mut state).unwrap();
        assert_eq!(state.v[0x1], 20);
        assert_eq!(state.v[VF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 250;
        state.v[0x2] = 10;
        exec(0x8124, &mut state).unwrap();
        assert_eq!(state.v[0x1], 4);
        assert_eq!(state.v[VF], 0x1);
    }

    #[test]
    fn test_8xy4_flag_wins_over_vf_result() {
        let mut state = State::new();
        state.v[VF] = 0xFF;
        state.v[0x2] = 0x01;
        exec(0x8F24, &mut state).unwrap();
        assert_eq!(state.v[VF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 10;
        state.v[0x2] = 5;
        exec(0x8125, &mut state).unwrap();
        assert_eq!(state.v[0x1], 5);
        assert_eq!(state.v[VF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 5;
        state.v[0x2] = 10;
        exec(0x8125, &mut state).unwrap();
        assert_eq!(state.v[0x1], 251);
        assert_eq!(state.v[VF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_equal_sets_flag() {
        let mut state = State::new();
        state.v[0x1] = 7;
        state.v[0x2] = 7;
        exec(0x8125, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0);
        assert_eq!(state.v[VF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_takes_vy() {
        let mut state = State::new();
        state.v[0x1] = 0xF0;
        state.v[0x2] = 0x5;
        exec(0x8126, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[VF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_takes_vx_when_configured() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        state.v[0x2] = 0x5;
        let quirks = Quirks {
            shift_source: ShiftSource::Vx,
            ..Quirks::default()
        };
        exec_with(0x8126, &mut state, Keypad::new(), quirks).unwrap();
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[VF], 0x0);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        exec(0x8127, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[VF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        exec(0x8127, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[VF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = State::new();
        state.v[0x2] = 0xFF;
        exec(0x812E, &mut state).unwrap();
        // 0xFF << 1 = 0x01FE
        assert_eq!(state.v[0x1], 0xFE);
        assert_eq!(state.v[VF], 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb_from_vx() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        state.v[0x2] = 0xFF;
        let quirks = Quirks {
            shift_source: ShiftSource::Vx,
            ..Quirks::default()
        };
        exec_with(0x812E, &mut state, Keypad::new(), quirks).unwrap();
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[VF], 0x0);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        exec(0x9120, &mut state).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        exec(0x9120, &mut state).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_9xyn_sne_ignores_low_nibble() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        exec(0x912F, &mut state).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_annn_ld() {
        let mut state = State::new();
        exec(0xAABC, &mut state).unwrap();
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        exec(0xBABC, &mut state).unwrap();
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_cxkk_rnd_is_masked() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        exec(0xC10F, &mut state).unwrap();
        assert_eq!(state.v[0x1] & 0xF0, 0x0);
        exec(0xC200, &mut state).unwrap();
        assert_eq!(state.v[0x2], 0x0);
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        state.i = FONT_BASE;
        // Draw the 0x0 sprite with a 1x 1y offset
        exec(0xD005, &mut state).unwrap();
        let mut expected = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[true, true, true, true]);
        expected[2][1..5].copy_from_slice(&[true, false, false, true]);
        expected[3][1..5].copy_from_slice(&[true, false, false, true]);
        expected[4][1..5].copy_from_slice(&[true, false, false, true]);
        expected[5][1..5].copy_from_slice(&[true, true, true, true]);
        assert_eq!(state.frame_buffer, expected);
        assert_eq!(state.v[VF], 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = State::new();
        state.i = FONT_BASE;
        state.frame_buffer[0][0] = true;
        exec(0xD011, &mut state).unwrap();
        assert_eq!(state.v[VF], 0x1)
    }

    #[test]
    fn test_dxyn_drw_xors() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300] = 0b1100_0000;
        state.v[0x0] = 0x2;
        // 0 1 0 1 -> Set
        state.frame_buffer[0][2..6].copy_from_slice(&[false, true, false, true]);
        // 1 1 0 0 -> Draw xor
        exec(0xD011, &mut state).unwrap();
        assert_eq!(state.frame_buffer[0][2..6], [true, false, false, true]);
    }

    #[test]
    fn test_dxyn_drw_twice_erases() {
        let mut state = State::new();
        state.i = FONT_BASE + 8 * 5;
        state.v[0x3] = 20;
        state.v[0x4] = 12;
        exec(0xD345, &mut state).unwrap();
        assert_eq!(state.v[VF], 0x0);
        exec(0xD345, &mut state).unwrap();
        assert_eq!(state.v[VF], 0x1);
        assert_eq!(state.frame_buffer, BLANK_FRAME);
    }

    #[test]
    fn test_dxyn_drw_faults_past_memory_when_strict() {
        let mut state = State::new();
        state.i = 0x0FFE;
        let quirks = Quirks {
            addressing: Addressing::Strict,
            ..Quirks::default()
        };
        assert_eq!(
            exec_with(0xD003, &mut state, Keypad::new(), quirks),
            Err(FaultKind::AddressOutOfRange(0x1000))
        );
        assert_eq!(state.frame_buffer, BLANK_FRAME);
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = State::new();
        state.v[0x1] = 0xE;
        exec_with(0xE19E, &mut state, pressing(0xE), Quirks::default()).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let mut state = State::new();
        exec(0xE19E, &mut state).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let mut state = State::new();
        exec(0xE1A1, &mut state).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0xE;
        exec_with(0xE1A1, &mut state, pressing(0xE), Quirks::default()).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = State::new();
        state.timers.set_delay(0xF);
        exec(0xF107, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_ld_awaits_key() {
        let mut state = State::new();
        exec(0xF10A, &mut state).unwrap();
        assert_eq!(state.mode, Mode::AwaitingKey { register: 0x1 });
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx0a_ld_takes_held_key() {
        let mut state = State::new();
        exec_with(0xF10A, &mut state, pressing(0x9), Quirks::default()).unwrap();
        assert_eq!(state.mode, Mode::Running);
        assert_eq!(state.v[0x1], 0x9);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        exec(0xF115, &mut state).unwrap();
        assert_eq!(state.timers.delay(), 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        exec(0xF118, &mut state).unwrap();
        assert_eq!(state.timers.sound(), 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        exec(0xF11E, &mut state).unwrap();
        assert_eq!(state.i, 0x2);
        assert_eq!(state.v[VF], 0x0);
    }

    #[test]
    fn test_fx1e_add_flags_overflow() {
        let mut state = State::new();
        state.i = 0x0FFF;
        state.v[0x1] = 0x1;
        exec(0xF11E, &mut state).unwrap();
        assert_eq!(state.i, 0x1000);
        assert_eq!(state.v[VF], 0x1);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xA;
        exec(0xF129, &mut state).unwrap();
        assert_eq!(state.i, 0x050 + 0xA * 5);
        let glyph = usize::from(state.i);
        assert_eq!(state.memory[glyph..glyph + 5], SPRITE_SHEET[50..55]);
    }

    #[test]
    fn test_fx29_ld_unscaled() {
        let mut state = State::new();
        state.v[0x1] = 0xA;
        let quirks = Quirks {
            font_addressing: FontAddressing::Unscaled,
            ..Quirks::default()
        };
        exec_with(0xF129, &mut state, Keypad::new(), quirks).unwrap();
        assert_eq!(state.i, 0x050 + 0xA);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = State::new();
        // 0x9D -> 157
        state.v[0x1] = 0x9D;
        state.i = 0x300;
        exec(0xF133, &mut state).unwrap();
        assert_eq!(state.memory[0x300..0x303], [0x1, 0x5, 0x7]);
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        exec(0xF455, &mut state).unwrap();
        assert_eq!(state.memory[0x300..0x306], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        // I is left where it was
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x306].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5, 0x6]);
        exec(0xF465, &mut state).unwrap();
        assert_eq!(state.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
    }
}
