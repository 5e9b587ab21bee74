use proptest::prelude::*;

use vm8_core::Chip8;

/// Loads `program` and runs its first `steps` instructions
fn run(program: &[u16], steps: usize) -> Chip8 {
    let rom: Vec<u8> = program.iter().flat_map(|op| op.to_be_bytes()).collect();
    let mut chip8 = Chip8::new();
    chip8.load_rom(&rom).unwrap();
    for _ in 0..steps {
        chip8.step().unwrap();
    }
    chip8
}

fn ld(x: u8, nn: u8) -> u16 {
    0x6000 | u16::from(x) << 8 | u16::from(nn)
}

proptest! {
    #[test]
    fn skip_if_equal_to_byte(vx in any::<u8>(), nn in any::<u8>()) {
        let chip8 = run(&[ld(0x3, vx), 0x3300 | u16::from(nn)], 2);
        let expected = if vx == nn { 0x206 } else { 0x204 };
        prop_assert_eq!(chip8.counters().pc, expected);
    }

    #[test]
    fn skip_if_not_equal_to_byte(vx in any::<u8>(), nn in any::<u8>()) {
        let chip8 = run(&[ld(0x3, vx), 0x4300 | u16::from(nn)], 2);
        let expected = if vx != nn { 0x206 } else { 0x204 };
        prop_assert_eq!(chip8.counters().pc, expected);
    }

    #[test]
    fn skip_if_registers_equal(vx in 0u8..4, vy in 0u8..4) {
        let chip8 = run(&[ld(0x1, vx), ld(0x2, vy), 0x5120], 3);
        let expected = if vx == vy { 0x208 } else { 0x206 };
        prop_assert_eq!(chip8.counters().pc, expected);
    }

    #[test]
    fn skip_if_registers_differ(vx in 0u8..4, vy in 0u8..4) {
        let chip8 = run(&[ld(0x1, vx), ld(0x2, vy), 0x9120], 3);
        let expected = if vx != vy { 0x208 } else { 0x206 };
        prop_assert_eq!(chip8.counters().pc, expected);
    }

    #[test]
    fn add_registers_sets_carry(a in any::<u8>(), b in any::<u8>()) {
        let chip8 = run(&[ld(0x1, a), ld(0x2, b), 0x8124], 3);
        prop_assert_eq!(chip8.registers()[0x1], a.wrapping_add(b));
        prop_assert_eq!(chip8.registers()[0xF], u8::from(u16::from(a) + u16::from(b) > 0xFF));
    }

    #[test]
    fn sub_registers_sets_no_borrow(a in any::<u8>(), b in any::<u8>()) {
        let chip8 = run(&[ld(0x1, a), ld(0x2, b), 0x8125], 3);
        prop_assert_eq!(chip8.registers()[0x1], a.wrapping_sub(b));
        prop_assert_eq!(chip8.registers()[0xF], u8::from(a >= b));
    }

    #[test]
    fn store_then_load_registers(values in proptest::array::uniform16(any::<u8>()), x in 0u8..16) {
        let count = x as usize + 1;
        let mut program: Vec<u16> = (0..count as u8).map(|r| ld(r, values[r as usize])).collect();
        program.push(0xA400);
        program.push(0xF055 | u16::from(x) << 8);
        program.extend((0..count as u8).map(|r| ld(r, 0)));
        program.push(0xA400);
        program.push(0xF065 | u16::from(x) << 8);
        let steps = program.len();

        let chip8 = run(&program, steps);
        prop_assert_eq!(&chip8.registers()[..count], &values[..count]);
        prop_assert_eq!(chip8.memory().slice(0x400, count).unwrap(), &values[..count]);
    }

    #[test]
    fn drawing_twice_restores_frame(x in any::<u8>(), y in any::<u8>(), glyph in 0u8..16, n in 1u16..=5) {
        // draw glyph 8 at the origin, then the chosen glyph twice at (x, y)
        let program = [
            ld(0x0, 0x8),
            0xF029,
            ld(0x0, 0x0),
            0xD005,
            ld(0x1, x),
            ld(0x2, y),
            ld(0x3, glyph),
            0xF329,
            0xD120 | n,
            0xD120 | n,
        ];
        let mut chip8 = run(&program, 4);
        let before = *chip8.frame_buffer();
        chip8.step().unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();

        chip8.step().unwrap();
        let first_collision = chip8.registers()[0xF];
        let middle = *chip8.frame_buffer();
        chip8.step().unwrap();
        prop_assert_eq!(*chip8.frame_buffer(), before);

        // pixels the sprite touched are exactly those that changed
        let touched: Vec<(u8, u8)> = before
            .iter()
            .flatten()
            .zip(middle.iter().flatten())
            .filter(|(a, b)| a != b)
            .map(|(&a, &b)| (a, b))
            .collect();
        prop_assert_eq!(first_collision, u8::from(touched.iter().any(|&(_, lit)| lit == 0)));
        prop_assert_eq!(chip8.registers()[0xF], u8::from(touched.iter().any(|&(_, lit)| lit == 1)));
    }

    #[test]
    fn call_then_return_restores_pc(target in 0x102u16..0x7FE) {
        let target = target * 2;
        let mut rom = vec![0u8; target as usize + 2 - 0x200];
        rom[0] = 0x20 | (target >> 8) as u8;
        rom[1] = target as u8;
        let offset = target as usize - 0x200;
        rom[offset] = 0x00;
        rom[offset + 1] = 0xEE;

        let mut chip8 = Chip8::new();
        chip8.load_rom(&rom).unwrap();
        chip8.step().unwrap();
        prop_assert_eq!(chip8.stack(), &[0x202]);
        chip8.step().unwrap();
        prop_assert_eq!(chip8.counters().pc, 0x202);
        prop_assert!(chip8.stack().is_empty());
    }
}

#[test]
fn bcd_of_234() {
    let chip8 = run(&[ld(0x5, 234), 0xA300, 0xF533], 3);
    assert_eq!(chip8.memory().slice(0x300, 3).unwrap(), &[2, 3, 4]);
}

#[test]
fn unknown_opcode_advances() {
    let chip8 = run(&[0x5001], 1);
    assert_eq!(chip8.counters().pc, 0x202);
}
