/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within the 0x5, 0x8, 0x9 and 0xE families
/// - `(_, _, n, n)` specific behavior within the 0x0 and 0xF families
///
/// Nibbles not used to determine the operation carry its operands.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
pub trait Opcode {
    /// The Opcode's most significant nibble, left in place.
    /// `[o___]`
    fn family(&self) -> u16;

    /// The Opcode's second nibble.
    /// `[_x__]`
    fn x(&self) -> u8;

    /// The Opcode's third nibble.
    /// `[__y_]`
    fn y(&self) -> u8;

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The Opcode's least significant byte.
    /// `[__nn]`
    fn nn(&self) -> u8;

    /// The Opcode without its most significant nibble.
    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn family(&self) -> u16 {
        self & 0xF000
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

/// An opcode split into every field an instruction might read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub opcode: u16,
    pub o: u16,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Decoded {
    /// The family's top nibble as a 0x0..=0xF value
    pub fn family_nibble(&self) -> u8 {
        (self.o >> 12) as u8
    }
}

pub fn decode(opcode: u16) -> Decoded {
    Decoded {
        opcode,
        o: opcode.family(),
        x: opcode.x(),
        y: opcode.y(),
        n: opcode.n(),
        nn: opcode.nn(),
        nnn: opcode.nnn(),
    }
}
