use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::opcode::Decoded;
use crate::operations::*;

/// Key into the `OpcodeTable`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Every opcode with this top nibble, e.g. `Family(0x1)` for 1NNN
    Family(u8),
    /// One member of a shared family, picked by its low nibble or low byte,
    /// e.g. `Member(0x8, 0x4)` for 8XY4 or `Member(0xF, 0x1E)` for FX1E
    Member(u8, u8),
}

/// Picks the concrete `Pattern` for an opcode whose family is shared by several instructions
pub type Resolver = fn(op: &Decoded) -> Pattern;

/// 00E0/00EE and the F-series differ in their whole low byte
fn by_low_byte(op: &Decoded) -> Pattern {
    Pattern::Member(op.family_nibble(), op.nn)
}

/// 5XY0, the 8-series, 9XY0 and the E-series differ in their low nibble
fn by_low_nibble(op: &Decoded) -> Pattern {
    Pattern::Member(op.family_nibble(), op.n)
}

/// A named, executable instruction
#[derive(Copy, Clone)]
pub struct Instruction {
    pub name: &'static str,
    pub operation: Operation,
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Instruction").field(&self.name).finish()
    }
}

#[derive(Copy, Clone)]
pub enum Entry {
    Instruction(Instruction),
    Resolver(Resolver),
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Instruction(instruction) => instruction.fmt(f),
            Entry::Resolver(_) => f.write_str("Resolver"),
        }
    }
}

/// # Opcode table
/// Maps opcode patterns to instructions. Built once and never changed.
///
/// Families with a single instruction map straight to it. Families shared by several
/// instructions (0x0, 0x5, 0x8, 0x9, 0xE, 0xF) map to a resolver which produces the
/// `Pattern::Member` key of the concrete instruction.
pub struct OpcodeTable {
    entries: HashMap<Pattern, Entry>,
}

impl OpcodeTable {
    pub fn new() -> Self {
        use Pattern::{Family, Member};

        let instructions: [(Pattern, &'static str, Operation); 34] = [
            (Member(0x0, 0xE0), "00E0", clr),
            (Member(0x0, 0xEE), "00EE", rts),
            (Family(0x1), "1NNN", jump),
            (Family(0x2), "2NNN", call),
            (Family(0x3), "3XNN", ske),
            (Family(0x4), "4XNN", skne),
            (Member(0x5, 0x0), "5XY0", skre),
            (Family(0x6), "6XNN", load),
            (Family(0x7), "7XNN", add),
            (Member(0x8, 0x0), "8XY0", mv),
            (Member(0x8, 0x1), "8XY1", or),
            (Member(0x8, 0x2), "8XY2", and),
            (Member(0x8, 0x3), "8XY3", xor),
            (Member(0x8, 0x4), "8XY4", addr),
            (Member(0x8, 0x5), "8XY5", sub),
            (Member(0x8, 0x6), "8XY6", shr),
            (Member(0x8, 0x7), "8XY7", subn),
            (Member(0x8, 0xE), "8XYE", shl),
            (Member(0x9, 0x0), "9XY0", skrne),
            (Family(0xA), "ANNN", loadi),
            (Family(0xB), "BNNN", jumpi),
            (Family(0xC), "CXNN", rand),
            (Family(0xD), "DXYN", draw),
            (Member(0xE, 0xE), "EX9E", skpr),
            (Member(0xE, 0x1), "EXA1", skup),
            (Member(0xF, 0x07), "FX07", moved),
            (Member(0xF, 0x0A), "FX0A", keyd),
            (Member(0xF, 0x15), "FX15", loads),
            (Member(0xF, 0x18), "FX18", ld),
            (Member(0xF, 0x1E), "FX1E", addi),
            (Member(0xF, 0x29), "FX29", ldspr),
            (Member(0xF, 0x33), "FX33", bcd),
            (Member(0xF, 0x55), "FX55", stor),
            (Member(0xF, 0x65), "FX65", read),
        ];

        let resolvers: [(u8, Resolver); 6] = [
            (0x0, by_low_byte),
            (0x5, by_low_nibble),
            (0x8, by_low_nibble),
            (0x9, by_low_nibble),
            (0xE, by_low_nibble),
            (0xF, by_low_byte),
        ];

        let mut entries = HashMap::with_capacity(instructions.len() + resolvers.len());
        for (pattern, name, operation) in instructions {
            entries.insert(pattern, Entry::Instruction(Instruction { name, operation }));
        }
        for (family, resolver) in resolvers {
            entries.insert(Family(family), Entry::Resolver(resolver));
        }

        OpcodeTable { entries }
    }

    pub fn get(&self, pattern: &Pattern) -> Option<&Entry> {
        self.entries.get(pattern)
    }

    /// Selects the Instruction for a decoded opcode, running the family's resolver if it has one.
    ///
    /// Opcodes that match nothing produce `Error::UnknownOpcode`.
    pub fn dispatch(&self, op: &Decoded) -> Result<Instruction> {
        let entry = match self.entries.get(&Pattern::Family(op.family_nibble())) {
            Some(Entry::Resolver(resolve)) => self.entries.get(&resolve(op)),
            other => other,
        };
        match entry {
            Some(Entry::Instruction(instruction)) => Ok(*instruction),
            _ => Err(Error::UnknownOpcode { opcode: op.opcode }),
        }
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::new()
    }
}
