use std::collections::BTreeMap;
use std::fmt;

use crate::constants::UNKNOWN_MNEMONIC;
use crate::instruction::OpcodeTable;
use crate::memory::Memory;
use crate::opcode::{decode, Decoded};

/// The operand fields worth showing for an opcode, chosen by its family
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operands {
    /// 00E0, 00EE
    None,
    /// 1NNN, 2NNN, ANNN, BNNN
    Address(u16),
    /// 3XNN, 4XNN, 6XNN, 7XNN, CXNN
    RegisterByte { x: u8, nn: u8 },
    /// 5XY0, 8XY_, 9XY0, DXYN
    Registers { x: u8, y: u8 },
    /// EX__, FX__
    Register { x: u8 },
    /// Anything without an instruction is shown as its raw low 12 bits
    Unknown(u16),
}

impl Operands {
    fn of(op: &Decoded) -> Self {
        match op.family_nibble() {
            0x0 => Operands::None,
            0x1 | 0x2 | 0xA | 0xB => Operands::Address(op.nnn),
            0x3 | 0x4 | 0x6 | 0x7 | 0xC => Operands::RegisterByte { x: op.x, nn: op.nn },
            0x5 | 0x8 | 0x9 | 0xD => Operands::Registers { x: op.x, y: op.y },
            _ => Operands::Register { x: op.x },
        }
    }
}

impl fmt::Display for Operands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operands::None => Ok(()),
            Operands::Address(nnn) => write!(f, "${:03X}", nnn),
            Operands::RegisterByte { x, nn } => write!(f, "V{:X}, ${:02X}", x, nn),
            Operands::Registers { x, y } => write!(f, "V{:X}, V{:X}", x, y),
            Operands::Register { x } => write!(f, "V{:X}", x),
            Operands::Unknown(nnn) => write!(f, "${:03X}", nnn),
        }
    }
}

/// One disassembled instruction word
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Line {
    pub address: u16,
    pub opcode: u16,
    pub name: &'static str,
    pub operands: Operands,
}

impl Line {
    pub fn is_unknown(&self) -> bool {
        matches!(self.operands, Operands::Unknown(_))
    }
}

/// Renders as `$AAAA: NAME operands`, e.g. `$0200: 6XNN V0, $05`
impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:04X}: {}", self.address, self.name)?;
        if self.operands != Operands::None {
            write!(f, " {}", self.operands)?;
        }
        Ok(())
    }
}

/// Names the opcode at `address` without executing anything.
pub fn disassemble_at(memory: &Memory, table: &OpcodeTable, address: u16) -> Option<Line> {
    let opcode = memory.read_word(address as usize).ok()?;
    let op = decode(opcode);
    let (name, operands) = match table.dispatch(&op) {
        Ok(instruction) => (instruction.name, Operands::of(&op)),
        Err(_) => (UNKNOWN_MNEMONIC, Operands::Unknown(op.nnn)),
    };
    Some(Line {
        address,
        opcode,
        name,
        operands,
    })
}

/// # Disassembler
/// Walks `start..end` one byte at a time, naming the 16-bit word found at each address.
///
/// Stepping by single bytes means misaligned words show up as well; it is up to the reader
/// to follow the aligned ones. A word is only listed when both of its bytes lie inside the
/// range and inside memory.
pub fn disassemble(
    memory: &Memory,
    table: &OpcodeTable,
    start: u16,
    end: u16,
) -> BTreeMap<u16, Line> {
    (start..end.saturating_sub(1))
        .map_while(|address| disassemble_at(memory, table, address))
        .map(|line| (line.address, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_with(address: usize, bytes: &[u8]) -> Memory {
        let mut memory = Memory::new();
        memory.write_slice(address, bytes).unwrap();
        memory
    }

    #[test]
    fn test_single_word() {
        let memory = memory_with(0x0, &[0x60, 0x05]);
        let lines = disassemble(&memory, &OpcodeTable::new(), 0x0, 0x2);
        assert_eq!(lines.len(), 1);
        let line = lines[&0x0];
        assert_eq!(line.name, "6XNN");
        assert_eq!(line.operands, Operands::RegisterByte { x: 0x0, nn: 0x05 });
        assert_eq!(line.to_string(), "$0000: 6XNN V0, $05");
    }

    #[test]
    fn test_walks_every_byte() {
        let memory = memory_with(0x200, &[0x12, 0x34, 0x00, 0xE0]);
        let lines = disassemble(&memory, &OpcodeTable::new(), 0x200, 0x204);
        let names: Vec<_> = lines.values().map(|line| line.name).collect();
        // 1234, 3400, 00E0
        assert_eq!(names, ["1NNN", "3XNN", "00E0"]);
        assert_eq!(lines[&0x200].operands, Operands::Address(0x234));
        assert_eq!(lines[&0x202].to_string(), "$0202: 00E0");
    }

    #[test]
    fn test_renders_operands_per_family() {
        let memory = memory_with(0x200, &[0xD1, 0x25, 0xF3, 0x33]);
        let table = OpcodeTable::new();
        assert_eq!(
            disassemble_at(&memory, &table, 0x200).unwrap().to_string(),
            "$0200: DXYN V1, V2"
        );
        assert_eq!(
            disassemble_at(&memory, &table, 0x202).unwrap().to_string(),
            "$0202: FX33 V3"
        );
    }

    #[test]
    fn test_unknown_opcode() {
        let memory = memory_with(0x200, &[0x50, 0x01]);
        let line = disassemble_at(&memory, &OpcodeTable::new(), 0x200).unwrap();
        assert!(line.is_unknown());
        assert_eq!(line.to_string(), "$0200: ??? $001");
    }

    #[test]
    fn test_stops_at_end_of_memory() {
        let memory = Memory::new();
        let lines = disassemble(&memory, &OpcodeTable::new(), 0xFFC, 0x1000);
        assert_eq!(lines.keys().copied().collect::<Vec<_>>(), [0xFFC, 0xFFD, 0xFFE]);
    }

    #[test]
    fn test_empty_ranges() {
        let memory = Memory::new();
        let table = OpcodeTable::new();
        assert!(disassemble(&memory, &table, 0x200, 0x200).is_empty());
        assert!(disassemble(&memory, &table, 0x200, 0x201).is_empty());
        assert!(disassemble(&memory, &table, 0x300, 0x200).is_empty());
    }

    #[test]
    fn test_does_not_touch_memory() {
        let memory = memory_with(0x200, &[0xF2, 0x55]);
        let before = memory;
        disassemble(&memory, &OpcodeTable::new(), 0x200, 0x202);
        assert_eq!(memory, before);
    }
}
