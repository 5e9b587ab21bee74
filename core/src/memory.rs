use crate::constants::{MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of flat addressable memory.
///
/// ```text
/// 0x000..0x050  sprite sheet (16 glyphs x 5 bytes)
/// 0x050..0x200  reserved
/// 0x200..0x1000 program
/// ```
///
/// Every access is bounds checked; reading or writing past 0xFFF is an error rather than a panic.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            bytes: [0; MEMORY_SIZE],
        }
    }

    pub fn read(&self, address: usize) -> Result<u8> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Error::OutOfRangeAccess { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or(Error::OutOfRangeAccess { address })?;
        *byte = value;
        Ok(())
    }

    /// Reads the big-endian 16-bit word at `address` and `address + 1`.
    pub fn read_word(&self, address: usize) -> Result<u16> {
        let left = u16::from(self.read(address)?);
        let right = u16::from(self.read(address + 1)?);
        Ok(left << 8 | right)
    }

    /// Borrows `len` bytes starting at `address`.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        self.bytes
            .get(address..address + len)
            .ok_or(Error::OutOfRangeAccess {
                address: address.max(MEMORY_SIZE),
            })
    }

    /// Copies `data` into memory starting at `address`; nothing is written if it doesn't fit.
    pub fn write_slice(&mut self, address: usize, data: &[u8]) -> Result<()> {
        let end = address + data.len();
        let target = self
            .bytes
            .get_mut(address..end)
            .ok_or(Error::OutOfRangeAccess {
                address: address.max(MEMORY_SIZE),
            })?;
        target.copy_from_slice(data);
        Ok(())
    }

    pub fn load_font(&mut self) {
        self.bytes[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
    }

    /// Load a program at `at` (normally `PROGRAM_START`)
    pub fn load_program(&mut self, program: &[u8], at: u16) -> Result<()> {
        let capacity = MEMORY_SIZE.saturating_sub(at as usize);
        if program.len() > capacity {
            return Err(Error::RomTooLarge {
                size: program.len(),
                capacity,
            });
        }
        self.write_slice(at as usize, program)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let program = &self.bytes[PROGRAM_START as usize..];
        let used = program.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
        f.debug_struct("Memory")
            .field("program", &&program[..used])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_back_writes() {
        let mut memory = Memory::new();
        memory.write(0xFFF, 0xAB).unwrap();
        assert_eq!(memory.read(0xFFF), Ok(0xAB));
    }

    #[test]
    fn test_rejects_out_of_range_access() {
        let mut memory = Memory::new();
        assert_eq!(
            memory.read(0x1000),
            Err(Error::OutOfRangeAccess { address: 0x1000 })
        );
        assert_eq!(
            memory.write(0x1000, 0x1),
            Err(Error::OutOfRangeAccess { address: 0x1000 })
        );
    }

    #[test]
    fn test_reads_words_big_endian() {
        let mut memory = Memory::new();
        memory.write_slice(0x200, &[0xAA, 0xBB]).unwrap();
        assert_eq!(memory.read_word(0x200), Ok(0xAABB));
        assert!(memory.read_word(0xFFF).is_err());
    }

    #[test]
    fn test_loads_font_at_zero() {
        let mut memory = Memory::new();
        memory.load_font();
        assert_eq!(memory.slice(0x0, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(memory.slice(0x4B, 5).unwrap(), &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert_eq!(memory.read(0x50), Ok(0x0));
    }

    #[test]
    fn test_loads_program() {
        let mut memory = Memory::new();
        memory.load_program(&[0x60, 0x05], PROGRAM_START).unwrap();
        assert_eq!(memory.read_word(0x200), Ok(0x6005));
    }

    #[test]
    fn test_loads_program_that_fills_memory() {
        let mut memory = Memory::new();
        let program = [0x1; 0xE00];
        memory.load_program(&program, PROGRAM_START).unwrap();
        assert_eq!(memory.read(0xFFF), Ok(0x1));
    }

    #[test]
    fn test_rejects_oversized_program_without_writing() {
        let mut memory = Memory::new();
        let program = [0x1; 0xE01];
        assert_eq!(
            memory.load_program(&program, PROGRAM_START),
            Err(Error::RomTooLarge {
                size: 0xE01,
                capacity: 0xE00
            })
        );
        assert_eq!(memory, Memory::new());
    }
}
