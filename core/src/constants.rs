/// Total addressable memory in bytes (0x000..=0xFFF)
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are loaded into memory starting here; everything below is reserved
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const REGISTER_COUNT: usize = 16;

/// Register used for carry, borrow and collision flags
pub const FLAG_REGISTER: usize = 0xF;

/// Maximum call depth; exceeding it is a fatal stack overflow
pub const STACK_SIZE: usize = 16;

pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Each font glyph is 8 pixels wide and this many rows tall
pub const GLYPH_HEIGHT: u16 = 5;

/// Timers are decremented once per tick, which the host drives at this rate
pub const TIMER_HZ: u32 = 60;

/// Instructions executed per tick: a 400Hz CPU divided over 60 ticks a second
pub const INSTRUCTIONS_PER_TICK: usize = 400 / TIMER_HZ as usize;

/// How many past states are kept for stepping backwards
pub const MAX_SAVED_STATES: usize = 600;

/// Mnemonic reported for opcodes that have no instruction
pub const UNKNOWN_MNEMONIC: &str = "???";

/// # Sprite sheet
/// Hexadecimal digits 0..F, each 5 bytes tall, loaded at address 0x000.
///
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
