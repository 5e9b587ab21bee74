use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG_REGISTER, KEY_COUNT, PROGRAM_START, REGISTER_COUNT,
    STACK_SIZE,
};
use crate::error::{Error, Result};
use crate::memory::Memory;

/// The FrameBuffer is indexed as [y][x]; each pixel is 1 (on) or 0 (off)
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Pressed status of keys 0..F; any non-zero slot counts as pressed
pub type Keypad = [u8; KEY_COUNT];

/// A snapshot of the machine's internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - VF doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
/// - (opcode) the opcode most recently fetched
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per tick
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory
/// - 32x64 frame buffer
///     - stores the contents of the next frame to be drawn
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub opcode: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    /// A blank state with the sprite sheet loaded and pc pointing at the program
    pub fn new() -> Self {
        let mut memory = Memory::new();
        memory.load_font();

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            opcode: 0,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
        }
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[FLAG_REGISTER] = u8::from(set);
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        let slot = self
            .stack
            .get_mut(self.sp as usize)
            .ok_or(Error::StackOverflow { depth: STACK_SIZE })?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    /// Return addresses from the bottom of the stack up
    pub fn call_stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }

    pub fn counters(&self) -> Counters {
        Counters {
            opcode: self.opcode,
            pc: self.pc,
            i: self.i,
            delay_timer: self.delay_timer,
            sound_timer: self.sound_timer,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// The five counters a debugger shows alongside the registers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Counters {
    pub opcode: u16,
    pub pc: u16,
    pub i: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
}
