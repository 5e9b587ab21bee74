pub use chip8::{Chip8, RunState, Speaker};
pub use config::Config;
pub use disassembler::{Line, Operands};
pub use error::{Error, Result};
pub use memory::Memory;
pub use state::{Counters, FrameBuffer, Keypad, State};

mod chip8;
mod config;
pub mod constants;
pub mod disassembler;
mod error;
pub mod instruction;
mod memory;
pub mod opcode;
mod operations;
pub mod state;
