use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading or executing a program.
///
/// Only `UnknownOpcode` is recoverable: the machine skips the instruction and keeps going.
/// The rest leave the machine state as it was before the failing instruction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("memory access out of range at address {address:#06X}")]
    OutOfRangeAccess { address: usize },

    #[error("stack overflow: call depth would exceed {depth}")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("ROM is {size} bytes but only {capacity} bytes fit from 0x200")]
    RomTooLarge { size: usize, capacity: usize },

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::UnknownOpcode { .. })
    }
}
