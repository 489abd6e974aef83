//! Engine error type.

use std::io;

use thiserror::Error;

/// Errors surfaced by the cartridge loader and mapper operations.
///
/// Runtime CPU faults are not errors in this sense; they latch the CPU's
/// error state instead (see `b1_6502::CpuState`).
#[derive(Debug, Error)]
pub enum EmuError {
    /// An address or argument outside its legal range.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// An operation the current hardware configuration does not support.
    #[error("illegal operation: {0}")]
    IllegalOperation(String),

    /// A payload larger than its destination span.
    #[error("size overflow: {0}")]
    SizeOverflow(String),

    /// An iNES mapper number this core does not implement.
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),

    /// A failure reading a ROM file.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EmuError>;
