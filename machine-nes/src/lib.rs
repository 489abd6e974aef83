//! NES machine core.
//!
//! This crate provides the NES-side of the emulator:
//! - bus: address decoding for the CPU-visible and PPU-visible spaces
//! - cartridge: iNES loader, mapper trait, NROM (mapper 0)
//! - ppu: register file and whole-frame rendering into a backend
//! - nes: machine glue driving one CPU slice + one PPU frame per tick
//!
//! The CPU lives in the `b1-6502` crate; frames leave through the
//! [`RenderingBackend`] capability.

mod backend;
mod bus;
mod cartridge;
mod config;
mod error;
mod memory;
mod nes;
mod ppu;

pub use backend::{Layer, NullBackend, RenderingBackend};
pub use bus::NesBus;
pub use cartridge::{Cartridge, Mapper, Mirroring};
pub use config::{NesConfig, OutputMode};
pub use error::{EmuError, Result};
pub use memory::MemoryBank;
pub use nes::Nes;
pub use ppu::Ppu;
