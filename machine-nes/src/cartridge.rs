//! iNES cartridge loader and mapper implementations.
//!
//! Parses the iNES format (16-byte header, optional 512-byte trainer,
//! PRG-ROM banks, CHR-ROM banks) and builds a [`Mapper`] for address
//! translation. Only NROM (mapper 0) is implemented.

use std::fs;
use std::path::Path;

use crate::error::{EmuError, Result};
use crate::memory::MemoryBank;

/// PRG-ROM bank size (16 KiB).
pub(crate) const PRG_BANK_SIZE: usize = 16 * 1024;
/// CHR-ROM bank size (8 KiB).
pub(crate) const CHR_BANK_SIZE: usize = 8 * 1024;

const HEADER_SIZE: usize = 16;
const TRAINER_SIZE: usize = 512;

/// Nametable mirroring mode, from iNES flags byte 6 bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    /// $2000 = $2400 and $2800 = $2C00 (vertical-scrolling games).
    Horizontal,
    /// $2000 = $2800 and $2400 = $2C00 (horizontal-scrolling games).
    Vertical,
}

/// Cartridge-side address translation.
///
/// One implementation per iNES mapper number; dispatch is per access.
pub trait Mapper {
    /// Read PRG ROM through the CPU window `$8000-$FFFF`.
    ///
    /// # Errors
    ///
    /// `IllegalArgument` for addresses below `$8000`.
    fn read_rom(&self, addr: u16) -> Result<u8>;

    /// CPU write into `$8000-$FFFF` — bank control on switching mappers.
    /// NROM has no registers and ignores these.
    fn write_rom(&mut self, addr: u16, value: u8);

    /// Read CHR through the PPU pattern-table window `$0000-$1FFF`.
    fn read_vrom(&self, addr: u16) -> u8;

    /// PPU write into the pattern tables. Only effective on CHR RAM.
    fn write_vrom(&mut self, addr: u16, value: u8);

    /// Read cartridge RAM at `$6000-$7FFF`.
    ///
    /// # Errors
    ///
    /// `IllegalOperation` on mappers without RAM.
    fn read_ram(&self, addr: u16) -> Result<u8>;

    /// Write cartridge RAM at `$6000-$7FFF`.
    ///
    /// # Errors
    ///
    /// `IllegalOperation` on mappers without RAM.
    fn write_ram(&mut self, addr: u16, value: u8) -> Result<()>;

    /// Write raw bytes into the PRG banks at `addr` (`$8000` or `$C000`
    /// window). A payload crossing `$C000` is split across both windows.
    ///
    /// # Errors
    ///
    /// `SizeOverflow` when a span exceeds the remaining bank space,
    /// `IllegalArgument` for addresses below `$8000`.
    fn flash(&mut self, addr: u16, data: &[u8]) -> Result<()>;
}

/// NROM (mapper 0): no bank switching.
///
/// - `$8000-$BFFF` → first PRG bank
/// - `$C000-$FFFF` → last PRG bank (the same bank when only one is present)
/// - PPU `$0000-$1FFF` → the single CHR bank (RAM when the header declares
///   zero CHR banks)
pub struct Nrom {
    prg: Vec<MemoryBank<PRG_BANK_SIZE>>,
    chr: MemoryBank<CHR_BANK_SIZE>,
    chr_is_ram: bool,
}

impl Nrom {
    #[must_use]
    pub fn new(
        prg: Vec<MemoryBank<PRG_BANK_SIZE>>,
        chr: MemoryBank<CHR_BANK_SIZE>,
        chr_is_ram: bool,
    ) -> Self {
        Self {
            prg,
            chr,
            chr_is_ram,
        }
    }
}

impl Mapper for Nrom {
    fn read_rom(&self, addr: u16) -> Result<u8> {
        if addr >= 0xC000 {
            let last = self.prg.len() - 1;
            Ok(self.prg[last].read((addr - 0xC000) as usize))
        } else if addr >= 0x8000 {
            Ok(self.prg[0].read((addr - 0x8000) as usize))
        } else {
            Err(EmuError::IllegalArgument(format!(
                "ROM address ${addr:04X} below the $8000 window"
            )))
        }
    }

    fn write_rom(&mut self, _addr: u16, _value: u8) {
        // NROM has no mapper registers.
    }

    fn read_vrom(&self, addr: u16) -> u8 {
        debug_assert!(addr < 0x2000, "VROM address ${addr:04X} out of range");
        self.chr.read((addr & 0x1FFF) as usize)
    }

    fn write_vrom(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            self.chr.write((addr & 0x1FFF) as usize, value);
        }
    }

    fn read_ram(&self, _addr: u16) -> Result<u8> {
        Err(EmuError::IllegalOperation("NROM has no RAM".into()))
    }

    fn write_ram(&mut self, _addr: u16, _value: u8) -> Result<()> {
        Err(EmuError::IllegalOperation("NROM has no RAM".into()))
    }

    fn flash(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        if addr >= 0xC000 {
            let offset = (addr - 0xC000) as usize;
            if data.len() > PRG_BANK_SIZE - offset {
                return Err(EmuError::SizeOverflow(format!(
                    "{} bytes do not fit the $C000 window at offset {offset}",
                    data.len()
                )));
            }
            let last = self.prg.len() - 1;
            self.prg[last].write_block(offset, data);
            Ok(())
        } else if addr >= 0x8000 {
            let offset = (addr - 0x8000) as usize;
            let space = PRG_BANK_SIZE - offset;
            if data.len() > space {
                // Split the payload across both windows.
                let (head, tail) = data.split_at(space);
                self.prg[0].write_block(offset, head);
                self.flash(0xC000, tail)
            } else {
                self.prg[0].write_block(offset, data);
                Ok(())
            }
        } else {
            Err(EmuError::IllegalArgument(format!(
                "flash address ${addr:04X} outside the ROM space"
            )))
        }
    }
}

/// Build a mapper by iNES number.
fn create_mapper(
    number: u8,
    prg: Vec<MemoryBank<PRG_BANK_SIZE>>,
    chr: Vec<MemoryBank<CHR_BANK_SIZE>>,
) -> Result<Box<dyn Mapper>> {
    match number {
        0 => {
            if prg.is_empty() || prg.len() > 2 {
                return Err(EmuError::IllegalArgument(format!(
                    "NROM takes 1 or 2 PRG banks, image has {}",
                    prg.len()
                )));
            }
            if chr.len() > 1 {
                return Err(EmuError::IllegalArgument(format!(
                    "NROM takes at most one CHR bank, image has {}",
                    chr.len()
                )));
            }
            let chr_is_ram = chr.is_empty();
            let chr_bank = chr.into_iter().next().unwrap_or_default();
            Ok(Box::new(Nrom::new(prg, chr_bank, chr_is_ram)))
        }
        n => Err(EmuError::UnsupportedMapper(n)),
    }
}

/// A loaded cartridge: the mapper plus header-derived metadata.
pub struct Cartridge {
    mapper: Box<dyn Mapper>,
    mirroring: Mirroring,
    prg_banks: u8,
    chr_banks: u8,
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("mirroring", &self.mirroring)
            .field("prg_banks", &self.prg_banks)
            .field("chr_banks", &self.chr_banks)
            .finish()
    }
}

impl Cartridge {
    /// Parse an iNES image.
    ///
    /// # Errors
    ///
    /// `IllegalArgument` on bad magic, a truncated payload, or zero PRG
    /// banks; `UnsupportedMapper` for mappers other than 0.
    pub fn from_ines(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(EmuError::IllegalArgument(
                "iNES image shorter than its header".into(),
            ));
        }
        if &data[0..4] != b"NES\x1a" {
            return Err(EmuError::IllegalArgument(
                "bad iNES magic (expected NES\\x1A)".into(),
            ));
        }

        let prg_banks = data[4];
        let chr_banks = data[5];
        let flags6 = data[6];
        let flags7 = data[7];

        if prg_banks == 0 {
            return Err(EmuError::IllegalArgument(
                "iNES image declares no PRG banks".into(),
            ));
        }

        let mirroring = if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let has_trainer = flags6 & 0x04 != 0;
        let mapper_number = (flags6 >> 4) | (flags7 & 0xF0);

        let prg_size = usize::from(prg_banks) * PRG_BANK_SIZE;
        let chr_size = usize::from(chr_banks) * CHR_BANK_SIZE;
        let prg_start = HEADER_SIZE + if has_trainer { TRAINER_SIZE } else { 0 };
        let chr_start = prg_start + prg_size;

        if data.len() < chr_start + chr_size {
            return Err(EmuError::IllegalArgument(format!(
                "iNES image truncated: need {} bytes, have {}",
                chr_start + chr_size,
                data.len()
            )));
        }

        let prg = data[prg_start..chr_start]
            .chunks_exact(PRG_BANK_SIZE)
            .map(MemoryBank::from_bytes)
            .collect();
        let chr = data[chr_start..chr_start + chr_size]
            .chunks_exact(CHR_BANK_SIZE)
            .map(MemoryBank::from_bytes)
            .collect();

        let mapper = create_mapper(mapper_number, prg, chr)?;

        Ok(Self {
            mapper,
            mirroring,
            prg_banks,
            chr_banks,
        })
    }

    /// Load an iNES image from a file.
    ///
    /// # Errors
    ///
    /// I/O errors from reading the file, plus everything `from_ines`
    /// reports.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_ines(&data)
    }

    /// Nametable mirroring mode.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Number of 16 KiB PRG banks.
    #[must_use]
    pub fn prg_bank_count(&self) -> u8 {
        self.prg_banks
    }

    /// Number of 8 KiB CHR banks (0 means CHR RAM).
    #[must_use]
    pub fn chr_bank_count(&self) -> u8 {
        self.chr_banks
    }

    /// Read PRG ROM at `$8000-$FFFF`.
    ///
    /// # Errors
    ///
    /// See [`Mapper::read_rom`].
    pub fn read_rom(&self, addr: u16) -> Result<u8> {
        self.mapper.read_rom(addr)
    }

    /// CPU write into the ROM window (mapper bank control).
    pub fn write_rom(&mut self, addr: u16, value: u8) {
        self.mapper.write_rom(addr, value);
    }

    /// Read CHR at PPU `$0000-$1FFF`.
    #[must_use]
    pub fn read_vrom(&self, addr: u16) -> u8 {
        self.mapper.read_vrom(addr)
    }

    /// PPU write into the pattern tables (CHR RAM only).
    pub fn write_vrom(&mut self, addr: u16, value: u8) {
        self.mapper.write_vrom(addr, value);
    }

    /// Read cartridge RAM.
    ///
    /// # Errors
    ///
    /// See [`Mapper::read_ram`].
    pub fn read_ram(&self, addr: u16) -> Result<u8> {
        self.mapper.read_ram(addr)
    }

    /// Write cartridge RAM.
    ///
    /// # Errors
    ///
    /// See [`Mapper::write_ram`].
    pub fn write_ram(&mut self, addr: u16, value: u8) -> Result<()> {
        self.mapper.write_ram(addr, value)
    }

    /// Write raw bytes into the PRG banks.
    ///
    /// # Errors
    ///
    /// See [`Mapper::flash`].
    pub fn flash(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        self.mapper.flash(addr, data)
    }
}
