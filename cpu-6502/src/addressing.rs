//! 6502 addressing modes.
//!
//! Operand resolution is shared across all opcode handlers: the dispatch
//! table tags each opcode with an [`AddrMode`] and the handler asks the
//! helpers below for its operand or effective address.
//!
//! Quirks reproduced here:
//! - Zero-page indexing wraps within page 0.
//! - Indirect JMP: a pointer at `$xxFF` fetches its high byte from `$xx00`
//!   (same page), not from the next page.
//! - `abs,X` / `abs,Y` / `(zp),Y` reads cost one extra cycle when indexing
//!   crosses a page boundary.

use b1_core::Bus;

use crate::Cpu6502;

/// Addressing mode tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// Operate on the accumulator (e.g. `ASL A`).
    Acc,
    /// Immediate operand: `#$nn`.
    Imm,
    /// Zero page: `$nn`.
    Zp,
    /// Zero page indexed by X: `$nn,X`.
    ZpX,
    /// Zero page indexed by Y: `$nn,Y`.
    ZpY,
    /// Absolute: `$nnnn`.
    Abs,
    /// Absolute indexed by X: `$nnnn,X`.
    AbsX,
    /// Absolute indexed by Y: `$nnnn,Y`.
    AbsY,
    /// Indirect (JMP only): `($nnnn)`.
    Ind,
    /// Indexed indirect: `($nn,X)`.
    IndX,
    /// Indirect indexed: `($nn),Y`.
    IndY,
    /// No operand.
    Imp,
}

impl Cpu6502 {
    /// Fetch the byte at PC and advance PC.
    pub(crate) fn fetch(&mut self, bus: &mut dyn Bus) -> u8 {
        let value = bus.read_mem(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a 16-bit little-endian word at PC.
    pub(crate) fn fetch_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let low = self.fetch(bus);
        let high = self.fetch(bus);
        u16::from_le_bytes([low, high])
    }

    /// Read a 16-bit little-endian word from memory.
    pub(crate) fn read_word(&mut self, bus: &mut dyn Bus, addr: u16) -> u16 {
        let low = bus.read_mem(addr);
        let high = bus.read_mem(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Read a 16-bit word with the 6502 page-boundary bug: when `addr` is
    /// `$xxFF`, the high byte comes from `$xx00` instead of the next page.
    pub(crate) fn read_word_page_bug(&mut self, bus: &mut dyn Bus, addr: u16) -> u16 {
        let low = bus.read_mem(addr);
        let high_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let high = bus.read_mem(high_addr);
        u16::from_le_bytes([low, high])
    }

    /// Push a byte onto the stack.
    pub(crate) fn push(&mut self, bus: &mut dyn Bus, value: u8) {
        bus.write_mem(0x0100 | u16::from(self.regs.s), value);
        self.regs.s = self.regs.s.wrapping_sub(1);
    }

    /// Pop a byte from the stack.
    pub(crate) fn pop(&mut self, bus: &mut dyn Bus) -> u8 {
        self.regs.s = self.regs.s.wrapping_add(1);
        bus.read_mem(0x0100 | u16::from(self.regs.s))
    }

    /// Push a 16-bit word (high byte first).
    pub(crate) fn push_word(&mut self, bus: &mut dyn Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    /// Pop a 16-bit word (low byte first).
    pub(crate) fn pop_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let low = self.pop(bus);
        let high = self.pop(bus);
        u16::from_le_bytes([low, high])
    }

    /// Resolve the effective address for a read operation. Accrues the
    /// page-cross penalty where the mode charges one.
    pub(crate) fn operand_addr(&mut self, bus: &mut dyn Bus, mode: AddrMode) -> u16 {
        self.resolve_addr(bus, mode, true)
    }

    /// Resolve the effective address for a store or read-modify-write.
    /// These always pay the indexing cycle up front (it is folded into the
    /// base cost), so no penalty accrues.
    pub(crate) fn store_addr(&mut self, bus: &mut dyn Bus, mode: AddrMode) -> u16 {
        self.resolve_addr(bus, mode, false)
    }

    fn resolve_addr(&mut self, bus: &mut dyn Bus, mode: AddrMode, count_crossing: bool) -> u16 {
        match mode {
            AddrMode::Zp => u16::from(self.fetch(bus)),
            AddrMode::ZpX => u16::from(self.fetch(bus).wrapping_add(self.regs.x)),
            AddrMode::ZpY => u16::from(self.fetch(bus).wrapping_add(self.regs.y)),
            AddrMode::Abs => self.fetch_word(bus),
            AddrMode::AbsX => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.regs.x));
                if count_crossing && (base & 0xFF00) != (addr & 0xFF00) {
                    self.penalty += 1;
                }
                addr
            }
            AddrMode::AbsY => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.regs.y));
                if count_crossing && (base & 0xFF00) != (addr & 0xFF00) {
                    self.penalty += 1;
                }
                addr
            }
            AddrMode::Ind => {
                let ptr = self.fetch_word(bus);
                self.read_word_page_bug(bus, ptr)
            }
            AddrMode::IndX => {
                let ptr = self.fetch(bus).wrapping_add(self.regs.x);
                let low = bus.read_mem(u16::from(ptr));
                let high = bus.read_mem(u16::from(ptr.wrapping_add(1)));
                u16::from_le_bytes([low, high])
            }
            AddrMode::IndY => {
                let ptr = self.fetch(bus);
                let low = bus.read_mem(u16::from(ptr));
                let high = bus.read_mem(u16::from(ptr.wrapping_add(1)));
                let base = u16::from_le_bytes([low, high]);
                let addr = base.wrapping_add(u16::from(self.regs.y));
                if count_crossing && (base & 0xFF00) != (addr & 0xFF00) {
                    self.penalty += 1;
                }
                addr
            }
            AddrMode::Acc | AddrMode::Imm | AddrMode::Imp => {
                unreachable!("mode {mode:?} has no effective address")
            }
        }
    }

    /// Fetch the operand value for a read operation.
    pub(crate) fn fetch_operand(&mut self, bus: &mut dyn Bus, mode: AddrMode) -> u8 {
        match mode {
            AddrMode::Acc => self.regs.a,
            AddrMode::Imm => self.fetch(bus),
            _ => {
                let addr = self.operand_addr(bus, mode);
                bus.read_mem(addr)
            }
        }
    }

    /// Execute a branch: fetch the signed displacement, then take it if the
    /// condition holds. Taken branches cost +1 cycle, +2 when the target is
    /// on a different page than the instruction-following PC.
    pub(crate) fn branch(&mut self, bus: &mut dyn Bus, taken: bool) {
        let offset = self.fetch(bus) as i8;
        if taken {
            self.penalty = 1;
            let target = self.regs.pc.wrapping_add(offset as u16);
            if (self.regs.pc & 0xFF00) != (target & 0xFF00) {
                self.penalty = 2;
            }
            self.regs.pc = target;
        }
    }
}
