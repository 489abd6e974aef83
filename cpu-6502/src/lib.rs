//! MOS 6502 CPU core.
//!
//! Per-instruction execution: `step()` decodes and runs one instruction,
//! returning its cycle cost (base cycles plus any branch or page-cross
//! penalty). `run()` executes against a clock budget, servicing pending
//! NMI/IRQ at instruction boundaries, and never spends more cycles than
//! it was given.
//!
//! Dispatch is a lazily-built table of 256 entries, one per opcode byte:
//! handler function pointer, addressing mode, base cycles, worst-case
//! penalty, and whether the opcode is official. Unassigned opcodes latch
//! the error state.
//!
//! This is the NES 2A03 flavour: the D flag is tracked, but ADC/SBC are
//! always binary.

use std::sync::OnceLock;

use b1_core::{Bus, Cpu, Observable, Value};

mod addressing;
pub mod flags;
mod registers;

pub use addressing::AddrMode;
pub use flags::Status;
pub use registers::Registers;

use flags::{C, D, I, N, V, Z};

/// NMI vector location.
const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector location.
const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector location.
const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles to service an interrupt: push PC and P, fetch the vector.
const INTERRUPT_CYCLES: u32 = 7;

/// Execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    /// Not executing: power-on, or BRK with no handler installed.
    Halted,
    /// Normal execution.
    Run,
    /// A fault (unknown opcode) stopped the CPU. Sticky until reset.
    Error,
}

/// Opcode handler: executes one instruction body. Operand fetches advance
/// PC; cycle accounting happens in `step`.
type Handler = fn(&mut Cpu6502, &mut dyn Bus, AddrMode);

/// One dispatch table entry.
#[derive(Clone, Copy)]
struct OpEntry {
    exec: Handler,
    mode: AddrMode,
    /// Base cycle cost.
    cycles: u8,
    /// Worst-case penalty cycles the opcode can accrue on top of `cycles`.
    extra: u8,
    official: bool,
}

static OPCODES: OnceLock<[OpEntry; 256]> = OnceLock::new();

fn opcode_table() -> &'static [OpEntry; 256] {
    OPCODES.get_or_init(build_opcode_table)
}

/// Whether an opcode byte is an official 6502 instruction.
#[must_use]
pub fn opcode_is_official(opcode: u8) -> bool {
    opcode_table()[opcode as usize].official
}

/// The MOS 6502 CPU.
pub struct Cpu6502 {
    /// CPU registers.
    pub regs: Registers,
    state: CpuState,
    /// Extra cycles accrued by the current instruction (taken branches,
    /// page crossings).
    penalty: u32,
    nmi_pending: bool,
    irq_pending: bool,
    nmi_count: u64,
    rti_count: u64,
}

impl Default for Cpu6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu6502 {
    /// Create a CPU in power-on state. It stays [`CpuState::Halted`] until
    /// the first `reset`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            state: CpuState::Halted,
            penalty: 0,
            nmi_pending: false,
            irq_pending: false,
            nmi_count: 0,
            rti_count: 0,
        }
    }

    /// Current execution state.
    #[must_use]
    pub fn state(&self) -> CpuState {
        self.state
    }

    /// NMIs serviced since power-on (diagnostic).
    #[must_use]
    pub fn nmi_count(&self) -> u64 {
        self.nmi_count
    }

    /// RTI instructions executed since power-on (diagnostic).
    #[must_use]
    pub fn rti_count(&self) -> u64 {
        self.rti_count
    }

    /// Reset: load PC from the reset vector, S to $FD, P to $34 (I set),
    /// clear pending interrupts, state to `Run`.
    pub fn reset(&mut self, bus: &mut dyn Bus) {
        self.regs = Registers::new();
        self.regs.p = Status::from_byte(0x34);
        self.regs.pc = self.read_word(bus, RESET_VECTOR);
        self.penalty = 0;
        self.nmi_pending = false;
        self.irq_pending = false;
        self.state = CpuState::Run;
    }

    /// Latch a non-maskable interrupt for the next instruction boundary.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Latch a maskable interrupt; serviced when the I flag is clear.
    pub fn irq(&mut self) {
        self.irq_pending = true;
    }

    /// Execute one instruction and return its cycle cost.
    ///
    /// An unknown opcode latches [`CpuState::Error`] and returns 0. Errored
    /// CPUs refuse to step until reset.
    pub fn step(&mut self, bus: &mut dyn Bus) -> u32 {
        if self.state == CpuState::Error {
            return 0;
        }
        self.penalty = 0;
        let opcode = self.fetch(bus);
        let entry = opcode_table()[opcode as usize];
        (entry.exec)(self, bus, entry.mode);
        u32::from(entry.cycles) + self.penalty
    }

    /// Run instructions until the cycle budget is exhausted or the CPU
    /// leaves [`CpuState::Run`]. Returns cycles spent, always `<= clk`.
    ///
    /// Pending NMI (then IRQ, when `I` is clear) is serviced at each
    /// instruction boundary. Before each instruction the next opcode is
    /// prefetched to cost it against the remaining budget; execution stops
    /// once base cost plus worst-case penalty would overrun.
    pub fn run(&mut self, bus: &mut dyn Bus, clk: u32) -> u32 {
        if clk == 0 {
            return 0;
        }
        let mut spent: u32 = 0;
        while self.state == CpuState::Run {
            if self.nmi_pending {
                if spent + INTERRUPT_CYCLES > clk {
                    break;
                }
                self.nmi_pending = false;
                self.service_interrupt(bus, NMI_VECTOR);
                self.nmi_count += 1;
                spent += INTERRUPT_CYCLES;
                continue;
            }
            if self.irq_pending && !self.regs.p.is_set(I) {
                if spent + INTERRUPT_CYCLES > clk {
                    break;
                }
                self.irq_pending = false;
                self.service_interrupt(bus, IRQ_VECTOR);
                spent += INTERRUPT_CYCLES;
                continue;
            }
            let next = opcode_table()[bus.read_mem(self.regs.pc) as usize];
            if spent + u32::from(next.cycles + next.extra) > clk {
                break;
            }
            spent += self.step(bus);
        }
        spent
    }

    /// Push PC (high then low) and P with B clear, set I, load PC from the
    /// given vector.
    fn service_interrupt(&mut self, bus: &mut dyn Bus, vector: u16) {
        self.push_word(bus, self.regs.pc);
        let status = self.regs.p.to_byte_irq();
        self.push(bus, status);
        self.regs.p.set(I);
        self.regs.pc = self.read_word(bus, vector);
    }

    // === ALU helpers ===

    /// ADC: binary add with carry. C from the 9-bit sum, V when the result
    /// sign disagrees with both operand signs.
    fn adc(&mut self, value: u8) {
        let sum = u16::from(self.regs.a) + u16::from(value) + u16::from(self.regs.p.is_set(C));
        let result = sum as u8;
        self.regs.p.set_if(C, sum > 0xFF);
        self.regs
            .p
            .set_if(V, (self.regs.a ^ result) & (value ^ result) & 0x80 != 0);
        self.regs.p.update_nz(result);
        self.regs.a = result;
    }

    /// SBC: binary subtract, C as inverted borrow.
    fn sbc(&mut self, value: u8) {
        let borrow = u16::from(!self.regs.p.is_set(C));
        let diff = u16::from(self.regs.a)
            .wrapping_sub(u16::from(value))
            .wrapping_sub(borrow);
        let result = diff as u8;
        self.regs.p.set_if(C, diff < 0x100);
        self.regs
            .p
            .set_if(V, (self.regs.a ^ value) & (self.regs.a ^ result) & 0x80 != 0);
        self.regs.p.update_nz(result);
        self.regs.a = result;
    }

    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.regs.p.set_if(C, reg >= value);
        self.regs.p.update_nz(result);
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.p.is_set(C) { 0x80 } else { 0 };
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    /// Shared body for the four read-modify-write shifts.
    fn shift(&mut self, bus: &mut dyn Bus, mode: AddrMode, f: fn(&mut Self, u8) -> u8) {
        if mode == AddrMode::Acc {
            let value = self.regs.a;
            self.regs.a = f(self, value);
        } else {
            let addr = self.store_addr(bus, mode);
            let value = bus.read_mem(addr);
            let result = f(self, value);
            bus.write_mem(addr, result);
        }
    }

    // === Instruction handlers ===

    fn op_lda(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.regs.a = value;
        self.regs.p.update_nz(value);
    }

    fn op_ldx(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.regs.x = value;
        self.regs.p.update_nz(value);
    }

    fn op_ldy(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.regs.y = value;
        self.regs.p.update_nz(value);
    }

    fn op_sta(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let addr = self.store_addr(bus, mode);
        bus.write_mem(addr, self.regs.a);
    }

    fn op_stx(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let addr = self.store_addr(bus, mode);
        bus.write_mem(addr, self.regs.x);
    }

    fn op_sty(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let addr = self.store_addr(bus, mode);
        bus.write_mem(addr, self.regs.y);
    }

    fn op_tax(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.x = self.regs.a;
        self.regs.p.update_nz(self.regs.x);
    }

    fn op_tay(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.y = self.regs.a;
        self.regs.p.update_nz(self.regs.y);
    }

    fn op_txa(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.a = self.regs.x;
        self.regs.p.update_nz(self.regs.a);
    }

    fn op_tya(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.a = self.regs.y;
        self.regs.p.update_nz(self.regs.a);
    }

    fn op_tsx(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.x = self.regs.s;
        self.regs.p.update_nz(self.regs.x);
    }

    fn op_txs(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        // TXS does not touch flags.
        self.regs.s = self.regs.x;
    }

    fn op_pha(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let value = self.regs.a;
        self.push(bus, value);
    }

    fn op_php(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let value = self.regs.p.to_byte_brk();
        self.push(bus, value);
    }

    fn op_pla(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let value = self.pop(bus);
        self.regs.a = value;
        self.regs.p.update_nz(value);
    }

    fn op_plp(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let value = self.pop(bus);
        self.regs.p = Status::from_pull(value);
    }

    fn op_and(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.regs.a &= value;
        self.regs.p.update_nz(self.regs.a);
    }

    fn op_ora(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.regs.a |= value;
        self.regs.p.update_nz(self.regs.a);
    }

    fn op_eor(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.regs.a ^= value;
        self.regs.p.update_nz(self.regs.a);
    }

    fn op_bit(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.regs.p.set_if(Z, self.regs.a & value == 0);
        self.regs.p.set_if(N, value & 0x80 != 0);
        self.regs.p.set_if(V, value & 0x40 != 0);
    }

    fn op_adc(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.adc(value);
    }

    fn op_sbc(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.sbc(value);
    }

    fn op_cmp(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.compare(self.regs.a, value);
    }

    fn op_cpx(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.compare(self.regs.x, value);
    }

    fn op_cpy(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let value = self.fetch_operand(bus, mode);
        self.compare(self.regs.y, value);
    }

    fn op_inc(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let addr = self.store_addr(bus, mode);
        let result = bus.read_mem(addr).wrapping_add(1);
        bus.write_mem(addr, result);
        self.regs.p.update_nz(result);
    }

    fn op_dec(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        let addr = self.store_addr(bus, mode);
        let result = bus.read_mem(addr).wrapping_sub(1);
        bus.write_mem(addr, result);
        self.regs.p.update_nz(result);
    }

    fn op_inx(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.x = self.regs.x.wrapping_add(1);
        self.regs.p.update_nz(self.regs.x);
    }

    fn op_iny(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.y = self.regs.y.wrapping_add(1);
        self.regs.p.update_nz(self.regs.y);
    }

    fn op_dex(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.x = self.regs.x.wrapping_sub(1);
        self.regs.p.update_nz(self.regs.x);
    }

    fn op_dey(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.y = self.regs.y.wrapping_sub(1);
        self.regs.p.update_nz(self.regs.y);
    }

    fn op_asl(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        self.shift(bus, mode, Self::asl);
    }

    fn op_lsr(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        self.shift(bus, mode, Self::lsr);
    }

    fn op_rol(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        self.shift(bus, mode, Self::rol);
    }

    fn op_ror(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        self.shift(bus, mode, Self::ror);
    }

    fn op_jmp(&mut self, bus: &mut dyn Bus, mode: AddrMode) {
        self.regs.pc = self.operand_addr(bus, mode);
    }

    fn op_jsr(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let target = self.fetch_word(bus);
        let ret = self.regs.pc.wrapping_sub(1);
        self.push_word(bus, ret);
        self.regs.pc = target;
    }

    fn op_rts(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.pc = self.pop_word(bus).wrapping_add(1);
    }

    fn op_rti(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let status = self.pop(bus);
        self.regs.p = Status::from_pull(status);
        self.regs.pc = self.pop_word(bus);
        self.rti_count += 1;
    }

    fn op_brk(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        // The byte after BRK is skipped; the pushed return address points
        // past it.
        let _ = self.fetch(bus);
        self.push_word(bus, self.regs.pc);
        let status = self.regs.p.to_byte_brk();
        self.push(bus, status);
        self.regs.p.set(I);
        let vector = self.read_word(bus, IRQ_VECTOR);
        if vector == 0 {
            // No handler installed.
            self.state = CpuState::Halted;
        } else {
            self.regs.pc = vector;
        }
    }

    fn op_bpl(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let taken = !self.regs.p.is_set(N);
        self.branch(bus, taken);
    }

    fn op_bmi(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let taken = self.regs.p.is_set(N);
        self.branch(bus, taken);
    }

    fn op_bvc(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let taken = !self.regs.p.is_set(V);
        self.branch(bus, taken);
    }

    fn op_bvs(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let taken = self.regs.p.is_set(V);
        self.branch(bus, taken);
    }

    fn op_bcc(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let taken = !self.regs.p.is_set(C);
        self.branch(bus, taken);
    }

    fn op_bcs(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let taken = self.regs.p.is_set(C);
        self.branch(bus, taken);
    }

    fn op_bne(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let taken = !self.regs.p.is_set(Z);
        self.branch(bus, taken);
    }

    fn op_beq(&mut self, bus: &mut dyn Bus, _mode: AddrMode) {
        let taken = self.regs.p.is_set(Z);
        self.branch(bus, taken);
    }

    fn op_clc(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.p.clear(C);
    }

    fn op_sec(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.p.set(C);
    }

    fn op_cli(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.p.clear(I);
    }

    fn op_sei(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.p.set(I);
    }

    fn op_clv(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.p.clear(V);
    }

    fn op_cld(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.p.clear(D);
    }

    fn op_sed(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.regs.p.set(D);
    }

    fn op_nop(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {}

    fn op_illegal(&mut self, _bus: &mut dyn Bus, _mode: AddrMode) {
        self.state = CpuState::Error;
    }
}

impl<B: Bus> Cpu<B> for Cpu6502 {
    fn step(&mut self, bus: &mut B) -> u32 {
        Cpu6502::step(self, bus)
    }

    fn reset(&mut self, bus: &mut B) {
        Cpu6502::reset(self, bus);
    }

    fn irq(&mut self) {
        Cpu6502::irq(self);
    }

    fn nmi(&mut self) {
        Cpu6502::nmi(self);
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }
}

impl Observable for Cpu6502 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" => Some(self.regs.s.into()),
            "pc" => Some(self.regs.pc.into()),
            "p" => Some(self.regs.p.0.into()),
            "state" => Some((self.state as u8).into()),
            "nmi_count" => Some(self.nmi_count.into()),
            "rti_count" => Some(self.rti_count.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "a",
            "x",
            "y",
            "s",
            "pc",
            "p",
            "state",
            "nmi_count",
            "rti_count",
        ]
    }
}

#[allow(clippy::too_many_lines)]
fn build_opcode_table() -> [OpEntry; 256] {
    use AddrMode::{Abs, AbsX, AbsY, Acc, Imm, Imp, Ind, IndX, IndY, Zp, ZpX, ZpY};

    let illegal = OpEntry {
        exec: Cpu6502::op_illegal,
        mode: Imp,
        cycles: 0,
        extra: 0,
        official: false,
    };
    let mut t = [illegal; 256];

    let mut set = |op: usize, exec: Handler, mode: AddrMode, cycles: u8, extra: u8| {
        t[op] = OpEntry {
            exec,
            mode,
            cycles,
            extra,
            official: true,
        };
    };

    // Load
    set(0xA9, Cpu6502::op_lda, Imm, 2, 0);
    set(0xA5, Cpu6502::op_lda, Zp, 3, 0);
    set(0xB5, Cpu6502::op_lda, ZpX, 4, 0);
    set(0xAD, Cpu6502::op_lda, Abs, 4, 0);
    set(0xBD, Cpu6502::op_lda, AbsX, 4, 1);
    set(0xB9, Cpu6502::op_lda, AbsY, 4, 1);
    set(0xA1, Cpu6502::op_lda, IndX, 6, 0);
    set(0xB1, Cpu6502::op_lda, IndY, 5, 1);
    set(0xA2, Cpu6502::op_ldx, Imm, 2, 0);
    set(0xA6, Cpu6502::op_ldx, Zp, 3, 0);
    set(0xB6, Cpu6502::op_ldx, ZpY, 4, 0);
    set(0xAE, Cpu6502::op_ldx, Abs, 4, 0);
    set(0xBE, Cpu6502::op_ldx, AbsY, 4, 1);
    set(0xA0, Cpu6502::op_ldy, Imm, 2, 0);
    set(0xA4, Cpu6502::op_ldy, Zp, 3, 0);
    set(0xB4, Cpu6502::op_ldy, ZpX, 4, 0);
    set(0xAC, Cpu6502::op_ldy, Abs, 4, 0);
    set(0xBC, Cpu6502::op_ldy, AbsX, 4, 1);

    // Store
    set(0x85, Cpu6502::op_sta, Zp, 3, 0);
    set(0x95, Cpu6502::op_sta, ZpX, 4, 0);
    set(0x8D, Cpu6502::op_sta, Abs, 4, 0);
    set(0x9D, Cpu6502::op_sta, AbsX, 5, 0);
    set(0x99, Cpu6502::op_sta, AbsY, 5, 0);
    set(0x81, Cpu6502::op_sta, IndX, 6, 0);
    set(0x91, Cpu6502::op_sta, IndY, 6, 0);
    set(0x86, Cpu6502::op_stx, Zp, 3, 0);
    set(0x96, Cpu6502::op_stx, ZpY, 4, 0);
    set(0x8E, Cpu6502::op_stx, Abs, 4, 0);
    set(0x84, Cpu6502::op_sty, Zp, 3, 0);
    set(0x94, Cpu6502::op_sty, ZpX, 4, 0);
    set(0x8C, Cpu6502::op_sty, Abs, 4, 0);

    // Transfers
    set(0xAA, Cpu6502::op_tax, Imp, 2, 0);
    set(0xA8, Cpu6502::op_tay, Imp, 2, 0);
    set(0x8A, Cpu6502::op_txa, Imp, 2, 0);
    set(0x98, Cpu6502::op_tya, Imp, 2, 0);
    set(0xBA, Cpu6502::op_tsx, Imp, 2, 0);
    set(0x9A, Cpu6502::op_txs, Imp, 2, 0);

    // Stack
    set(0x48, Cpu6502::op_pha, Imp, 3, 0);
    set(0x08, Cpu6502::op_php, Imp, 3, 0);
    set(0x68, Cpu6502::op_pla, Imp, 4, 0);
    set(0x28, Cpu6502::op_plp, Imp, 4, 0);

    // Logic
    set(0x29, Cpu6502::op_and, Imm, 2, 0);
    set(0x25, Cpu6502::op_and, Zp, 3, 0);
    set(0x35, Cpu6502::op_and, ZpX, 4, 0);
    set(0x2D, Cpu6502::op_and, Abs, 4, 0);
    set(0x3D, Cpu6502::op_and, AbsX, 4, 1);
    set(0x39, Cpu6502::op_and, AbsY, 4, 1);
    set(0x21, Cpu6502::op_and, IndX, 6, 0);
    set(0x31, Cpu6502::op_and, IndY, 5, 1);
    set(0x09, Cpu6502::op_ora, Imm, 2, 0);
    set(0x05, Cpu6502::op_ora, Zp, 3, 0);
    set(0x15, Cpu6502::op_ora, ZpX, 4, 0);
    set(0x0D, Cpu6502::op_ora, Abs, 4, 0);
    set(0x1D, Cpu6502::op_ora, AbsX, 4, 1);
    set(0x19, Cpu6502::op_ora, AbsY, 4, 1);
    set(0x01, Cpu6502::op_ora, IndX, 6, 0);
    set(0x11, Cpu6502::op_ora, IndY, 5, 1);
    set(0x49, Cpu6502::op_eor, Imm, 2, 0);
    set(0x45, Cpu6502::op_eor, Zp, 3, 0);
    set(0x55, Cpu6502::op_eor, ZpX, 4, 0);
    set(0x4D, Cpu6502::op_eor, Abs, 4, 0);
    set(0x5D, Cpu6502::op_eor, AbsX, 4, 1);
    set(0x59, Cpu6502::op_eor, AbsY, 4, 1);
    set(0x41, Cpu6502::op_eor, IndX, 6, 0);
    set(0x51, Cpu6502::op_eor, IndY, 5, 1);
    set(0x24, Cpu6502::op_bit, Zp, 3, 0);
    set(0x2C, Cpu6502::op_bit, Abs, 4, 0);

    // Arithmetic
    set(0x69, Cpu6502::op_adc, Imm, 2, 0);
    set(0x65, Cpu6502::op_adc, Zp, 3, 0);
    set(0x75, Cpu6502::op_adc, ZpX, 4, 0);
    set(0x6D, Cpu6502::op_adc, Abs, 4, 0);
    set(0x7D, Cpu6502::op_adc, AbsX, 4, 1);
    set(0x79, Cpu6502::op_adc, AbsY, 4, 1);
    set(0x61, Cpu6502::op_adc, IndX, 6, 0);
    set(0x71, Cpu6502::op_adc, IndY, 5, 1);
    set(0xE9, Cpu6502::op_sbc, Imm, 2, 0);
    set(0xE5, Cpu6502::op_sbc, Zp, 3, 0);
    set(0xF5, Cpu6502::op_sbc, ZpX, 4, 0);
    set(0xED, Cpu6502::op_sbc, Abs, 4, 0);
    set(0xFD, Cpu6502::op_sbc, AbsX, 4, 1);
    set(0xF9, Cpu6502::op_sbc, AbsY, 4, 1);
    set(0xE1, Cpu6502::op_sbc, IndX, 6, 0);
    set(0xF1, Cpu6502::op_sbc, IndY, 5, 1);
    set(0xC9, Cpu6502::op_cmp, Imm, 2, 0);
    set(0xC5, Cpu6502::op_cmp, Zp, 3, 0);
    set(0xD5, Cpu6502::op_cmp, ZpX, 4, 0);
    set(0xCD, Cpu6502::op_cmp, Abs, 4, 0);
    set(0xDD, Cpu6502::op_cmp, AbsX, 4, 1);
    set(0xD9, Cpu6502::op_cmp, AbsY, 4, 1);
    set(0xC1, Cpu6502::op_cmp, IndX, 6, 0);
    set(0xD1, Cpu6502::op_cmp, IndY, 5, 1);
    set(0xE0, Cpu6502::op_cpx, Imm, 2, 0);
    set(0xE4, Cpu6502::op_cpx, Zp, 3, 0);
    set(0xEC, Cpu6502::op_cpx, Abs, 4, 0);
    set(0xC0, Cpu6502::op_cpy, Imm, 2, 0);
    set(0xC4, Cpu6502::op_cpy, Zp, 3, 0);
    set(0xCC, Cpu6502::op_cpy, Abs, 4, 0);

    // Increment/decrement
    set(0xE6, Cpu6502::op_inc, Zp, 5, 0);
    set(0xF6, Cpu6502::op_inc, ZpX, 6, 0);
    set(0xEE, Cpu6502::op_inc, Abs, 6, 0);
    set(0xFE, Cpu6502::op_inc, AbsX, 7, 0);
    set(0xC6, Cpu6502::op_dec, Zp, 5, 0);
    set(0xD6, Cpu6502::op_dec, ZpX, 6, 0);
    set(0xCE, Cpu6502::op_dec, Abs, 6, 0);
    set(0xDE, Cpu6502::op_dec, AbsX, 7, 0);
    set(0xE8, Cpu6502::op_inx, Imp, 2, 0);
    set(0xC8, Cpu6502::op_iny, Imp, 2, 0);
    set(0xCA, Cpu6502::op_dex, Imp, 2, 0);
    set(0x88, Cpu6502::op_dey, Imp, 2, 0);

    // Shifts
    set(0x0A, Cpu6502::op_asl, Acc, 2, 0);
    set(0x06, Cpu6502::op_asl, Zp, 5, 0);
    set(0x16, Cpu6502::op_asl, ZpX, 6, 0);
    set(0x0E, Cpu6502::op_asl, Abs, 6, 0);
    set(0x1E, Cpu6502::op_asl, AbsX, 7, 0);
    set(0x4A, Cpu6502::op_lsr, Acc, 2, 0);
    set(0x46, Cpu6502::op_lsr, Zp, 5, 0);
    set(0x56, Cpu6502::op_lsr, ZpX, 6, 0);
    set(0x4E, Cpu6502::op_lsr, Abs, 6, 0);
    set(0x5E, Cpu6502::op_lsr, AbsX, 7, 0);
    set(0x2A, Cpu6502::op_rol, Acc, 2, 0);
    set(0x26, Cpu6502::op_rol, Zp, 5, 0);
    set(0x36, Cpu6502::op_rol, ZpX, 6, 0);
    set(0x2E, Cpu6502::op_rol, Abs, 6, 0);
    set(0x3E, Cpu6502::op_rol, AbsX, 7, 0);
    set(0x6A, Cpu6502::op_ror, Acc, 2, 0);
    set(0x66, Cpu6502::op_ror, Zp, 5, 0);
    set(0x76, Cpu6502::op_ror, ZpX, 6, 0);
    set(0x6E, Cpu6502::op_ror, Abs, 6, 0);
    set(0x7E, Cpu6502::op_ror, AbsX, 7, 0);

    // Control flow
    set(0x4C, Cpu6502::op_jmp, Abs, 3, 0);
    set(0x6C, Cpu6502::op_jmp, Ind, 5, 0);
    set(0x20, Cpu6502::op_jsr, Abs, 6, 0);
    set(0x60, Cpu6502::op_rts, Imp, 6, 0);
    set(0x40, Cpu6502::op_rti, Imp, 6, 0);
    set(0x00, Cpu6502::op_brk, Imp, 7, 0);

    // Branches: +1 when taken, +1 more on page cross
    set(0x10, Cpu6502::op_bpl, Imm, 2, 2);
    set(0x30, Cpu6502::op_bmi, Imm, 2, 2);
    set(0x50, Cpu6502::op_bvc, Imm, 2, 2);
    set(0x70, Cpu6502::op_bvs, Imm, 2, 2);
    set(0x90, Cpu6502::op_bcc, Imm, 2, 2);
    set(0xB0, Cpu6502::op_bcs, Imm, 2, 2);
    set(0xD0, Cpu6502::op_bne, Imm, 2, 2);
    set(0xF0, Cpu6502::op_beq, Imm, 2, 2);

    // Flag operations
    set(0x18, Cpu6502::op_clc, Imp, 2, 0);
    set(0x38, Cpu6502::op_sec, Imp, 2, 0);
    set(0x58, Cpu6502::op_cli, Imp, 2, 0);
    set(0x78, Cpu6502::op_sei, Imp, 2, 0);
    set(0xB8, Cpu6502::op_clv, Imp, 2, 0);
    set(0xD8, Cpu6502::op_cld, Imp, 2, 0);
    set(0xF8, Cpu6502::op_sed, Imp, 2, 0);

    set(0xEA, Cpu6502::op_nop, Imp, 2, 0);

    t
}
