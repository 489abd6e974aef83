//! Instruction behavior tests: addressing quirks, flag evaluation,
//! interrupts, and the run-budget contract.

use b1_6502::{flags, Cpu6502, CpuState};
use b1_core::SimpleBus;

/// CPU reset through a vector pointing at `origin`, program loaded there.
fn setup_at(origin: u16, program: &[u8]) -> (Cpu6502, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.load(0xFFFC, &[(origin & 0xFF) as u8, (origin >> 8) as u8]);
    bus.load(origin, program);
    let mut cpu = Cpu6502::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}

#[test]
fn reset_loads_vector_and_registers() {
    let (cpu, _bus) = setup_at(0x8000, &[]);
    assert_eq!(cpu.regs.pc, 0x8000);
    assert_eq!(cpu.regs.s, 0xFD);
    assert_ne!(cpu.regs.p.0 & 0x04, 0, "I must be set after reset");
    assert_eq!(cpu.state(), CpuState::Run);
}

#[test]
fn power_on_state_is_halted() {
    let cpu = Cpu6502::new();
    assert_eq!(cpu.state(), CpuState::Halted);
}

#[test]
fn double_reset_is_idempotent() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[]);
    let first = cpu.regs;
    cpu.reset(&mut bus);
    assert_eq!(cpu.regs, first);
}

#[test]
fn indirect_jmp_page_bug() {
    // JMP ($02FF): low byte from $02FF, high byte from $0200 — not $0300.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x6C, 0xFF, 0x02]);
    bus.load(0x0200, &[0x80]);
    bus.load(0x02FF, &[0x40]);
    bus.load(0x0300, &[0xEE]); // the non-bug high byte, must NOT be used
    let cycles = cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x8040);
    assert_eq!(cycles, 5);
}

#[test]
fn branch_taken_with_page_cross_costs_four() {
    // BEQ +5 from $80FD: following PC is $80FF, target $8104 — new page.
    let (mut cpu, mut bus) = setup_at(0x80FD, &[0xF0, 0x05]);
    cpu.regs.p.set(flags::Z);
    let cycles = cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x8104);
    assert_eq!(cycles, 4);
}

#[test]
fn branch_taken_same_page_costs_three() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xF0, 0x05]);
    cpu.regs.p.set(flags::Z);
    let cycles = cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x8007);
    assert_eq!(cycles, 3);
}

#[test]
fn branch_not_taken_costs_two() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xF0, 0x05]);
    cpu.regs.p.clear(flags::Z);
    let cycles = cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x8002);
    assert_eq!(cycles, 2);
}

#[test]
fn backward_branch_works() {
    // BNE -2 lands back on the branch opcode itself.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xD0, 0xFE]);
    cpu.regs.p.clear(flags::Z);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x8000);
}

#[test]
fn adc_signed_overflow() {
    // $50 + $50 = $A0: positive + positive with a negative result.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x69, 0x50]);
    cpu.regs.a = 0x50;
    cpu.regs.p.clear(flags::C);
    let cycles = cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xA0);
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(cpu.regs.p.is_set(flags::V));
    assert!(!cpu.regs.p.is_set(flags::C));
    assert!(!cpu.regs.p.is_set(flags::Z));
    assert_eq!(cycles, 2);
}

#[test]
fn adc_carry_out() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x69, 0x01]);
    cpu.regs.a = 0xFF;
    cpu.regs.p.clear(flags::C);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(flags::C));
    assert!(cpu.regs.p.is_set(flags::Z));
    assert!(!cpu.regs.p.is_set(flags::V));
}

#[test]
fn sbc_signed_overflow() {
    // -$30 - $70 overflows below -128.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xE9, 0x70]);
    cpu.regs.a = 0xD0;
    cpu.regs.p.set(flags::C);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x60);
    assert!(cpu.regs.p.is_set(flags::V));
    assert!(cpu.regs.p.is_set(flags::C), "no borrow means C stays set");
    assert!(!cpu.regs.p.is_set(flags::N));
}

#[test]
fn adc_ignores_decimal_flag() {
    // 2A03: $09 + $01 is $0A even with D set, not BCD $10.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xF8, 0x69, 0x01]);
    cpu.regs.a = 0x09;
    cpu.regs.p.clear(flags::C);
    cpu.step(&mut bus); // SED
    cpu.step(&mut bus); // ADC #$01
    assert_eq!(cpu.regs.a, 0x0A);
    assert!(cpu.regs.p.is_set(flags::D));
}

#[test]
fn cmp_sets_carry_and_zero() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xC9, 0x40, 0xC9, 0x41]);
    cpu.regs.a = 0x40;
    cpu.step(&mut bus);
    assert!(cpu.regs.p.is_set(flags::C));
    assert!(cpu.regs.p.is_set(flags::Z));
    cpu.step(&mut bus);
    assert!(!cpu.regs.p.is_set(flags::C));
    assert!(!cpu.regs.p.is_set(flags::Z));
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn zero_page_indexing_wraps() {
    // LDA $FF,X with X=1 reads $0000, not $0100.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xB5, 0xFF]);
    cpu.regs.x = 0x01;
    bus.load(0x0000, &[0x77]);
    bus.load(0x0100, &[0x11]);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x77);
}

#[test]
fn absolute_x_page_cross_penalty() {
    // LDA $02FF,X with X=1 crosses into page 3: 5 cycles.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xBD, 0xFF, 0x02, 0xBD, 0x00, 0x03]);
    cpu.regs.x = 0x01;
    let crossed = cpu.step(&mut bus);
    assert_eq!(crossed, 5);
    // Same mode without a crossing: 4 cycles.
    let direct = cpu.step(&mut bus);
    assert_eq!(direct, 4);
}

#[test]
fn indirect_indexed_page_cross_penalty() {
    // LDA ($10),Y with Y pushing the target into the next page.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xB1, 0x10]);
    bus.load(0x0010, &[0xFF, 0x02]);
    cpu.regs.y = 0x01;
    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 6);
}

#[test]
fn store_has_no_page_cross_penalty() {
    // STA $02FF,X always costs 5, crossing or not.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x9D, 0xFF, 0x02]);
    cpu.regs.x = 0x01;
    cpu.regs.a = 0x5A;
    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 5);
    assert_eq!(bus.peek(0x0300), 0x5A);
}

#[test]
fn stack_round_trip_through_pha_pla() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x48, 0xA9, 0x00, 0x68]);
    cpu.regs.a = 0x42;
    let s_before = cpu.regs.s;
    cpu.step(&mut bus); // PHA
    cpu.step(&mut bus); // LDA #$00
    cpu.step(&mut bus); // PLA
    assert_eq!(cpu.regs.a, 0x42);
    assert_eq!(cpu.regs.s, s_before);
}

#[test]
fn run_zero_budget_is_a_no_op() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xEA, 0xEA]);
    let before = cpu.regs;
    assert_eq!(cpu.run(&mut bus, 0), 0);
    assert_eq!(cpu.regs, before);
}

#[test]
fn run_never_exceeds_its_budget() {
    for budget in [1, 2, 3, 7, 100, 101, 255, 256] {
        let (mut cpu, mut bus) = setup_at(0x8000, &[]);
        let sled = [0xEA; 128]; // 128 NOPs cover 256 cycles
        bus.load(0x8000, &sled);
        let spent = cpu.run(&mut bus, budget);
        assert!(spent <= budget, "spent {spent} of {budget}");
        // NOPs are 2 cycles: everything but a trailing odd cycle is used.
        assert_eq!(spent, budget & !1);
    }
}

#[test]
fn run_stops_short_of_an_instruction_that_cannot_fit() {
    // LDA #$01 (2 cycles), then INC $0010 (5 cycles): budget 6 only
    // covers the load.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xA9, 0x01, 0xE6, 0x10]);
    let spent = cpu.run(&mut bus, 6);
    assert_eq!(spent, 2);
    assert_eq!(cpu.regs.pc, 0x8002);
}

#[test]
fn nmi_is_serviced_at_instruction_boundary() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xEA, 0xEA]);
    bus.load(0xFFFA, &[0x00, 0x03]);
    let s_before = cpu.regs.s;
    cpu.nmi();
    let spent = cpu.run(&mut bus, 7);
    assert_eq!(spent, 7);
    assert_eq!(cpu.regs.pc, 0x0300);
    assert_eq!(cpu.nmi_count(), 1);
    assert_eq!(cpu.regs.s, s_before.wrapping_sub(3));
    assert!(cpu.regs.p.is_set(flags::I));
    // Pushed status has B clear.
    let pushed_p = bus.peek(0x0100 | u16::from(s_before.wrapping_sub(2)));
    assert_eq!(pushed_p & flags::B, 0);
}

#[test]
fn irq_is_masked_by_i_flag() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0xEA, 0xEA]);
    bus.load(0xFFFE, &[0x00, 0x03]);
    assert!(cpu.regs.p.is_set(flags::I), "I is set after reset");
    cpu.irq();
    cpu.run(&mut bus, 4);
    assert_ne!(cpu.regs.pc, 0x0300, "masked IRQ must not be serviced");

    // CLI unmasks; the latched IRQ fires at the next boundary.
    cpu.regs.p.clear(flags::I);
    cpu.run(&mut bus, 7);
    assert_eq!(cpu.regs.pc, 0x0300);
}

#[test]
fn brk_pushes_and_vectors() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x00, 0xFF]);
    bus.load(0xFFFE, &[0x00, 0x03]);
    let s_before = cpu.regs.s;
    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 7);
    assert_eq!(cpu.regs.pc, 0x0300);
    assert!(cpu.regs.p.is_set(flags::I));
    // Return address skips the padding byte: $8002.
    let pcl = bus.peek(0x0100 | u16::from(s_before.wrapping_sub(1)));
    let pch = bus.peek(0x0100 | u16::from(s_before));
    assert_eq!(u16::from_le_bytes([pcl, pch]), 0x8002);
    // Pushed status has B set.
    let pushed_p = bus.peek(0x0100 | u16::from(s_before.wrapping_sub(2)));
    assert_ne!(pushed_p & flags::B, 0);
}

#[test]
fn brk_without_handler_halts() {
    // IRQ/BRK vector left at $0000.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x00]);
    cpu.step(&mut bus);
    assert_eq!(cpu.state(), CpuState::Halted);
    assert_eq!(cpu.run(&mut bus, 100), 0, "halted CPU does not run");
}

#[test]
fn rti_restores_state_and_counts() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x40]);
    // Hand-built interrupt frame: status, then return address $1234.
    cpu.regs.s = 0xFC;
    bus.load(0x01FD, &[flags::C | flags::U, 0x34, 0x12]);
    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 6);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert!(cpu.regs.p.is_set(flags::C));
    assert_eq!(cpu.rti_count(), 1);
}

#[test]
fn error_state_is_sticky_until_reset() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x02, 0xEA]);
    let spent = cpu.run(&mut bus, 100);
    assert_eq!(spent, 0);
    assert_eq!(cpu.state(), CpuState::Error);
    assert_eq!(cpu.run(&mut bus, 100), 0);
    cpu.reset(&mut bus);
    assert_eq!(cpu.state(), CpuState::Run);
}

#[test]
fn asl_and_ror_through_memory() {
    // ASL $10 then ROR $10.
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x06, 0x10, 0x66, 0x10]);
    bus.load(0x0010, &[0b1100_0001]);
    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 5);
    assert_eq!(bus.peek(0x0010), 0b1000_0010);
    assert!(cpu.regs.p.is_set(flags::C));
    cpu.step(&mut bus);
    // ROR shifts the carry back in at bit 7.
    assert_eq!(bus.peek(0x0010), 0b1100_0001);
}

#[test]
fn bit_copies_v_and_n_from_memory() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x24, 0x10]);
    bus.load(0x0010, &[0b1100_0000]);
    cpu.regs.a = 0x0F;
    cpu.step(&mut bus);
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(cpu.regs.p.is_set(flags::V));
    assert!(cpu.regs.p.is_set(flags::Z), "A & mem == 0");
}

#[test]
fn jsr_rts_round_trip() {
    let (mut cpu, mut bus) = setup_at(0x8000, &[0x20, 0x00, 0x90]); // JSR $9000
    bus.load(0x9000, &[0x60]); // RTS
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x9000);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x8003);
}
