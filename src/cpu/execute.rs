//! Instruction fetch/decode/execute. Flag-setting idioms (ADC/SBC via the
//! signed-overflow XOR trick, PHP/PLP BRK-flag handling, stack push/pop)
//! are grounded on the teacher's dead-but-readable monolithic
//! `src/cpu/mod.rs`; page-cross/branch extra-cycle accounting is grounded
//! on `cpu/instructions/parse.rs`'s `compute_extra_cycles`. Re-expressed
//! here against the `Console`-owned `Cpu`/`CpuBus` split instead of the
//! monolithic `CPU` struct.

use super::interrupt::{Interrupt, BRK_INTERRUPT, IRQ_INTERRUPT, NMI_INTERRUPT};
use super::opcodes::{self, AddressingMode, Mnemonic};
use super::status::CpuStatus;
use super::STACK_BASE;
use crate::common::Memory;
use crate::console::Console;
use crate::error::NesError;

fn read_u8(console: &mut Console, addr: u16) -> u8 {
    console.cpu_bus().read_byte(addr)
}

fn write_u8(console: &mut Console, addr: u16, value: u8) {
    console.cpu_bus().write_byte(addr, value);
}

fn read_u16(console: &mut Console, addr: u16) -> u16 {
    console.cpu_bus().read_two_bytes(addr)
}

fn read_u16_wrap(console: &mut Console, addr: u16) -> u16 {
    console.cpu_bus().read_two_page_bytes(addr)
}

fn push_u8(console: &mut Console, value: u8) {
    let sp = console.cpu.stack_pointer;
    write_u8(console, STACK_BASE + sp as u16, value);
    console.cpu.stack_pointer = sp.wrapping_sub(1);
}

fn pop_u8(console: &mut Console) -> u8 {
    let sp = console.cpu.stack_pointer.wrapping_add(1);
    console.cpu.stack_pointer = sp;
    read_u8(console, STACK_BASE + sp as u16)
}

fn push_u16(console: &mut Console, value: u16) {
    push_u8(console, (value >> 8) as u8);
    push_u8(console, (value & 0xFF) as u8);
}

fn pop_u16(console: &mut Console) -> u16 {
    let lo = pop_u8(console) as u16;
    let hi = pop_u8(console) as u16;
    (hi << 8) | lo
}

fn page_crossed(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

/// Whether `mode`'s effective address is allowed to add a page-cross
/// cycle at all (store instructions and RMW instructions never get the
/// extra cycle even when the address crosses a page).
struct Operand {
    address: u16,
    page_crossed: bool,
}

fn resolve_operand(console: &mut Console, mode: AddressingMode) -> Operand {
    use AddressingMode::*;
    let pc = console.cpu.program_counter;
    match mode {
        Implicit | Accumulator => Operand { address: 0, page_crossed: false },
        Immediate => {
            console.cpu.program_counter = pc.wrapping_add(1);
            Operand { address: pc, page_crossed: false }
        }
        ZeroPage => {
            let addr = read_u8(console, pc) as u16;
            console.cpu.program_counter = pc.wrapping_add(1);
            Operand { address: addr, page_crossed: false }
        }
        ZeroPageX => {
            let base = read_u8(console, pc);
            console.cpu.program_counter = pc.wrapping_add(1);
            let addr = base.wrapping_add(console.cpu.reg_x) as u16;
            Operand { address: addr, page_crossed: false }
        }
        ZeroPageY => {
            let base = read_u8(console, pc);
            console.cpu.program_counter = pc.wrapping_add(1);
            let addr = base.wrapping_add(console.cpu.reg_y) as u16;
            Operand { address: addr, page_crossed: false }
        }
        Absolute => {
            let addr = read_u16(console, pc);
            console.cpu.program_counter = pc.wrapping_add(2);
            Operand { address: addr, page_crossed: false }
        }
        AbsoluteX => {
            let base = read_u16(console, pc);
            console.cpu.program_counter = pc.wrapping_add(2);
            let addr = base.wrapping_add(console.cpu.reg_x as u16);
            Operand { address: addr, page_crossed: page_crossed(base, addr) }
        }
        AbsoluteY => {
            let base = read_u16(console, pc);
            console.cpu.program_counter = pc.wrapping_add(2);
            let addr = base.wrapping_add(console.cpu.reg_y as u16);
            Operand { address: addr, page_crossed: page_crossed(base, addr) }
        }
        Indirect => {
            let ptr = read_u16(console, pc);
            console.cpu.program_counter = pc.wrapping_add(2);
            // The classic JMP ($xxFF) page-wrap bug.
            let addr = read_u16_wrap(console, ptr);
            Operand { address: addr, page_crossed: false }
        }
        IndirectX => {
            let base = read_u8(console, pc);
            console.cpu.program_counter = pc.wrapping_add(1);
            let ptr = base.wrapping_add(console.cpu.reg_x);
            let addr = read_u16_wrap(console, ptr as u16);
            Operand { address: addr, page_crossed: false }
        }
        IndirectY => {
            let base = read_u8(console, pc);
            console.cpu.program_counter = pc.wrapping_add(1);
            let ptr_addr = read_u16_wrap(console, base as u16);
            let addr = ptr_addr.wrapping_add(console.cpu.reg_y as u16);
            Operand { address: addr, page_crossed: page_crossed(ptr_addr, addr) }
        }
        Relative => {
            let offset = read_u8(console, pc) as i8;
            console.cpu.program_counter = pc.wrapping_add(1);
            let addr = console.cpu.program_counter.wrapping_add(offset as u16);
            Operand { address: addr, page_crossed: false }
        }
    }
}

/// Services an interrupt: push PC and status (with the B flag set only
/// for software BRK), set I, jump to the vector. Costs 7 cycles, matching
/// the real 6502.
fn service_interrupt(console: &mut Console, interrupt: Interrupt) {
    push_u16(console, console.cpu.program_counter);
    let mut status = console.cpu.status;
    status.set(CpuStatus::BRK, interrupt.is_set_b_flag);
    status.insert(CpuStatus::ALWAYS);
    push_u8(console, status.bits());
    console.cpu.status.insert(CpuStatus::INT_DISABLE);
    console.cpu.program_counter = read_u16(console, interrupt.vector);
}

fn branch(console: &mut Console, target: u16, condition: bool) -> u32 {
    if !condition {
        return 0;
    }
    let old_pc = console.cpu.program_counter;
    console.cpu.program_counter = target;
    if page_crossed(old_pc, target) {
        2
    } else {
        1
    }
}

fn compare(console: &mut Console, register: u8, value: u8) {
    let result = register.wrapping_sub(value);
    console.cpu.status.set(CpuStatus::CARRY, register >= value);
    console.cpu.status.set_zero_and_negative(result);
}

fn adc(console: &mut Console, value: u8) {
    let carry_in = console.cpu.status.contains(CpuStatus::CARRY) as u16;
    let a = console.cpu.reg_a;
    let sum = a as u16 + value as u16 + carry_in;
    let result = sum as u8;
    console.cpu.status.set(CpuStatus::CARRY, sum > 0xFF);
    console.cpu.status.set(
        CpuStatus::OVERFLOW,
        (!(a ^ value) & (a ^ result) & 0x80) != 0,
    );
    console.cpu.status.set_zero_and_negative(result);
    console.cpu.reg_a = result;
}

fn sbc(console: &mut Console, value: u8) {
    adc(console, !value);
}

fn asl_value(console: &mut Console, value: u8) -> u8 {
    console.cpu.status.set(CpuStatus::CARRY, value & 0x80 != 0);
    let result = value << 1;
    console.cpu.status.set_zero_and_negative(result);
    result
}

fn lsr_value(console: &mut Console, value: u8) -> u8 {
    console.cpu.status.set(CpuStatus::CARRY, value & 0x01 != 0);
    let result = value >> 1;
    console.cpu.status.set_zero_and_negative(result);
    result
}

fn rol_value(console: &mut Console, value: u8) -> u8 {
    let carry_in = console.cpu.status.contains(CpuStatus::CARRY) as u8;
    console.cpu.status.set(CpuStatus::CARRY, value & 0x80 != 0);
    let result = (value << 1) | carry_in;
    console.cpu.status.set_zero_and_negative(result);
    result
}

fn ror_value(console: &mut Console, value: u8) -> u8 {
    let carry_in = console.cpu.status.contains(CpuStatus::CARRY) as u8;
    console.cpu.status.set(CpuStatus::CARRY, value & 0x01 != 0);
    let result = (value >> 1) | (carry_in << 7);
    console.cpu.status.set_zero_and_negative(result);
    result
}

/// Runs exactly one instruction (interrupt service, DMA/DMC stall, or a
/// decoded opcode) and returns the CPU cycles it consumed.
pub fn step(console: &mut Console) -> Result<u32, NesError> {
    if console.cpu.stall_cycles > 0 {
        let cycles = console.cpu.stall_cycles;
        console.cpu.stall_cycles = 0;
        console.cpu.cycle_count += cycles as u64;
        return Ok(cycles);
    }

    if console.cpu.pending_nmi {
        console.cpu.pending_nmi = false;
        service_interrupt(console, NMI_INTERRUPT);
        console.cpu.cycle_count += 7;
        return Ok(7);
    }

    if console.cpu.pending_irq && !console.cpu.status.contains(CpuStatus::INT_DISABLE) {
        console.cpu.pending_irq = false;
        service_interrupt(console, IRQ_INTERRUPT);
        console.cpu.cycle_count += 7;
        return Ok(7);
    }

    let pc = console.cpu.program_counter;
    let opcode_byte = read_u8(console, pc);
    console.cpu.program_counter = pc.wrapping_add(1);

    let info = opcodes::decode(opcode_byte);
    if info.unofficial_stub {
        log::warn!(
            "unofficial opcode ${opcode_byte:02X} at ${pc:04X} treated as a no-op"
        );
    }

    let operand = resolve_operand(console, info.mode);
    let mut extra_cycles = 0u32;
    if operand.page_crossed && opcode_adds_page_cross_cycle(info.mnemonic) {
        extra_cycles += 1;
    }
    extra_cycles += execute_mnemonic(console, info.mnemonic, info.mode, operand.address);

    let total = info.cycles as u32 + extra_cycles;
    console.cpu.cycle_count += total as u64;
    Ok(total)
}

fn opcode_adds_page_cross_cycle(mnemonic: Mnemonic) -> bool {
    use Mnemonic::*;
    matches!(
        mnemonic,
        ADC | AND | CMP | EOR | LDA | LDX | LDY | ORA | SBC | LAX | NOP
    )
}

/// Executes one decoded instruction; returns any extra cycles beyond the
/// opcode table's base count (branch-taken/page-cross on branch).
fn execute_mnemonic(
    console: &mut Console,
    mnemonic: Mnemonic,
    mode: AddressingMode,
    address: u16,
) -> u32 {
    use Mnemonic::*;
    match mnemonic {
        ADC => {
            let v = read_u8(console, address);
            adc(console, v);
            0
        }
        AND => {
            let v = read_u8(console, address);
            console.cpu.reg_a &= v;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        ASL => {
            if mode == AddressingMode::Accumulator {
                let v = console.cpu.reg_a;
                console.cpu.reg_a = asl_value(console, v);
            } else {
                let v = read_u8(console, address);
                let result = asl_value(console, v);
                write_u8(console, address, result);
            }
            0
        }
        BCC => branch(console, address, !console.cpu.status.contains(CpuStatus::CARRY)),
        BCS => branch(console, address, console.cpu.status.contains(CpuStatus::CARRY)),
        BEQ => branch(console, address, console.cpu.status.contains(CpuStatus::ZERO)),
        BNE => branch(console, address, !console.cpu.status.contains(CpuStatus::ZERO)),
        BMI => branch(console, address, console.cpu.status.contains(CpuStatus::NEGATIVE)),
        BPL => branch(console, address, !console.cpu.status.contains(CpuStatus::NEGATIVE)),
        BVC => branch(console, address, !console.cpu.status.contains(CpuStatus::OVERFLOW)),
        BVS => branch(console, address, console.cpu.status.contains(CpuStatus::OVERFLOW)),
        BIT => {
            let v = read_u8(console, address);
            let a = console.cpu.reg_a;
            console.cpu.status.set(CpuStatus::ZERO, (a & v) == 0);
            console.cpu.status.set(CpuStatus::OVERFLOW, v & 0x40 != 0);
            console.cpu.status.set(CpuStatus::NEGATIVE, v & 0x80 != 0);
            0
        }
        BRK => {
            console.cpu.program_counter = console.cpu.program_counter.wrapping_add(1);
            service_interrupt(console, BRK_INTERRUPT);
            0
        }
        CLC => {
            console.cpu.status.remove(CpuStatus::CARRY);
            0
        }
        CLD => {
            console.cpu.status.remove(CpuStatus::DECIMAL);
            0
        }
        CLI => {
            console.cpu.status.remove(CpuStatus::INT_DISABLE);
            0
        }
        CLV => {
            console.cpu.status.remove(CpuStatus::OVERFLOW);
            0
        }
        CMP => {
            let v = read_u8(console, address);
            compare(console, console.cpu.reg_a, v);
            0
        }
        CPX => {
            let v = read_u8(console, address);
            compare(console, console.cpu.reg_x, v);
            0
        }
        CPY => {
            let v = read_u8(console, address);
            compare(console, console.cpu.reg_y, v);
            0
        }
        DEC => {
            let v = read_u8(console, address).wrapping_sub(1);
            write_u8(console, address, v);
            console.cpu.status.set_zero_and_negative(v);
            0
        }
        DEX => {
            console.cpu.reg_x = console.cpu.reg_x.wrapping_sub(1);
            console.cpu.status.set_zero_and_negative(console.cpu.reg_x);
            0
        }
        DEY => {
            console.cpu.reg_y = console.cpu.reg_y.wrapping_sub(1);
            console.cpu.status.set_zero_and_negative(console.cpu.reg_y);
            0
        }
        EOR => {
            let v = read_u8(console, address);
            console.cpu.reg_a ^= v;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        INC => {
            let v = read_u8(console, address).wrapping_add(1);
            write_u8(console, address, v);
            console.cpu.status.set_zero_and_negative(v);
            0
        }
        INX => {
            console.cpu.reg_x = console.cpu.reg_x.wrapping_add(1);
            console.cpu.status.set_zero_and_negative(console.cpu.reg_x);
            0
        }
        INY => {
            console.cpu.reg_y = console.cpu.reg_y.wrapping_add(1);
            console.cpu.status.set_zero_and_negative(console.cpu.reg_y);
            0
        }
        JMP => {
            console.cpu.program_counter = address;
            0
        }
        JSR => {
            let return_addr = console.cpu.program_counter.wrapping_sub(1);
            push_u16(console, return_addr);
            console.cpu.program_counter = address;
            0
        }
        LDA => {
            console.cpu.reg_a = read_u8(console, address);
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        LDX => {
            console.cpu.reg_x = read_u8(console, address);
            console.cpu.status.set_zero_and_negative(console.cpu.reg_x);
            0
        }
        LDY => {
            console.cpu.reg_y = read_u8(console, address);
            console.cpu.status.set_zero_and_negative(console.cpu.reg_y);
            0
        }
        LSR => {
            if mode == AddressingMode::Accumulator {
                let v = console.cpu.reg_a;
                console.cpu.reg_a = lsr_value(console, v);
            } else {
                let v = read_u8(console, address);
                let result = lsr_value(console, v);
                write_u8(console, address, result);
            }
            0
        }
        NOP => 0,
        ORA => {
            let v = read_u8(console, address);
            console.cpu.reg_a |= v;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        PHA => {
            let a = console.cpu.reg_a;
            push_u8(console, a);
            0
        }
        PHP => {
            let status = (console.cpu.status | CpuStatus::BRK | CpuStatus::ALWAYS).bits();
            push_u8(console, status);
            0
        }
        PLA => {
            console.cpu.reg_a = pop_u8(console);
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        PLP => {
            let popped = pop_u8(console);
            let mut status = CpuStatus::from_bits_truncate(popped);
            status.remove(CpuStatus::BRK);
            status.insert(CpuStatus::ALWAYS);
            console.cpu.status = status;
            0
        }
        ROL => {
            if mode == AddressingMode::Accumulator {
                let v = console.cpu.reg_a;
                console.cpu.reg_a = rol_value(console, v);
            } else {
                let v = read_u8(console, address);
                let result = rol_value(console, v);
                write_u8(console, address, result);
            }
            0
        }
        ROR => {
            if mode == AddressingMode::Accumulator {
                let v = console.cpu.reg_a;
                console.cpu.reg_a = ror_value(console, v);
            } else {
                let v = read_u8(console, address);
                let result = ror_value(console, v);
                write_u8(console, address, result);
            }
            0
        }
        RTI => {
            let popped = pop_u8(console);
            let mut status = CpuStatus::from_bits_truncate(popped);
            status.remove(CpuStatus::BRK);
            status.insert(CpuStatus::ALWAYS);
            console.cpu.status = status;
            console.cpu.program_counter = pop_u16(console);
            0
        }
        RTS => {
            console.cpu.program_counter = pop_u16(console).wrapping_add(1);
            0
        }
        SBC => {
            let v = read_u8(console, address);
            sbc(console, v);
            0
        }
        SEC => {
            console.cpu.status.insert(CpuStatus::CARRY);
            0
        }
        SED => {
            console.cpu.status.insert(CpuStatus::DECIMAL);
            0
        }
        SEI => {
            console.cpu.status.insert(CpuStatus::INT_DISABLE);
            0
        }
        STA => {
            let a = console.cpu.reg_a;
            write_u8(console, address, a);
            0
        }
        STX => {
            let x = console.cpu.reg_x;
            write_u8(console, address, x);
            0
        }
        STY => {
            let y = console.cpu.reg_y;
            write_u8(console, address, y);
            0
        }
        TAX => {
            console.cpu.reg_x = console.cpu.reg_a;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_x);
            0
        }
        TAY => {
            console.cpu.reg_y = console.cpu.reg_a;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_y);
            0
        }
        TSX => {
            console.cpu.reg_x = console.cpu.stack_pointer;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_x);
            0
        }
        TXA => {
            console.cpu.reg_a = console.cpu.reg_x;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        TXS => {
            console.cpu.stack_pointer = console.cpu.reg_x;
            0
        }
        TYA => {
            console.cpu.reg_a = console.cpu.reg_y;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        // Unofficial opcodes with well-established semantics, since test
        // ROMs (and plenty of commercial games) rely on them.
        LAX => {
            let v = read_u8(console, address);
            console.cpu.reg_a = v;
            console.cpu.reg_x = v;
            console.cpu.status.set_zero_and_negative(v);
            0
        }
        SAX => {
            let v = console.cpu.reg_a & console.cpu.reg_x;
            write_u8(console, address, v);
            0
        }
        DCP => {
            let v = read_u8(console, address).wrapping_sub(1);
            write_u8(console, address, v);
            compare(console, console.cpu.reg_a, v);
            0
        }
        ISB => {
            let v = read_u8(console, address).wrapping_add(1);
            write_u8(console, address, v);
            sbc(console, v);
            0
        }
        SLO => {
            let v = read_u8(console, address);
            let shifted = asl_value(console, v);
            write_u8(console, address, shifted);
            console.cpu.reg_a |= shifted;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        RLA => {
            let v = read_u8(console, address);
            let rotated = rol_value(console, v);
            write_u8(console, address, rotated);
            console.cpu.reg_a &= rotated;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        SRE => {
            let v = read_u8(console, address);
            let shifted = lsr_value(console, v);
            write_u8(console, address, shifted);
            console.cpu.reg_a ^= shifted;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            0
        }
        RRA => {
            let v = read_u8(console, address);
            let rotated = ror_value(console, v);
            write_u8(console, address, rotated);
            adc(console, rotated);
            0
        }
        ANC => {
            let v = read_u8(console, address);
            console.cpu.reg_a &= v;
            console.cpu.status.set_zero_and_negative(console.cpu.reg_a);
            console.cpu.status.set(CpuStatus::CARRY, console.cpu.reg_a & 0x80 != 0);
            0
        }
        ALR => {
            let v = read_u8(console, address);
            console.cpu.reg_a &= v;
            let result = lsr_value(console, console.cpu.reg_a);
            console.cpu.reg_a = result;
            0
        }
        ARR => {
            let v = read_u8(console, address);
            console.cpu.reg_a &= v;
            let result = ror_value(console, console.cpu.reg_a);
            console.cpu.reg_a = result;
            console.cpu.status.set(CpuStatus::CARRY, result & 0x40 != 0);
            console.cpu.status.set(CpuStatus::OVERFLOW, ((result >> 6) ^ (result >> 5)) & 1 != 0);
            0
        }
        AXS => {
            let v = read_u8(console, address);
            let x_and_a = console.cpu.reg_a & console.cpu.reg_x;
            let result = x_and_a.wrapping_sub(v);
            console.cpu.status.set(CpuStatus::CARRY, x_and_a >= v);
            console.cpu.status.set_zero_and_negative(result);
            console.cpu.reg_x = result;
            0
        }
        // Highly unstable on real hardware (depend on analog bus
        // capacitance); logged and treated as no-ops.
        SHA | SHX | SHY | TAS | LAS | XAA | JAM => 0,
    }
}
