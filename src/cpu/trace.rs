//! Mesen2-style per-instruction trace lines, bit-exact with the `nestest`
//! golden log. Grounded on the teacher's `tracer.rs::TraceNes::log_trace`
//! (operand-formatting match and the final `format!` layout are carried
//! over near verbatim) but re-expressed against `Console`/`CpuBus` instead
//! of the teacher's `ActionNES`/`CpuState`/`CpuBus`/`Instruction` split,
//! and using non-mutating `CpuBus::peek_byte` throughout so tracing a
//! instruction can never perturb the state it's describing.

use crate::console::Console;

use super::opcodes::{self, AddressingMode, Mnemonic};

/// Formats the instruction about to execute at `console.cpu.program_counter`
/// as one nestest/Mesen2-style trace line, without mutating `console`.
pub fn trace_line(console: &mut Console) -> String {
    let pc = console.cpu.program_counter;
    let opcode_byte = console.cpu_bus().peek_byte(pc);
    let info = opcodes::decode(opcode_byte);

    let mut hex_dump = vec![opcode_byte];
    let operand_len = info.mode.operand_len();
    let arg = match operand_len {
        0 => 0u16,
        1 => {
            let value = console.cpu_bus().peek_byte(pc.wrapping_add(1));
            hex_dump.push(value);
            value as u16
        }
        _ => {
            let lo = console.cpu_bus().peek_byte(pc.wrapping_add(1));
            let hi = console.cpu_bus().peek_byte(pc.wrapping_add(2));
            hex_dump.push(lo);
            hex_dump.push(hi);
            ((hi as u16) << 8) | lo as u16
        }
    };

    let operand_str = format_operand(console, pc, info.mode, info.mnemonic, arg);

    let hex_str = hex_dump
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    let mnemonic_str = format!(
        "{}{:?}",
        if info.unofficial { "*" } else { " " },
        info.mnemonic
    );
    let asm_str = format!("{pc:04X}  {hex_str:<8} {mnemonic_str} {operand_str}")
        .trim_end()
        .to_string();

    let cpu = &console.cpu;
    let status = cpu.status.bits();
    format!(
        "{:<47} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
        asm_str,
        cpu.reg_a,
        cpu.reg_x,
        cpu.reg_y,
        status,
        cpu.stack_pointer,
        console.ppu.scanline,
        console.ppu.cycle,
        cpu.cycle_count,
    )
}

fn format_operand(
    console: &mut Console,
    pc: u16,
    mode: AddressingMode,
    mnemonic: Mnemonic,
    arg: u16,
) -> String {
    use AddressingMode::*;

    match mode {
        Implicit => String::new(),
        Accumulator => "A".to_string(),
        Immediate => format!("#${:02X}", arg as u8),
        ZeroPage => {
            let value = console.cpu_bus().peek_byte(arg);
            format!("${:02X} = {:02X}", arg, value)
        }
        ZeroPageX => {
            let addr = (arg as u8).wrapping_add(console.cpu.reg_x) as u16;
            let value = console.cpu_bus().peek_byte(addr);
            format!("${:02X},X @ {:02X} = {:02X}", arg, addr, value)
        }
        ZeroPageY => {
            let addr = (arg as u8).wrapping_add(console.cpu.reg_y) as u16;
            let value = console.cpu_bus().peek_byte(addr);
            format!("${:02X},Y @ {:02X} = {:02X}", arg, addr, value)
        }
        Absolute => {
            if matches!(mnemonic, Mnemonic::JMP | Mnemonic::JSR) {
                format!("${:04X}", arg)
            } else {
                let value = console.cpu_bus().peek_byte(arg);
                format!("${:04X} = {:02X}", arg, value)
            }
        }
        AbsoluteX => {
            let addr = arg.wrapping_add(console.cpu.reg_x as u16);
            let value = console.cpu_bus().peek_byte(addr);
            format!("${:04X},X @ {:04X} = {:02X}", arg, addr, value)
        }
        AbsoluteY => {
            let addr = arg.wrapping_add(console.cpu.reg_y as u16);
            let value = console.cpu_bus().peek_byte(addr);
            format!("${:04X},Y @ {:04X} = {:02X}", arg, addr, value)
        }
        Indirect => {
            // Same page-wrap quirk the real JMP ($xxFF) indirect fetch has.
            let page = arg & 0xFF00;
            let lo = console.cpu_bus().peek_byte(arg) as u16;
            let hi = console.cpu_bus().peek_byte(page | (arg.wrapping_add(1) & 0x00FF)) as u16;
            let target = (hi << 8) | lo;
            format!("(${:04X}) = {:04X}", arg, target)
        }
        IndirectX => {
            let ptr = (arg as u8).wrapping_add(console.cpu.reg_x);
            let lo = console.cpu_bus().peek_byte(ptr as u16) as u16;
            let hi = console.cpu_bus().peek_byte(ptr.wrapping_add(1) as u16) as u16;
            let addr = (hi << 8) | lo;
            let value = console.cpu_bus().peek_byte(addr);
            format!(
                "(${:02X},X) @ {:02X} = {:04X} = {:02X}",
                arg, ptr, addr, value
            )
        }
        IndirectY => {
            let ptr = arg as u8;
            let lo = console.cpu_bus().peek_byte(ptr as u16) as u16;
            let hi = console.cpu_bus().peek_byte(ptr.wrapping_add(1) as u16) as u16;
            let base = (hi << 8) | lo;
            let addr = base.wrapping_add(console.cpu.reg_y as u16);
            let value = console.cpu_bus().peek_byte(addr);
            format!("(${:02X}),Y = {:04X} @ {:04X} = {:02X}", arg, base, addr, value)
        }
        Relative => {
            let target = (pc.wrapping_add(2)).wrapping_add((arg as u8) as i8 as u16);
            format!("${:04X}", target)
        }
    }
}
