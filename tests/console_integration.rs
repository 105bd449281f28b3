//! Whole-`Console` integration tests: load a hand-built NROM image, drive
//! it through `Console::step`/`step_frame`, and check CPU/PPU/controller
//! state the way a player-facing smoke test would, rather than exercising
//! any one module in isolation.

use nes_core::console::{Button, Console};
use nes_core::controller::ControllerState;

const HEADER_TAG: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
const PRG_ROM_SIZE: usize = 16 * 1024;
const CHR_ROM_SIZE: usize = 8 * 1024;

/// Builds a minimal mapper-0 iNES image with `program` written at PRG
/// offset 0 (CPU address $8000) and the reset vector pointed at $8000.
fn build_rom(program: &[u8]) -> Vec<u8> {
    let mut raw = vec![0u8; 16];
    raw[0..4].copy_from_slice(&HEADER_TAG);
    raw[4] = 1; // 1x16KiB PRG
    raw[5] = 1; // 1x8KiB CHR
    raw[6] = 0;
    raw[7] = 0;

    let mut prg = vec![0xEAu8; PRG_ROM_SIZE]; // NOP-filled
    prg[..program.len()].copy_from_slice(program);
    // Reset vector at the very end of the mirrored 16 KiB bank -> $FFFC.
    prg[PRG_ROM_SIZE - 4] = 0x00;
    prg[PRG_ROM_SIZE - 3] = 0x80;

    raw.extend(prg);
    raw.extend(vec![0u8; CHR_ROM_SIZE]);
    raw
}

#[test]
fn runs_a_simple_program_through_the_full_bus() {
    // LDA #$2A; LDX #$10; STA $0000,X
    let program = [0xA9, 0x2A, 0xA2, 0x10, 0x9D, 0x00, 0x00];
    let raw = build_rom(&program);
    let mut console = Console::load_rom(&raw).unwrap();

    assert_eq!(console.cpu.program_counter, 0x8000);

    console.step().unwrap(); // LDA #$2A
    assert_eq!(console.cpu.reg_a, 0x2A);

    console.step().unwrap(); // LDX #$10
    assert_eq!(console.cpu.reg_x, 0x10);

    console.step().unwrap(); // STA $0000,X -> writes RAM at $0010
    assert_eq!(console.ram[0x10], 0x2A);
}

#[test]
fn step_frame_advances_the_frame_counter_and_produces_pixels() {
    let raw = build_rom(&[]);
    let mut console = Console::load_rom(&raw).unwrap();

    let start = console.frame_count();
    console.step_frame().unwrap();
    assert_eq!(console.frame_count(), start + 1);

    // A freshly reset PPU writes some non-uninitialized pixel data into
    // every slot of the frame buffer over the course of one frame.
    assert_eq!(console.ppu.frame_buffer.len(), 256 * 240);
}

#[test]
fn button_down_and_up_round_trip_through_the_controller_port() {
    let raw = build_rom(&[]);
    let mut console = Console::load_rom(&raw).unwrap();

    console.button_down(1, Button::A);
    assert!(console.controllers[0]
        .controller_state
        .contains(ControllerState::A));

    console.button_up(1, Button::A);
    assert!(!console.controllers[0]
        .controller_state
        .contains(ControllerState::A));

    // Player 2's button presses must not leak onto player 1's port.
    console.button_down(2, Button::Start);
    assert!(!console.controllers[0]
        .controller_state
        .contains(ControllerState::START));
    assert!(console.controllers[1]
        .controller_state
        .contains(ControllerState::START));
}

#[test]
fn sram_is_writable_and_persists_across_steps() {
    let raw = build_rom(&[]);
    let mut console = Console::load_rom(&raw).unwrap();
    console.sram_mut()[0] = 0x99;
    console.step().unwrap();
    assert_eq!(console.sram()[0], 0x99);
}

#[test]
fn nestest_first_trace_line_matches_the_reference_format() {
    // JMP $C5F5 at $C000, the first instruction nestest.nes actually
    // executes; with a single 16 KiB PRG bank, mapper 0 mirrors it across
    // both $8000-$BFFF and $C000-$FFFF, so placing it at PRG offset 0
    // lands it at $C000.
    let mut program = vec![0xEAu8; PRG_ROM_SIZE];
    program[0] = 0x4C;
    program[1] = 0xF5;
    program[2] = 0xC5;
    let raw = build_rom(&program);
    let mut console = Console::load_rom(&raw).unwrap();

    let mut lines = Vec::new();
    console.nestest(|line| lines.push(line.to_string())).unwrap();

    assert_eq!(
        lines[0],
        "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7"
    );
}

#[test]
fn run_for_seconds_advances_cpu_cycles_proportionally() {
    let raw = build_rom(&[]);
    let mut console = Console::load_rom(&raw).unwrap();
    let start = console.cpu.cycle_count;
    console.run_for_seconds(0.01).unwrap();
    // ~1,789,773 * 0.01 ~= 17,898 cycles; NOPs cost 2 cycles each so we
    // should land well past a few hundred executed instructions.
    assert!(console.cpu.cycle_count - start > 1000);
}
