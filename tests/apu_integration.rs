//! APU register-level integration tests, driven the way a game's sound
//! engine would drive them: through `Console`'s CPU bus rather than by
//! poking `Apu` fields directly (which are crate-private by design).

use nes_core::cartridge::Cartridge;
use nes_core::common::Memory;
use nes_core::console::Console;

fn blank_console() -> Console {
    Console::new(Cartridge::blank()).unwrap()
}

#[test]
fn enabling_pulse1_and_setting_length_reports_active_in_status() {
    let mut console = blank_console();
    {
        let mut bus = console.cpu_bus();
        bus.write_byte(0x4015, 0x01); // enable pulse 1
        bus.write_byte(0x4000, 0b0011_1111); // duty 0, halt/const volume, volume 15
        bus.write_byte(0x4002, 0xFF); // timer low
        bus.write_byte(0x4003, 0b0000_0111); // timer high + length index 0
    }
    let status = nes_core::apu::read_status(&mut console.apu);
    assert_eq!(status & 0x01, 0x01);
}

#[test]
fn disabling_a_channel_clears_its_length_counter() {
    let mut console = blank_console();
    {
        let mut bus = console.cpu_bus();
        bus.write_byte(0x4015, 0x04); // enable triangle
        bus.write_byte(0x4008, 0b0111_1111);
        bus.write_byte(0x400A, 0xFF);
        bus.write_byte(0x400B, 0b0000_1000); // length index 1 -> nonzero
    }
    assert_eq!(nes_core::apu::read_status(&mut console.apu) & 0x04, 0x04);

    {
        let mut bus = console.cpu_bus();
        bus.write_byte(0x4015, 0x00); // disable everything
    }
    assert_eq!(nes_core::apu::read_status(&mut console.apu) & 0x04, 0);
}

#[test]
fn reading_status_clears_frame_irq_but_not_dmc_irq() {
    let mut console = blank_console();
    {
        let mut bus = console.cpu_bus();
        // Select 4-step mode with the frame-IRQ inhibit bit clear, then run
        // long enough for the sequencer's 4th step to assert the flag.
        bus.write_byte(0x4017, 0x00);
    }
    for _ in 0..40_000 {
        nes_core::apu::step(&mut console);
    }
    let status = nes_core::apu::read_status(&mut console.apu);
    assert_eq!(status & 0x40, 0x40, "frame IRQ should have fired by now");
    let status_again = nes_core::apu::read_status(&mut console.apu);
    assert_eq!(status_again & 0x40, 0, "reading status clears the frame IRQ flag");
}

#[test]
fn apu_step_does_not_panic_across_a_full_frame_of_cycles() {
    let mut console = blank_console();
    for _ in 0..29_780 {
        nes_core::apu::step(&mut console);
    }
}
