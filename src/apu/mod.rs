//! Audio Processing Unit: the frame counter plus the five sound channels
//! (two pulse, triangle, noise, DMC) and their fixed-point mixer. No
//! equivalent module exists in the teacher repo; the per-channel file split
//! and the `Pulse`/`Triangle`/`Noise`/`Dmc` state shapes follow
//! `examples/mikai233-nesium/crates/nesium-core/src/apu/*`, while the
//! frame-counter and mixing formulas follow this codebase's own simpler
//! floor-division timing model rather than that repo's cycle-exact one.

mod dmc;
mod envelope;
mod length_counter;
mod noise;
mod pulse;
mod tables;
mod triangle;

use crate::common::Memory;
use crate::console::Console;

use dmc::Dmc;
use noise::Noise;
use pulse::{Pulse, PulseChannel};
use triangle::Triangle;

/// CPU (and therefore APU) clock rate on NTSC hardware, in Hz.
pub const CPU_FREQUENCY: u64 = 1_789_773;

/// The frame sequencer advances one step every time the running cycle
/// counter crosses a multiple of this many CPU cycles.
const FRAME_COUNTER_RATE: u64 = CPU_FREQUENCY / 240;

/// A mixed sample is emitted every time the running cycle counter crosses a
/// multiple of this many CPU cycles, yielding roughly 44,100 samples/sec.
const SAMPLE_RATE_DIVIDER: u64 = CPU_FREQUENCY / 44_100;

pub struct Apu {
    cycle: u64,
    frame_period: u8,
    frame_value: u8,
    frame_irq_enable: bool,
    frame_irq_flag: bool,
    pulse1: Pulse,
    pulse2: Pulse,
    triangle: Triangle,
    noise: Noise,
    dmc: Dmc,
    pulse_table: [f64; 31],
    tnd_table: [f64; 203],
}

impl Apu {
    pub fn new() -> Self {
        Apu {
            cycle: 0,
            frame_period: 4,
            frame_value: 0,
            frame_irq_enable: true,
            frame_irq_flag: false,
            pulse1: Pulse::new(PulseChannel::One),
            pulse2: Pulse::new(PulseChannel::Two),
            triangle: Triangle::new(),
            noise: Noise::new(),
            dmc: Dmc::new(),
            pulse_table: build_pulse_table(),
            tnd_table: build_tnd_table(),
        }
    }

    pub fn reset(&mut self) {
        let pulse_table = self.pulse_table;
        let tnd_table = self.tnd_table;
        *self = Apu::new();
        self.pulse_table = pulse_table;
        self.tnd_table = tnd_table;
    }

    /// True while either the frame sequencer or the DMC channel is holding
    /// its level-triggered IRQ line high; aggregated into `cpu.pending_irq`
    /// at the top of `Console::step`.
    pub fn irq_line(&self) -> bool {
        self.frame_irq_flag || self.dmc.irq_flag
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

fn build_pulse_table() -> [f64; 31] {
    let mut table = [0.0f64; 31];
    for (i, entry) in table.iter_mut().enumerate().skip(1) {
        *entry = 95.52 / (8128.0 / i as f64 + 100.0);
    }
    table
}

fn build_tnd_table() -> [f64; 203] {
    let mut table = [0.0f64; 203];
    for (i, entry) in table.iter_mut().enumerate().skip(1) {
        *entry = 163.67 / (24329.0 / i as f64 + 100.0);
    }
    table
}

/// Reads `$4015`. Clears the frame-IRQ flag as a side effect, matching
/// hardware; the DMC-IRQ flag is untouched by status reads and only clears
/// through `$4010` or channel re-enable.
pub fn read_status(apu: &mut Apu) -> u8 {
    let mut value = 0u8;
    if apu.pulse1.length.active() {
        value |= 0x01;
    }
    if apu.pulse2.length.active() {
        value |= 0x02;
    }
    if apu.triangle.length.active() {
        value |= 0x04;
    }
    if apu.noise.length.active() {
        value |= 0x08;
    }
    if apu.dmc.current_length > 0 {
        value |= 0x10;
    }
    if apu.frame_irq_flag {
        value |= 0x40;
    }
    if apu.dmc.irq_flag {
        value |= 0x80;
    }
    apu.frame_irq_flag = false;
    value
}

pub fn write_register(console: &mut Console, addr: u16, value: u8) {
    match addr {
        0x4000 => console.apu.pulse1.write_control(value),
        0x4001 => console.apu.pulse1.write_sweep(value),
        0x4002 => console.apu.pulse1.write_timer_low(value),
        0x4003 => console.apu.pulse1.write_timer_high(value),
        0x4004 => console.apu.pulse2.write_control(value),
        0x4005 => console.apu.pulse2.write_sweep(value),
        0x4006 => console.apu.pulse2.write_timer_low(value),
        0x4007 => console.apu.pulse2.write_timer_high(value),
        0x4008 => console.apu.triangle.write_control(value),
        0x400A => console.apu.triangle.write_timer_low(value),
        0x400B => console.apu.triangle.write_timer_high(value),
        0x400C => console.apu.noise.write_control(value),
        0x400E => console.apu.noise.write_period(value),
        0x400F => console.apu.noise.write_length(value),
        0x4010 => console.apu.dmc.write_control(value),
        0x4011 => console.apu.dmc.write_direct_load(value),
        0x4012 => console.apu.dmc.write_sample_address(value),
        0x4013 => console.apu.dmc.write_sample_length(value),
        0x4015 => write_status(console, value),
        0x4017 => write_frame_counter(console, value),
        _ => {}
    }
}

fn write_status(console: &mut Console, value: u8) {
    console.apu.pulse1.set_enabled(value & 0x01 != 0);
    console.apu.pulse2.set_enabled(value & 0x02 != 0);
    console.apu.triangle.set_enabled(value & 0x04 != 0);
    console.apu.noise.set_enabled(value & 0x08 != 0);
    console.apu.dmc.irq_flag = false;
    console.apu.dmc.set_enabled(value & 0x10 != 0);
}

fn write_frame_counter(console: &mut Console, value: u8) {
    console.apu.frame_period = if value & 0x80 != 0 { 5 } else { 4 };
    console.apu.frame_value = 0;
    console.apu.frame_irq_enable = value & 0x40 == 0;
    if !console.apu.frame_irq_enable {
        console.apu.frame_irq_flag = false;
    }
    if console.apu.frame_period == 5 {
        clock_quarter_frame(console);
        clock_half_frame(console);
    }
}

/// Advances the APU by one CPU cycle: the frame sequencer, every channel
/// timer, the DMC's memory-reader side channel, and sample emission.
pub fn step(console: &mut Console) {
    let prev_cycle = console.apu.cycle;
    let cycle = prev_cycle + 1;
    console.apu.cycle = cycle;

    if prev_cycle / FRAME_COUNTER_RATE != cycle / FRAME_COUNTER_RATE {
        step_frame_counter(console);
    }

    step_timers(console);

    if prev_cycle / SAMPLE_RATE_DIVIDER != cycle / SAMPLE_RATE_DIVIDER {
        emit_sample(console);
    }
}

fn step_frame_counter(console: &mut Console) {
    console.apu.frame_value = (console.apu.frame_value + 1) % console.apu.frame_period;
    let value = console.apu.frame_value;
    match console.apu.frame_period {
        4 => match value {
            0 | 2 => clock_quarter_frame(console),
            1 => {
                clock_quarter_frame(console);
                clock_half_frame(console);
            }
            3 => {
                clock_quarter_frame(console);
                clock_half_frame(console);
                if console.apu.frame_irq_enable {
                    console.apu.frame_irq_flag = true;
                }
            }
            _ => unreachable!("4-step frame value out of range"),
        },
        _ => match value {
            0 | 2 => clock_quarter_frame(console),
            1 | 3 => {
                clock_quarter_frame(console);
                clock_half_frame(console);
            }
            _ => {}
        },
    }
}

fn clock_quarter_frame(console: &mut Console) {
    console.apu.pulse1.clock_envelope();
    console.apu.pulse2.clock_envelope();
    console.apu.noise.clock_envelope();
    console.apu.triangle.clock_linear_counter();
}

fn clock_half_frame(console: &mut Console) {
    console.apu.pulse1.clock_length();
    console.apu.pulse2.clock_length();
    console.apu.triangle.clock_length();
    console.apu.noise.clock_length();
    console.apu.pulse1.clock_sweep();
    console.apu.pulse2.clock_sweep();
}

fn step_timers(console: &mut Console) {
    console.apu.triangle.clock_timer();
    if console.apu.cycle % 2 == 0 {
        console.apu.pulse1.clock_timer();
        console.apu.pulse2.clock_timer();
        console.apu.noise.clock_timer();
        step_dmc(console);
    }
}

fn step_dmc(console: &mut Console) {
    if console.apu.dmc.tick() {
        console.apu.dmc.shift_output();
    }
    fetch_dmc_sample(console);
}

/// Fetches the next sample byte over the CPU bus when the shifter has run
/// dry, stalling the CPU for 4 cycles the way a real DMA-style fetch would.
fn fetch_dmc_sample(console: &mut Console) {
    if !console.apu.dmc.needs_sample() {
        return;
    }
    let addr = console.apu.dmc.current_address;
    let byte = console.cpu_bus().read_byte(addr);
    console.cpu.stall_cycles += 4;
    console.apu.dmc.load_sample_byte(byte);
}

fn emit_sample(console: &mut Console) {
    let p1 = console.apu.pulse1.output();
    let p2 = console.apu.pulse2.output();
    let t = console.apu.triangle.output();
    let n = console.apu.noise.output();
    let d = console.apu.dmc.output();

    let pulse_out = console.apu.pulse_table[(p1 + p2) as usize];
    let tnd_index = 3 * t as usize + 2 * n as usize + d as usize;
    let tnd_out = console.apu.tnd_table[tnd_index];
    let sample = pulse_out + tnd_out;

    if let Some(mut sink) = console.audio_sink.take() {
        sink(sample);
        console.audio_sink = Some(sink);
    }
}
