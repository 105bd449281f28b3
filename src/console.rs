//! `Console`: the single owner of every component's state. Generalizes the
//! teacher's `nes.rs` (`ActionNES`, which wires `CpuState`/`PpuState`
//! together through short-lived `CpuBus`/`CpuAction` borrow wrappers) to
//! the full component set this spec requires (CPU, PPU, APU, a mapper
//! trait object, two controllers). No component holds a reference back to
//! `Console` — every operation instead takes `&mut Console` for the
//! duration of one step, matching spec.md §9's explicit prohibition on
//! owning back-references.

use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::controller::{Controller, ControllerState};
use crate::cpu::Cpu;
use crate::error::NesError;
use crate::mapper::{self, Mapper};
use crate::ppu::Ppu;

pub struct Console {
    pub cpu: Cpu,
    pub ppu: Ppu,
    pub apu: Apu,
    pub cartridge: Cartridge,
    pub mapper: Box<dyn Mapper>,
    pub controllers: [Controller; 2],
    pub ram: [u8; 0x0800],
    /// Host-provided sink for `write_audio_sample`; invoked by `apu::step`
    /// at roughly 44,100 Hz. Taken out of the `Option` for the duration of
    /// the call so the callback can freely borrow the console elsewhere
    /// (matching spec.md §9's "no owning back-references" rule).
    pub audio_sink: Option<Box<dyn FnMut(f64)>>,
}

/// One of the eight standard-controller inputs, numbered the way spec.md
/// §6's `button_down`/`button_up` host API expects.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
}

impl Button {
    fn state(self) -> ControllerState {
        match self {
            Button::A => ControllerState::A,
            Button::B => ControllerState::B,
            Button::Select => ControllerState::SELECT,
            Button::Start => ControllerState::START,
            Button::Up => ControllerState::UP,
            Button::Down => ControllerState::DOWN,
            Button::Left => ControllerState::LEFT,
            Button::Right => ControllerState::RIGHT,
        }
    }
}

/// A single CPU instruction's worth of simulated time is at most a few
/// dozen cycles, so clamping `run_for_seconds` to this keeps one call from
/// running away with an accidental `f64::INFINITY` or similar caller bug.
const MAX_RUN_SECONDS: f64 = 0.2;

impl Console {
    pub fn new(cartridge: Cartridge) -> Result<Self, NesError> {
        let mapper = mapper::build(&cartridge)?;
        let mut console = Console {
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            apu: Apu::new(),
            cartridge,
            mapper,
            controllers: [Controller::new(), Controller::new()],
            ram: [0; 0x0800],
            audio_sink: None,
        };
        console.reset();
        Ok(console)
    }

    pub fn load_rom(raw: &[u8]) -> Result<Self, NesError> {
        let cartridge = Cartridge::load(raw)?;
        Self::new(cartridge)
    }

    /// Resets the CPU (PC from the reset vector, cycle counter back to 0)
    /// and the PPU/APU to their power-on state, exactly as pressing the
    /// console's reset button would.
    pub fn reset(&mut self) {
        let pc = {
            let mut bus = self.cpu_bus();
            crate::common::Memory::read_two_bytes(&mut bus, 0xFFFC)
        };
        self.cpu.reset(pc);
        self.ppu.reset();
        self.apu.reset();
    }

    /// Runs exactly one CPU instruction (plus its associated PPU ticks at
    /// a 3:1 ratio and APU ticks at a 1:1 ratio with CPU cycles), and
    /// returns the number of CPU cycles spent. Matches spec.md §5's
    /// sequential interleave: CPU instruction, then PPU/APU catch-up.
    pub fn step(&mut self) -> Result<u32, NesError> {
        // IRQ is level-triggered: recompute it from its two sources fresh
        // at every instruction boundary rather than latching an edge.
        self.cpu.pending_irq = self.apu.irq_line() || self.mapper.irq_pending();
        let cpu_cycles = crate::cpu::execute::step(self)?;
        for _ in 0..cpu_cycles * 3 {
            crate::ppu::step_dot(self);
        }
        for _ in 0..cpu_cycles {
            crate::apu::step(self);
        }
        Ok(cpu_cycles)
    }

    /// Runs CPU instructions until the PPU completes a frame (the VBLANK
    /// 0->1 transition), mirroring the teacher's `next_ppu_frame`.
    pub fn step_frame(&mut self) -> Result<(), NesError> {
        let start_frame = self.ppu.frame_count;
        while self.ppu.frame_count == start_frame {
            self.step()?;
        }
        Ok(())
    }

    pub fn set_button(&mut self, controller: usize, button: ControllerState, pressed: bool) {
        self.controllers[controller].set_button(button, pressed);
    }

    /// Presses `button` on `player` (1 or 2). Out-of-range players are
    /// ignored rather than panicking, matching spec.md §7's guidance that a
    /// malformed host call should degrade rather than crash the core.
    pub fn button_down(&mut self, player: u8, button: Button) {
        if let Some(index) = player.checked_sub(1).filter(|&i| (i as usize) < self.controllers.len()) {
            self.controllers[index as usize].set_button(button.state(), true);
        }
    }

    pub fn button_up(&mut self, player: u8, button: Button) {
        if let Some(index) = player.checked_sub(1).filter(|&i| (i as usize) < self.controllers.len()) {
            self.controllers[index as usize].set_button(button.state(), false);
        }
    }

    /// Installs (or removes, via `None`) the host's audio-sample sink.
    pub fn set_audio_sink(&mut self, sink: Option<Box<dyn FnMut(f64)>>) {
        self.audio_sink = sink;
    }

    /// Runs CPU/PPU/APU steps until `seconds` of emulated time have passed,
    /// per spec.md §6's `run_for_seconds` host entry point. Clamped to
    /// `MAX_RUN_SECONDS` so a single call can't block the host indefinitely.
    pub fn run_for_seconds(&mut self, seconds: f64) -> Result<(), NesError> {
        let seconds = seconds.clamp(0.0, MAX_RUN_SECONDS);
        let target_cycles = (crate::apu::CPU_FREQUENCY as f64 * seconds) as u64;
        let start = self.cpu.cycle_count;
        while self.cpu.cycle_count.wrapping_sub(start) < target_cycles {
            self.step()?;
        }
        Ok(())
    }

    /// Sets up CPU state for the `nestest` automated test ROM (PC forced to
    /// $C000, 7 CPU cycles / 21 PPU dots already "elapsed" as the real
    /// power-up sequence would have left it) and runs the fixed 8,991
    /// instructions the ROM's log covers, handing each formatted trace line
    /// to `sink` as it's produced. See spec.md §4.8 and §8.
    pub fn nestest<F: FnMut(&str)>(&mut self, mut sink: F) -> Result<(), NesError> {
        self.cpu.program_counter = 0xC000;
        self.cpu.cycle_count = 7;
        self.cpu.pending_nmi = false;
        self.cpu.pending_irq = false;
        self.cpu.stall_cycles = 0;
        self.ppu.scanline = 0;
        self.ppu.cycle = 21;

        const NESTEST_INSTRUCTION_COUNT: usize = 8991;
        for _ in 0..NESTEST_INSTRUCTION_COUNT {
            let line = crate::cpu::trace::trace_line(self);
            sink(&line);
            self.step()?;
        }
        Ok(())
    }

    pub fn sram(&self) -> &[u8] {
        &self.cartridge.prg_ram
    }

    pub fn sram_mut(&mut self) -> &mut [u8] {
        &mut self.cartridge.prg_ram
    }

    pub fn frame_count(&self) -> u64 {
        self.ppu.frame_count
    }

    pub fn cpu_bus(&mut self) -> crate::cpu::bus::CpuBus<'_> {
        crate::cpu::bus::CpuBus::new(self)
    }

    pub fn ppu_bus(&mut self) -> crate::ppu::bus::PpuBus<'_> {
        crate::ppu::bus::PpuBus::new(self)
    }
}
