use super::{bank_offset, Mapper};
use crate::cartridge::{Cartridge, Mirroring};
use crate::error::NesError;

const PRG_BANK_SIZE: usize = 8 * 1024;
const CHR_BANK_SIZE: usize = 1024;

/// Mapper 4 (MMC3/TxROM). Eight bank registers (R0-R7) selected through
/// $8000's low 3 bits, committed through $8001. $A000 controls mirroring,
/// $C000/$C001 the scanline-IRQ latch/reload, $E000/$E001 IRQ disable/
/// enable. The IRQ counter decrements on PPU A12 rising edges, which the
/// PPU step function forwards through `ppu_address_tick`.
pub struct Mmc3 {
    bank_select: u8,
    regs: [u8; 8],
    mirroring: Mirroring,
    irq_latch: u8,
    irq_counter: u8,
    irq_enabled: bool,
    irq_pending: bool,
    reload_pending: bool,
    last_a12: bool,
}

impl Mmc3 {
    pub fn new() -> Self {
        Mmc3 {
            bank_select: 0,
            regs: [0; 8],
            mirroring: Mirroring::Horizontal,
            irq_latch: 0,
            irq_counter: 0,
            irq_enabled: false,
            irq_pending: false,
            reload_pending: false,
            last_a12: false,
        }
    }

    fn prg_mode(&self) -> u8 {
        (self.bank_select >> 6) & 1
    }

    fn chr_mode(&self) -> u8 {
        (self.bank_select >> 7) & 1
    }

    fn clock_irq_counter(&mut self) {
        if self.irq_counter == 0 || self.reload_pending {
            self.irq_counter = self.irq_latch;
            self.reload_pending = false;
        } else {
            self.irq_counter -= 1;
        }
        if self.irq_counter == 0 && self.irq_enabled {
            self.irq_pending = true;
        }
    }
}

impl Mapper for Mmc3 {
    fn cpu_read(&mut self, cart: &Cartridge, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => cart.prg_ram[(addr - 0x6000) as usize % cart.prg_ram.len()],
            0x8000..=0xFFFF => {
                let bank_count = (cart.prg_rom.len() / PRG_BANK_SIZE).max(1);
                let last = bank_count - 1;
                let second_last = bank_count.saturating_sub(2);
                let window = ((addr - 0x8000) / PRG_BANK_SIZE as u16) as u8;
                let bank = if self.prg_mode() == 0 {
                    match window {
                        0 => self.regs[6] as usize,
                        1 => self.regs[7] as usize,
                        2 => second_last,
                        _ => last,
                    }
                } else {
                    match window {
                        0 => second_last,
                        1 => self.regs[7] as usize,
                        2 => self.regs[6] as usize,
                        _ => last,
                    }
                };
                let off = bank_offset(cart.prg_rom.len(), PRG_BANK_SIZE, bank, (addr as usize) % PRG_BANK_SIZE);
                cart.prg_rom[off]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, cart: &mut Cartridge, addr: u16, value: u8) -> Result<(), NesError> {
        match addr {
            0x6000..=0x7FFF => {
                let len = cart.prg_ram.len();
                cart.prg_ram[(addr - 0x6000) as usize % len] = value;
                Ok(())
            }
            0x8000..=0x9FFF if addr % 2 == 0 => {
                self.bank_select = value;
                Ok(())
            }
            0x8000..=0x9FFF => {
                let idx = (self.bank_select & 0x07) as usize;
                self.regs[idx] = value;
                Ok(())
            }
            0xA000..=0xBFFF if addr % 2 == 0 => {
                self.mirroring = if value & 1 != 0 {
                    Mirroring::Horizontal
                } else {
                    Mirroring::Vertical
                };
                Ok(())
            }
            0xA000..=0xBFFF => Ok(()), // PRG-RAM protect bit; not enforced (dev-mode read/write always allowed)
            0xC000..=0xDFFF if addr % 2 == 0 => {
                self.irq_latch = value;
                Ok(())
            }
            0xC000..=0xDFFF => {
                self.reload_pending = true;
                Ok(())
            }
            0xE000..=0xFFFF if addr % 2 == 0 => {
                self.irq_enabled = false;
                self.irq_pending = false;
                Ok(())
            }
            0xE000..=0xFFFF => {
                self.irq_enabled = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn ppu_read(&mut self, cart: &Cartridge, addr: u16) -> u8 {
        let window = (addr / CHR_BANK_SIZE as u16) as usize;
        let bank = if self.chr_mode() == 0 {
            match window {
                0 | 1 => (self.regs[0] & 0xFE) as usize + (window & 1),
                2 | 3 => (self.regs[1] & 0xFE) as usize + (window & 1),
                4 => self.regs[2] as usize,
                5 => self.regs[3] as usize,
                6 => self.regs[4] as usize,
                _ => self.regs[5] as usize,
            }
        } else {
            match window {
                0 => self.regs[2] as usize,
                1 => self.regs[3] as usize,
                2 => self.regs[4] as usize,
                3 => self.regs[5] as usize,
                4 | 5 => (self.regs[0] & 0xFE) as usize + (window & 1),
                _ => (self.regs[1] & 0xFE) as usize + (window & 1),
            }
        };
        let off = bank_offset(cart.chr_rom.len(), CHR_BANK_SIZE, bank, (addr as usize) % CHR_BANK_SIZE);
        cart.chr_rom[off]
    }

    fn ppu_write(&mut self, cart: &mut Cartridge, addr: u16, value: u8) {
        if cart.chr_is_ram {
            let len = cart.chr_rom.len();
            cart.chr_rom[addr as usize % len] = value;
        }
    }

    fn mirroring(&self, _cart: &Cartridge) -> Mirroring {
        self.mirroring
    }

    fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    fn irq_acknowledge(&mut self) {
        self.irq_pending = false;
    }

    fn ppu_address_tick(&mut self, addr: u16) {
        let a12 = addr & 0x1000 != 0;
        if a12 && !self.last_a12 {
            self.clock_irq_counter();
        }
        self.last_a12 = a12;
    }
}
