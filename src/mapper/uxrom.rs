use super::{bank_offset, Mapper};
use crate::cartridge::Cartridge;
use crate::error::NesError;

const PRG_BANK_SIZE: usize = 16 * 1024;

/// Mapper 0 (NROM) and mapper 2 (UxROM). NROM never receives register
/// writes from a well-formed ROM, so sharing one struct is safe: the
/// `prg_bank` register simply stays zero and both $8000-$BFFF/$C000-$FFFF
/// windows resolve to bank 0, which is exactly NROM's fixed mapping when
/// PRG-ROM is 16 KiB, and an identical mirror when it's 32 KiB (the
/// low/high windows then pick distinct halves only if software writes the
/// register, which NROM images don't).
pub struct UxRom {
    prg_bank: u8,
}

impl UxRom {
    pub fn new() -> Self {
        UxRom { prg_bank: 0 }
    }
}

impl Mapper for UxRom {
    fn cpu_read(&mut self, cart: &Cartridge, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => cart.prg_ram[(addr - 0x6000) as usize % cart.prg_ram.len()],
            0x8000..=0xBFFF => {
                let off = bank_offset(
                    cart.prg_rom.len(),
                    PRG_BANK_SIZE,
                    self.prg_bank as usize,
                    (addr - 0x8000) as usize,
                );
                cart.prg_rom[off]
            }
            0xC000..=0xFFFF => {
                let last_bank = cart.prg_rom.len() / PRG_BANK_SIZE - 1;
                let off = bank_offset(cart.prg_rom.len(), PRG_BANK_SIZE, last_bank, (addr - 0xC000) as usize);
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
            0x8000..=0xFFFF => {
                self.prg_bank = value & 0x0F;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn ppu_read(&mut self, cart: &Cartridge, addr: u16) -> u8 {
        cart.chr_rom[addr as usize % cart.chr_rom.len()]
    }

    fn ppu_write(&mut self, cart: &mut Cartridge, addr: u16, value: u8) {
        if cart.chr_is_ram {
            let len = cart.chr_rom.len();
            cart.chr_rom[addr as usize % len] = value;
        }
    }
}
