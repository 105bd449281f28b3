//! The PPU's 14-bit address space: pattern tables (via the mapper/
//! cartridge CHR), two mirrored 1 KiB nametables, and the 32-byte palette
//! RAM. Nametable mirroring math grounded on the teacher's
//! `ppu/ppu_bus.rs::mirror_vram_addr`.

use crate::cartridge::Mirroring;
use crate::console::Console;

pub struct PpuBus<'a> {
    console: &'a mut Console,
}

fn mirror_nametable_addr(mirroring: Mirroring, addr: u16) -> u16 {
    let vram_index = (addr - 0x2000) % 0x1000;
    let table = vram_index / 0x400;
    let offset = vram_index % 0x400;
    let bank = match (mirroring, table) {
        (Mirroring::Vertical, 0) | (Mirroring::Vertical, 2) => 0,
        (Mirroring::Vertical, 1) | (Mirroring::Vertical, 3) => 1,
        (Mirroring::Horizontal, 0) | (Mirroring::Horizontal, 1) => 0,
        (Mirroring::Horizontal, 2) | (Mirroring::Horizontal, 3) => 1,
        (Mirroring::SingleScreenLower, _) => 0,
        (Mirroring::SingleScreenUpper, _) => 1,
        (Mirroring::FourScreen, _) => table as u16,
        _ => 0,
    };
    // `Ppu::vram` only backs 2 KiB (spec.md §3); four-screen mirroring
    // would otherwise need a cartridge-supplied extra 2 KiB of nametable
    // RAM, so fold banks 2/3 back onto 0/1 instead of indexing out of
    // bounds.
    (bank * 0x400 + offset) & 0x07FF
}

fn mirror_palette_addr(addr: u16) -> u16 {
    let addr = addr & 0x1F;
    match addr {
        0x10 | 0x14 | 0x18 | 0x1C => addr - 0x10,
        other => other,
    }
}

impl<'a> PpuBus<'a> {
    pub fn new(console: &'a mut Console) -> Self {
        PpuBus { console }
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => {
                self.console.mapper.ppu_address_tick(addr);
                let cart = &self.console.cartridge;
                self.console.mapper.ppu_read(cart, addr)
            }
            0x2000..=0x3EFF => {
                let mirroring = self.console.mapper.mirroring(&self.console.cartridge);
                self.console.ppu.vram[mirror_nametable_addr(mirroring, addr) as usize]
            }
            0x3F00..=0x3FFF => self.console.ppu.palette[mirror_palette_addr(addr) as usize],
            _ => 0,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => {
                self.console.mapper.ppu_address_tick(addr);
                let mapper = &mut self.console.mapper;
                let cart = &mut self.console.cartridge;
                mapper.ppu_write(cart, addr, value);
            }
            0x2000..=0x3EFF => {
                let mirroring = self.console.mapper.mirroring(&self.console.cartridge);
                let index = mirror_nametable_addr(mirroring, addr) as usize;
                self.console.ppu.vram[index] = value;
            }
            0x3F00..=0x3FFF => {
                let index = mirror_palette_addr(addr) as usize;
                self.console.ppu.palette[index] = value;
            }
            _ => {}
        }
    }
}
