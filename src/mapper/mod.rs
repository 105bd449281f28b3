//! Cartridge mappers: the bank-switching logic layered over a `Cartridge`'s
//! fixed PRG/CHR data. Grounded on the trait shape used across the
//! reference pack's mapper implementations (one `Mapper` trait, one file
//! per board), but scoped to `Cartridge`-backed state rather than owning
//! its own copies of PRG/CHR.
//!
//! The teacher codebase has no mapper abstraction at all (`cpu_bus.rs`
//! hard-codes 16 KiB PRG mirroring inline), so this module is new.

mod axrom;
mod cnrom;
mod mmc1;
mod mmc3;
mod uxrom;

use crate::cartridge::{Cartridge, Mirroring};
use crate::error::NesError;

/// A cartridge's bank-switching logic. Implementors hold only bank-select
/// state; the underlying PRG/CHR/PRG-RAM bytes live in the `Cartridge`
/// passed to every method, matching spec.md §4.3's requirement that a
/// mapper "holds no copy of cartridge data, only bank-selection state."
pub trait Mapper {
    fn cpu_read(&mut self, cart: &Cartridge, addr: u16) -> u8;
    fn cpu_write(&mut self, cart: &mut Cartridge, addr: u16, value: u8) -> Result<(), NesError>;
    fn ppu_read(&mut self, cart: &Cartridge, addr: u16) -> u8;
    fn ppu_write(&mut self, cart: &mut Cartridge, addr: u16, value: u8);

    /// Overridden by mappers with a dynamic mirroring mode (MMC1, MMC3).
    /// Mappers with fixed mirroring defer to the cartridge's header bit.
    fn mirroring(&self, cart: &Cartridge) -> Mirroring {
        cart.mirroring
    }

    fn irq_pending(&self) -> bool {
        false
    }

    fn irq_acknowledge(&mut self) {}

    /// Called once per PPU dot with the current PPU address line, so
    /// mappers that snoop A12 (MMC3) can detect rising edges. Mappers that
    /// don't care ignore it.
    fn ppu_address_tick(&mut self, _addr: u16) {}
}

/// Construct the mapper for a cartridge's `mapper_number`. Only the
/// mappers named in scope (spec.md §1) are supported; anything else is an
/// error rather than a silently-wrong fallback.
pub fn build(cart: &Cartridge) -> Result<Box<dyn Mapper>, NesError> {
    match cart.mapper_number {
        0 | 2 => Ok(Box::new(uxrom::UxRom::new())),
        1 => Ok(Box::new(mmc1::Mmc1::new())),
        3 => Ok(Box::new(cnrom::CnRom::new())),
        4 => Ok(Box::new(mmc3::Mmc3::new())),
        7 => Ok(Box::new(axrom::AxRom::new())),
        other => Err(NesError::UnsupportedMapper(other)),
    }
}

/// Shared helper: index into a `Vec<u8>` bank array given a bank size, the
/// bank number and an offset within the bank. Used by every mapper to
/// avoid repeating the same modular arithmetic.
pub(crate) fn bank_offset(data_len: usize, bank_size: usize, bank: usize, offset: usize) -> usize {
    let bank_count = data_len / bank_size;
    let bank = if bank_count == 0 { 0 } else { bank % bank_count };
    (bank * bank_size) + offset
}
