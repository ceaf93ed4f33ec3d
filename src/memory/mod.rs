// src/memory/mod.rs

pub mod arbiter;
pub mod bus;
pub mod byte_utils;
pub mod z80_bus;

pub use arbiter::{BusArbiter, SoundCpuState};
pub use bus::Bus;
pub use z80_bus::Z80Bus;

use crate::vdp::DmaSource;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Byte-addressed view of an address space, as seen by a CPU core.
pub trait MemoryInterface {
    fn read_byte(&mut self, address: u32) -> u8;
    fn write_byte(&mut self, address: u32, value: u8);

    fn read_word(&mut self, address: u32) -> u16 {
        let high = self.read_byte(address);
        let low = self.read_byte(address.wrapping_add(1));
        byte_utils::join_u16(high, low)
    }

    fn write_word(&mut self, address: u32, value: u16) {
        let (high, low) = byte_utils::split_u16(value);
        self.write_byte(address, high);
        self.write_byte(address.wrapping_add(1), low);
    }

    fn read_long(&mut self, address: u32) -> u32 {
        let high = self.read_word(address);
        let low = self.read_word(address.wrapping_add(2));
        byte_utils::join_u32_words(high, low)
    }

    fn write_long(&mut self, address: u32, value: u32) {
        let (high, low) = byte_utils::split_u32_to_words(value);
        self.write_word(address, high);
        self.write_word(address.wrapping_add(2), low);
    }
}

/// Cartridge ROM and 68k work RAM.
///
/// Kept apart from the rest of the bus so the VDP can read DMA source words
/// while the bus is busy handing it a control port write.
#[derive(Debug, Serialize, Deserialize)]
pub struct MainMemory {
    #[serde(skip)]
    pub rom: Vec<u8>,
    /// 64KB, mirrored through 0xE00000-0xFFFFFF
    pub work_ram: Box<[u8]>,
}

impl Default for MainMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMemory {
    pub fn new() -> Self {
        Self {
            rom: Vec::new(),
            work_ram: vec![0; 0x10000].into_boxed_slice(),
        }
    }

    pub fn read_rom(&self, addr: u32) -> u8 {
        self.rom.get(addr as usize).copied().unwrap_or(0xFF)
    }

    pub fn read_ram(&self, addr: u32) -> u8 {
        self.work_ram[(addr & 0xFFFF) as usize]
    }

    pub fn write_ram(&mut self, addr: u32, value: u8) {
        self.work_ram[(addr & 0xFFFF) as usize] = value;
    }
}

impl DmaSource for MainMemory {
    fn read_dma_word(&mut self, address: u32) -> u16 {
        let addr = address & 0xFF_FFFE;
        if addr >= 0xE0_0000 {
            byte_utils::join_u16(self.read_ram(addr), self.read_ram(addr + 1))
        } else {
            byte_utils::join_u16(self.read_rom(addr), self.read_rom(addr + 1))
        }
    }
}

/// FM and PSG chips, which live outside this crate.
pub trait SoundSink: Debug {
    fn write_psg(&mut self, value: u8);
    /// `port` is the low two address bits of the FM window.
    fn write_fm(&mut self, port: u8, value: u8);
    fn read_fm_status(&mut self) -> u8 {
        0
    }
}

/// Swallows every sound chip access.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn write_psg(&mut self, value: u8) {
        log::trace!("PSG write {:#04x}", value);
    }

    fn write_fm(&mut self, port: u8, value: u8) {
        log::trace!("FM port {} write {:#04x}", port, value);
    }
}

#[cfg(test)]
mod tests_bus_vdp;
