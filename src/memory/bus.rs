//! Sega Genesis/Mega Drive Memory Bus
//!
//! Routes main CPU accesses to cartridge ROM, work RAM, the sound CPU's
//! address space and the VDP ports.
//!
//! ## Memory Map
//!
//! | Address Range      | Size   | Description                    |
//! |:-------------------|:-------|:-------------------------------|
//! | 0x000000-0x3FFFFF  | 4 MB   | ROM/Cartridge                  |
//! | 0xA00000-0xA0FFFF  | 64 KB  | Sound CPU address space        |
//! | 0xA10000-0xA1001F  | 32 B   | I/O ports (not emulated)       |
//! | 0xA11100-0xA11101  | 2 B    | Sound CPU bus request          |
//! | 0xA11200-0xA11201  | 2 B    | Sound CPU reset                |
//! | 0xC00000-0xDFFFFF  | 2 MB   | VDP ports (mirrored)           |
//! | 0xE00000-0xFFFFFF  | 2 MB   | Work RAM (64KB mirrored)       |

use super::byte_utils;
use super::{BusArbiter, MainMemory, MemoryInterface, NullSound, SoundSink};
use crate::config::{Config, Result};
use crate::debugger::Debuggable;
use crate::vdp::Vdp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Address bits that must be clear for a VDP port mirror to respond:
/// `110n n000 nnnn nnnn 000m mmmm`.
const VDP_MIRROR_MASK: u32 = 0x2700E0;

fn default_sound() -> Box<dyn SoundSink> {
    Box::new(NullSound)
}

/// Sega Genesis Memory Bus
#[derive(Debug, Serialize, Deserialize)]
pub struct Bus {
    /// ROM and work RAM
    pub memory: MainMemory,

    /// Sound CPU RAM (8KB at 0xA00000, mirrored to 0xA03FFF)
    pub z80_ram: Box<[u8]>,

    pub vdp: Vdp,

    pub arbiter: BusArbiter,

    #[serde(skip, default = "default_sound")]
    pub sound: Box<dyn SoundSink>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self {
            memory: MainMemory::new(),
            z80_ram: vec![0; 0x2000].into_boxed_slice(),
            vdp: Vdp::new(),
            arbiter: BusArbiter::new(),
            sound: default_sound(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut bus = Self::new();
        bus.vdp.apply_config(config);
        bus.arbiter.log_refused = config.log_refused_z80_access;
        bus
    }

    /// Load a ROM into the bus
    pub fn load_rom(&mut self, data: &[u8]) {
        self.memory.rom = data.to_vec();
    }

    pub fn set_sound(&mut self, sound: Box<dyn SoundSink>) {
        self.sound = sound;
    }

    /// Port offset (0x00-0x1F) for a VDP area address, or `None` for an
    /// address that does not decode to the VDP.
    fn vdp_port(addr: u32) -> Option<u32> {
        if addr & VDP_MIRROR_MASK != 0 {
            log::warn!("Access to invalid VDP mirror {:#08x}", addr);
            None
        } else {
            Some(addr & 0x1F)
        }
    }

    pub fn read_vdp_word(&mut self, addr: u32) -> u16 {
        let Some(port) = Self::vdp_port(addr) else {
            return 0xFFFF;
        };
        match port & 0x1E {
            0x00 | 0x02 => self.vdp.read_data(),
            0x04 | 0x06 => self.vdp.read_control(),
            0x08..=0x0E => self.vdp.read_hv_counter(),
            0x10..=0x16 => {
                log::warn!("Read from PSG port {:#04x}", port);
                0
            }
            _ => {
                log::warn!("Read from reserved VDP port {:#04x}", port);
                0
            }
        }
    }

    pub fn write_vdp_word(&mut self, addr: u32, value: u16) {
        let Some(port) = Self::vdp_port(addr) else {
            return;
        };
        match port & 0x1E {
            0x00 | 0x02 => self.vdp.write_data(value),
            0x04 | 0x06 => self.vdp.write_control(value, &mut self.memory),
            0x08..=0x0E => log::warn!("Write {:#06x} to read-only HV counter", value),
            0x10..=0x16 => self.sound.write_psg(value as u8),
            _ => log::warn!(
                "Write {:#06x} to reserved VDP port {:#04x} ignored, hardware would lock up",
                value,
                port
            ),
        }
    }

    pub fn read_vdp_byte(&mut self, addr: u32) -> u8 {
        let word = self.read_vdp_word(addr & !1);
        byte_utils::word_lane(word, addr)
    }

    /// Byte writes to the data and control ports put the byte on both halves
    /// of the data bus.
    pub fn write_vdp_byte(&mut self, addr: u32, value: u8) {
        match Self::vdp_port(addr) {
            None => {}
            Some(0x10..=0x17) => self.sound.write_psg(value),
            Some(_) => self.write_vdp_word(addr & !1, u16::from_be_bytes([value, value])),
        }
    }

    fn read_z80_area(&mut self, addr: u32) -> u8 {
        if !self.arbiter.main_cpu_has_bus() {
            if self.arbiter.log_refused {
                log::warn!("Sound CPU area read at {:#08x} without bus", addr);
            }
            return 0xFF;
        }
        match (addr & 0xFFFF) as u16 {
            off @ 0x0000..=0x3FFF => self.z80_ram[usize::from(off & 0x1FFF)],
            0x4000..=0x5FFF => self.sound.read_fm_status(),
            off => {
                log::debug!("Unmapped sound CPU area read {:#06x}", off);
                0xFF
            }
        }
    }

    fn write_z80_area(&mut self, addr: u32, value: u8) {
        if !self.arbiter.main_cpu_has_bus() {
            if self.arbiter.log_refused {
                log::warn!("Sound CPU area write at {:#08x} without bus", addr);
            }
            return;
        }
        match (addr & 0xFFFF) as u16 {
            off @ 0x0000..=0x3FFF => self.z80_ram[usize::from(off & 0x1FFF)] = value,
            off @ 0x4000..=0x5FFF => self.sound.write_fm((off & 3) as u8, value),
            0x6000..=0x60FF => self.arbiter.write_bank_bit(value),
            off @ 0x7F00..=0x7F1F => {
                log::warn!("Main CPU write to VDP through sound CPU area {:#06x}", off)
            }
            off => log::debug!("Unmapped sound CPU area write {:#06x}", off),
        }
    }

    fn read_control_area(&self, addr: u32) -> u8 {
        match addr {
            0xA11100 => self.arbiter.bus_request_status(),
            0xA11200 => self.arbiter.reset_status(),
            0xA11101 | 0xA11201 => 0x00,
            0xA10000..=0xA1001F => {
                log::debug!("I/O port read {:#08x} not emulated", addr);
                0xFF
            }
            _ => 0xFF,
        }
    }

    fn write_control_area(&mut self, addr: u32, value: u8) {
        match addr {
            0xA11100 => self.arbiter.write_bus_request(value),
            0xA11200 => self.arbiter.write_reset(value),
            0xA10000..=0xA1001F => log::debug!("I/O port write {:#08x} not emulated", addr),
            _ => {}
        }
    }
}

impl MemoryInterface for Bus {
    fn read_byte(&mut self, address: u32) -> u8 {
        let addr = address & 0xFFFFFF; // 24-bit address bus

        match addr {
            0x000000..=0x3FFFFF => self.memory.read_rom(addr),
            0xA00000..=0xA0FFFF => self.read_z80_area(addr),
            0xA10000..=0xA1FFFF => self.read_control_area(addr),
            0xC00000..=0xDFFFFF => self.read_vdp_byte(addr),
            0xE00000..=0xFFFFFF => self.memory.read_ram(addr),
            _ => 0xFF,
        }
    }

    fn write_byte(&mut self, address: u32, value: u8) {
        let addr = address & 0xFFFFFF;

        match addr {
            0x000000..=0x3FFFFF => {} // ROM is read-only
            0xA00000..=0xA0FFFF => self.write_z80_area(addr, value),
            0xA10000..=0xA1FFFF => self.write_control_area(addr, value),
            0xC00000..=0xDFFFFF => self.write_vdp_byte(addr, value),
            0xE00000..=0xFFFFFF => self.memory.write_ram(addr, value),
            _ => {}
        }
    }

    fn read_word(&mut self, address: u32) -> u16 {
        let addr = address & 0xFFFFFF;
        if (0xC00000..=0xDFFFFF).contains(&addr) {
            return self.read_vdp_word(addr);
        }
        let high = self.read_byte(addr);
        let low = self.read_byte(addr.wrapping_add(1));
        byte_utils::join_u16(high, low)
    }

    fn write_word(&mut self, address: u32, value: u16) {
        let addr = address & 0xFFFFFF;
        match addr {
            0xC00000..=0xDFFFFF => self.write_vdp_word(addr, value),
            // Only the high byte reaches the 8-bit sound bus
            0xA00000..=0xA0FFFF => self.write_z80_area(addr, (value >> 8) as u8),
            _ => {
                let (high, low) = byte_utils::split_u16(value);
                self.write_byte(addr, high);
                self.write_byte(addr.wrapping_add(1), low);
            }
        }
    }
}

impl Debuggable for Bus {
    fn read_state(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn write_state(&mut self, state: &Value) -> Result<()> {
        let mut new_bus: Bus = serde_json::from_value(state.clone())?;
        // Rebuild the VDP through its own checks
        let vdp_state = state.get("vdp").cloned().unwrap_or(Value::Null);
        new_bus.vdp.write_state(&vdp_state)?;
        new_bus.memory.rom = std::mem::take(&mut self.memory.rom);
        new_bus.sound = std::mem::replace(&mut self.sound, default_sound());
        *self = new_bus;
        Ok(())
    }
}
