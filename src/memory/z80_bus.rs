//! Sound CPU Bus Adapter
//!
//! Routes sound CPU (Z80) memory accesses:
//! - 0000h-1FFFh: Sound RAM (8KB, mirrored to 3FFFh)
//! - 4000h-5FFFh: FM chip
//! - 6000h-60FFh: Bank register (one bit per write)
//! - 7F00h-7F1Fh: VDP ports, 7F11h is the PSG
//! - 8000h-FFFFh: 32KB window into main CPU memory

use super::{Bus, MemoryInterface};

/// Borrowed view of the main bus from the sound CPU's side.
///
/// Built fresh for every sound CPU step, so the main bus keeps a single
/// owner and no shared-ownership wrapper is needed.
#[derive(Debug)]
pub struct Z80Bus<'a> {
    bus: &'a mut Bus,
}

impl<'a> Z80Bus<'a> {
    pub fn new(bus: &'a mut Bus) -> Self {
        if !bus.arbiter.sound_cpu_running() {
            log::debug!("Sound CPU bus view created while {:?}", bus.arbiter.state());
        }
        Self { bus }
    }

    fn window_address(&self, addr: u16) -> Option<u32> {
        let target = self.bus.arbiter.window_address(addr);
        if (0xA00000..=0xA0FFFF).contains(&target) {
            log::warn!("Sound CPU window points at its own address space ({:#08x})", target);
            return None;
        }
        Some(target)
    }
}

impl MemoryInterface for Z80Bus<'_> {
    fn read_byte(&mut self, address: u32) -> u8 {
        let addr = address as u16;

        match addr {
            0x0000..=0x3FFF => self.bus.z80_ram[usize::from(addr & 0x1FFF)],
            0x4000..=0x5FFF => self.bus.sound.read_fm_status(),
            0x6000..=0x7EFF => 0xFF,
            0x7F00..=0x7F1F => self.bus.read_vdp_byte(0xC00000 | u32::from(addr & 0x1F)),
            0x7F20..=0x7FFF => 0xFF,
            0x8000..=0xFFFF => match self.window_address(addr) {
                Some(target) => self.bus.read_byte(target),
                None => 0xFF,
            },
        }
    }

    fn write_byte(&mut self, address: u32, value: u8) {
        let addr = address as u16;

        match addr {
            0x0000..=0x3FFF => self.bus.z80_ram[usize::from(addr & 0x1FFF)] = value,
            0x4000..=0x5FFF => self.bus.sound.write_fm((addr & 3) as u8, value),
            0x6000..=0x60FF => self.bus.arbiter.write_bank_bit(value),
            0x7F00..=0x7F1F => self.bus.write_vdp_byte(0xC00000 | u32::from(addr & 0x1F), value),
            0x8000..=0xFFFF => {
                if let Some(target) = self.window_address(addr) {
                    self.bus.write_byte(target, value);
                }
            }
            _ => log::trace!("Unmapped sound CPU write {:#06x}", addr),
        }
    }
}
