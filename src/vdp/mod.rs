//! Genesis Video Display Processor (VDP)
//!
//! The VDP owns VRAM, CRAM, VSRAM and a 32-byte register file, all reached
//! through a data port and a control port. Control port writes either set a
//! register or latch a two-word command; data port accesses then read or
//! write the selected memory, and a command with CD5 set kicks off a DMA.

use crate::config::{Config, Error, Region, Result};
use crate::debugger::Debuggable;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod constants;
pub use constants::*;

pub mod command;
pub use command::{AccessMode, CommandLatch, Target};

pub mod registers;
pub use registers::{DmaMode, HScrollMode, VScrollMode, VdpRegisters, WindowPosition};

pub mod dma;
pub use dma::{DmaKind, DmaOps, DmaSource, DmaState};

pub mod render;
pub use render::{LineBuffer, Pixel, Plane, RenderOps};

pub mod sprites;
pub use sprites::{SpriteAttributes, SpriteIterator, SpriteLineStatus};

pub mod timing;
pub use timing::{InterruptSink, NullInterrupts, Timing, VideoSink, HBLANK_START};

pub mod palette;
pub use palette::{FrameBuffer, Palette};

#[derive(Debug, Serialize, Deserialize)]
pub struct Vdp {
    pub vram: Box<[u8]>,
    /// Colour words, ----BBB-GGG-RRR-
    pub cram: Box<[u16]>,
    pub vsram: Box<[u16]>,
    pub registers: [u8; NUM_REGISTERS],
    pub command: CommandLatch,
    /// Armed or running DMA. `DmaKind::None` when idle.
    pub dma: DmaState,
    pub timing: Timing,
    /// Enforce the per-line sprite limit.
    pub sprite_limits: bool,

    /// Decoded view of `registers`, rebuilt on every register write.
    #[serde(skip)]
    regs: VdpRegisters,
}

impl Default for Vdp {
    fn default() -> Self {
        Self::new()
    }
}

impl Vdp {
    pub fn new() -> Self {
        let registers = [0; NUM_REGISTERS];
        Self {
            vram: vec![0; VRAM_SIZE].into_boxed_slice(),
            cram: vec![0; CRAM_WORDS].into_boxed_slice(),
            vsram: vec![0; VSRAM_WORDS].into_boxed_slice(),
            registers,
            command: CommandLatch::default(),
            dma: DmaState::default(),
            timing: Timing::default(),
            sprite_limits: true,
            regs: VdpRegisters::decode(&registers),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut vdp = Self::new();
        vdp.apply_config(config);
        vdp
    }

    pub fn apply_config(&mut self, config: &Config) {
        self.set_region(config.region);
        self.sprite_limits = config.sprite_limits;
    }

    /// Clear registers and port state. Memory contents survive, as on hardware.
    pub fn reset(&mut self) {
        self.registers.fill(0);
        self.command = CommandLatch::default();
        self.dma = DmaState::default();
        let region = self.timing.region;
        self.timing = Timing::default();
        self.timing.region = region;
        self.refresh_registers();
    }

    pub fn set_region(&mut self, region: Region) {
        self.timing.region = region;
    }

    pub fn is_pal(&self) -> bool {
        self.timing.region == Region::Pal
    }

    /// The decoded register state.
    pub fn regs(&self) -> &VdpRegisters {
        &self.regs
    }

    /// Rebuild the decoded register view from the raw register file.
    pub fn refresh_registers(&mut self) {
        self.regs = VdpRegisters::decode(&self.registers);
    }

    pub fn write_register(&mut self, reg: usize, value: u8) {
        if reg >= NUM_REGISTERS {
            log::warn!("VDP register {} out of range", reg);
            return;
        }
        self.registers[reg] = value;
        self.refresh_registers();

        // An armed fill depends on the DMA enable bit and the DMA registers.
        let dma_register = reg == REG_MODE2 || (REG_DMA_LEN_LO..=REG_DMA_SRC_HI).contains(&reg);
        if dma_register && self.dma.kind == DmaKind::Fill {
            log::debug!("Register {} written while fill armed, cancelling fill", reg);
            self.dma = DmaState::default();
        }
    }

    pub fn write_control<M: DmaSource + ?Sized>(&mut self, value: u16, mem: &mut M) {
        if self.command.pending {
            self.command.write_second(value);
            if self.command.dma_requested() && self.regs.dma_enabled {
                self.start_dma(mem);
            }
            return;
        }

        // 10xx xxxx xxxx xxxx is a register write
        if (value & 0xC000) == 0x8000 {
            let reg = ((value >> 8) & 0x1F) as usize;
            self.write_register(reg, (value & 0xFF) as u8);
        } else {
            self.command.write_first(value);
        }
    }

    pub fn write_data(&mut self, value: u16) {
        self.command.pending = false;

        if self.dma.kind == DmaKind::Fill {
            self.run_fill(value);
            return;
        }

        let mode = self.command.mode();
        if mode.is_write() {
            self.write_target(mode.target(), self.command.address, value);
        } else {
            log::debug!("VDP data port write with read command {:?} ignored", mode);
        }
        self.command.advance(self.regs.auto_increment, mode.target());
    }

    pub fn read_data(&mut self) -> u16 {
        self.command.pending = false;

        let mode = self.command.mode();
        let val = if mode.is_write() {
            log::warn!("Illegal VDP data port read with write command {:?}", mode);
            0
        } else {
            self.read_target(mode.target(), self.command.address)
        };

        self.command.advance(self.regs.auto_increment, mode.target());
        val
    }

    /// Store a word in VRAM, CRAM or VSRAM.
    ///
    /// VRAM writes to an odd address land byte-swapped in the containing
    /// word, which falls out of storing the high byte at `addr` and the low
    /// byte at `addr ^ 1`.
    pub(crate) fn write_target(&mut self, target: Target, address: u32, value: u16) {
        match target {
            Target::Vram => {
                let idx = (address & 0xFFFF) as usize;
                self.vram[idx] = (value >> 8) as u8;
                self.vram[idx ^ 1] = (value & 0xFF) as u8;
            }
            Target::Cram => {
                let idx = ((address & SMALL_RAM_ADDR_MASK) >> 1) as usize;
                self.cram[idx] = value & 0x0EEE;
            }
            Target::Vsram => {
                let idx = ((address & SMALL_RAM_ADDR_MASK) >> 1) as usize;
                self.vsram[idx] = value & 0x07FF;
            }
        }
    }

    pub(crate) fn read_target(&self, target: Target, address: u32) -> u16 {
        match target {
            Target::Vram => {
                let idx = (address & 0xFFFE) as usize;
                u16::from_be_bytes([self.vram[idx], self.vram[idx + 1]])
            }
            Target::Cram => self.cram[((address & SMALL_RAM_ADDR_MASK) >> 1) as usize],
            Target::Vsram => self.vsram[((address & SMALL_RAM_ADDR_MASK) >> 1) as usize],
        }
    }

    pub fn auto_increment(&self) -> u8 {
        self.regs.auto_increment
    }

    pub fn is_control_pending(&self) -> bool {
        self.command.pending
    }

    pub fn display_enabled(&self) -> bool {
        self.regs.display_enabled
    }

    pub fn h40_mode(&self) -> bool {
        self.regs.h40
    }

    pub fn screen_width(&self) -> usize {
        self.regs.screen_width()
    }

    /// Read a big-endian word from VRAM, wrapping at 64KB.
    #[inline]
    pub(crate) fn vram_word(&self, addr: usize) -> u16 {
        u16::from_be_bytes([self.vram[addr & 0xFFFF], self.vram[(addr + 1) & 0xFFFF]])
    }
}

impl Debuggable for Vdp {
    fn read_state(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn write_state(&mut self, state: &Value) -> Result<()> {
        let mut new_vdp: Vdp = serde_json::from_value(state.clone())?;
        if new_vdp.vram.len() != VRAM_SIZE
            || new_vdp.cram.len() != CRAM_WORDS
            || new_vdp.vsram.len() != VSRAM_WORDS
        {
            return Err(Error::InvalidState(format!(
                "VDP memory sizes {}/{}/{}",
                new_vdp.vram.len(),
                new_vdp.cram.len(),
                new_vdp.vsram.len()
            )));
        }
        new_vdp.refresh_registers();
        new_vdp.check_restored_state()?;
        *self = new_vdp;
        Ok(())
    }
}

impl Vdp {
    /// Reject timing and DMA fields no running VDP can reach.
    ///
    /// Transfers and copies complete inside the control port write, so only
    /// an idle engine or an armed fill can be captured.
    fn check_restored_state(&self) -> Result<()> {
        if self.timing.line >= self.lines_per_frame() {
            return Err(Error::InvalidState(format!(
                "scanline {} beyond {} lines per frame",
                self.timing.line,
                self.lines_per_frame()
            )));
        }
        let dma = &self.dma;
        let consistent = match dma.kind {
            DmaKind::None => dma.remaining == 0,
            DmaKind::Fill => (1..=0x10000).contains(&dma.remaining),
            DmaKind::ToVram | DmaKind::ToCram | DmaKind::ToVsram | DmaKind::Copy => false,
        };
        if !consistent {
            return Err(Error::InvalidState(format!(
                "DMA {:?} with {} units remaining",
                dma.kind, dma.remaining
            )));
        }
        Ok(())
    }
}



#[cfg(test)]
mod tests_dma;




#[cfg(test)]
mod tests_properties;
