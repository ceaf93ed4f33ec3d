use super::constants::*;
use super::registers::DmaMode;
use super::{AccessMode, Target, Vdp};
use serde::{Deserialize, Serialize};

/// Main-CPU memory seen by a 68k-to-VDP transfer.
///
/// Implemented by the bus-side memory so the VDP can pull words while the
/// bus still holds a mutable borrow of the VDP itself.
pub trait DmaSource {
    fn read_dma_word(&mut self, address: u32) -> u16;
}

impl<F: FnMut(u32) -> u16> DmaSource for F {
    fn read_dma_word(&mut self, address: u32) -> u16 {
        self(address)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmaKind {
    #[default]
    None,
    ToVram,
    ToCram,
    ToVsram,
    /// Armed by the control port, runs on the next data port write.
    Fill,
    Copy,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmaState {
    pub kind: DmaKind,
    pub source: u32,
    /// Units left to move. Words for transfers, bytes for fill and copy.
    pub remaining: u32,
}

/// The 68k can only be a DMA source for cartridge ROM and work RAM.
fn is_legal_source(address: u32) -> bool {
    address <= 0x3F_FFFF || address >= 0xE0_0000
}

pub trait DmaOps {
    /// Effective length in units. A zero length register means 65536.
    fn dma_length(&self) -> u32;
    fn is_dma_busy(&self) -> bool;
    fn start_dma<M: DmaSource + ?Sized>(&mut self, mem: &mut M);
    fn run_transfer<M: DmaSource + ?Sized>(&mut self, mem: &mut M);
    fn run_fill(&mut self, value: u16);
    fn run_copy(&mut self);
}

impl Vdp {
    fn read_source_word<M: DmaSource + ?Sized>(mem: &mut M, address: u32) -> u16 {
        if is_legal_source(address) {
            mem.read_dma_word(address)
        } else {
            log::warn!("DMA from illegal source {:#08x}", address);
            DMA_BAD_SOURCE
        }
    }

    fn finish_dma(&mut self) {
        self.registers[REG_DMA_LEN_LO] = 0;
        self.registers[REG_DMA_LEN_HI] = 0;
        self.dma = DmaState::default();
        self.refresh_registers();
    }
}

impl DmaOps for Vdp {
    fn dma_length(&self) -> u32 {
        match self.regs().dma_length {
            0 => 0x10000,
            len => len,
        }
    }

    fn is_dma_busy(&self) -> bool {
        self.dma.kind != DmaKind::None
    }

    fn start_dma<M: DmaSource + ?Sized>(&mut self, mem: &mut M) {
        let remaining = self.dma_length();
        match self.regs().dma_mode {
            DmaMode::Transfer => {
                let kind = match self.command.mode() {
                    AccessMode::VramWrite => DmaKind::ToVram,
                    AccessMode::CramWrite => DmaKind::ToCram,
                    AccessMode::VsramWrite => DmaKind::ToVsram,
                    other => {
                        log::warn!("DMA transfer requested with read command {:?}", other);
                        return;
                    }
                };
                self.dma = DmaState {
                    kind,
                    source: self.regs().dma_transfer_source,
                    remaining,
                };
                self.run_transfer(mem);
            }
            DmaMode::Fill => {
                log::debug!("DMA fill armed, {} bytes at {:#06x}", remaining, self.command.address);
                self.dma = DmaState {
                    kind: DmaKind::Fill,
                    source: 0,
                    remaining,
                };
            }
            DmaMode::Copy => {
                self.dma = DmaState {
                    kind: DmaKind::Copy,
                    source: u32::from(self.regs().dma_copy_source),
                    remaining,
                };
                self.run_copy();
            }
        }
    }

    fn run_transfer<M: DmaSource + ?Sized>(&mut self, mem: &mut M) {
        let target = match self.dma.kind {
            DmaKind::ToVram => Target::Vram,
            DmaKind::ToCram => Target::Cram,
            DmaKind::ToVsram => Target::Vsram,
            _ => return,
        };
        let inc = u32::from(self.regs().auto_increment);
        let mut addr = self.command.address;
        let mut source = self.dma.source;

        while self.dma.remaining > 0 {
            // CRAM and VSRAM destinations do not wrap during a transfer
            if target != Target::Vram && addr > SMALL_RAM_ADDR_MASK {
                log::debug!("DMA to {:?} stopped at {:#x}", target, addr);
                break;
            }
            let word = Self::read_source_word(mem, source);
            self.write_target(target, addr, word);

            addr = addr.wrapping_add(inc) & 0x1_FFFF;
            source += 2;
            if source > 0xFF_FFFF {
                source = 0xE0_0000;
            }
            self.dma.remaining -= 1;
        }

        self.command.address = addr & target.address_mask();
        let next = source >> 1;
        self.registers[REG_DMA_SRC_LO] = (next & 0xFF) as u8;
        self.registers[REG_DMA_SRC_MID] = ((next >> 8) & 0xFF) as u8;
        self.registers[REG_DMA_SRC_HI] = ((next >> 16) & 0x7F) as u8;
        self.finish_dma();
    }

    fn run_fill(&mut self, value: u16) {
        let mode = self.command.mode();
        if mode != AccessMode::VramWrite {
            log::warn!("DMA fill with {:?} command, writing once", mode);
            if mode.is_write() {
                self.write_target(mode.target(), self.command.address, value);
            }
            self.command.advance(self.regs().auto_increment, mode.target());
            self.finish_dma();
            return;
        }

        let fill = (value >> 8) as u8;
        let inc = u32::from(self.regs().auto_increment);
        let count = self.dma.remaining;
        let mut addr = self.command.address & 0xFFFF;

        for _ in 0..count {
            self.vram[addr as usize] = fill;
            addr = (addr + inc) & 0xFFFF;
        }

        self.command.address = addr;
        self.finish_dma();
    }

    fn run_copy(&mut self) {
        let inc = u32::from(self.regs().auto_increment);
        let count = self.dma.remaining;
        let mut src = self.dma.source as u16;
        let mut dst = self.command.address & 0xFFFF;

        for _ in 0..count {
            self.vram[dst as usize] = self.vram[src as usize];
            src = src.wrapping_add(1);
            dst = (dst + inc) & 0xFFFF;
        }

        self.command.address = dst;
        self.registers[REG_DMA_SRC_LO] = (src & 0xFF) as u8;
        self.registers[REG_DMA_SRC_MID] = (src >> 8) as u8;
        self.finish_dma();
    }
}
