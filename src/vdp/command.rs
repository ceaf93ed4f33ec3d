//! Two-phase command/address latch of the control port.
//!
//! ```text
//! 1st write   CD1 CD0 A13 A12 A11 A10 A09 A08 A07 A06 A05 A04 A03 A02 A01 A00
//! 2nd write    ?   ?   ?   ?   ?   ?   ?   ?  CD5 CD4 CD3 CD2  ?   ?  A15 A14
//! ```

use super::constants::*;
use serde::{Deserialize, Serialize};

/// Memory behind the data port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Vram,
    Cram,
    Vsram,
}

impl Target {
    /// Mask applied to the latch address when it advances.
    pub fn address_mask(self) -> u32 {
        match self {
            Target::Vram => 0xFFFF,
            Target::Cram | Target::Vsram => SMALL_RAM_ADDR_MASK,
        }
    }
}

/// Data port operation selected by the low four bits of the command code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    VramRead,
    VramWrite,
    CramWrite,
    VsramRead,
    VsramWrite,
    CramRead,
}

impl AccessMode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code & 0x0F {
            VRAM_READ => Some(AccessMode::VramRead),
            VRAM_WRITE => Some(AccessMode::VramWrite),
            CRAM_WRITE => Some(AccessMode::CramWrite),
            VSRAM_READ => Some(AccessMode::VsramRead),
            VSRAM_WRITE => Some(AccessMode::VsramWrite),
            CRAM_READ => Some(AccessMode::CramRead),
            _ => None,
        }
    }

    pub fn target(self) -> Target {
        match self {
            AccessMode::VramRead | AccessMode::VramWrite => Target::Vram,
            AccessMode::CramRead | AccessMode::CramWrite => Target::Cram,
            AccessMode::VsramRead | AccessMode::VsramWrite => Target::Vsram,
        }
    }

    pub fn is_write(self) -> bool {
        matches!(
            self,
            AccessMode::VramWrite | AccessMode::CramWrite | AccessMode::VsramWrite
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLatch {
    /// CD5-CD0
    pub code: u8,
    /// A16-A0. Only the low 16 bits select VRAM; CRAM/VSRAM use the low 7.
    pub address: u32,
    /// First half written, waiting for the second.
    pub pending: bool,
}

impl CommandLatch {
    pub fn write_first(&mut self, value: u16) {
        self.code = (self.code & 0x3C) | ((value >> 14) & 0x03) as u8;
        self.address = (self.address & 0xC000) | u32::from(value & 0x3FFF);
        self.pending = true;
    }

    pub fn write_second(&mut self, value: u16) {
        self.code = (self.code & 0x03) | ((value >> 2) & 0x3C) as u8;
        self.address = (self.address & 0x3FFF) | (u32::from(value & 0x0003) << 14);
        self.pending = false;
    }

    /// The data port operation for the current code.
    ///
    /// Codes outside the six defined ones fall back to a VRAM read so a bad
    /// command can never scribble over video memory.
    pub fn mode(&self) -> AccessMode {
        AccessMode::from_code(self.code).unwrap_or_else(|| {
            log::warn!(
                "Invalid VDP command code {:#04x}, treating as VRAM read",
                self.code
            );
            AccessMode::VramRead
        })
    }

    pub fn dma_requested(&self) -> bool {
        (self.code & CODE_DMA) != 0
    }

    /// Advance by the auto-increment, wrapping within `target`.
    pub fn advance(&mut self, increment: u8, target: Target) {
        self.address = self.address.wrapping_add(u32::from(increment)) & target.address_mask();
    }
}
