//! Decoded view of the VDP register file.
//!
//! The raw register bytes pack several unrelated settings each. Rather than
//! re-masking them on every access, the VDP rebuilds a [`VdpRegisters`] value
//! each time a register is written and the renderer, DMA engine and timing
//! driver read the named fields.

use super::constants::*;
use serde::Serialize;

/// Horizontal scroll table granularity (register 11, bits 1-0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum HScrollMode {
    /// One entry for the whole screen.
    #[default]
    Full,
    /// One entry per 8-line tile row.
    Cell,
    /// One entry per scanline.
    Line,
}

/// Vertical scroll granularity (register 11, bit 2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum VScrollMode {
    #[default]
    Full,
    /// One VSRAM entry per pair of tile columns.
    TwoColumn,
}

/// Operation selected by register 23 bits 7-6.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum DmaMode {
    /// 68k memory to VRAM/CRAM/VSRAM.
    #[default]
    Transfer,
    Fill,
    Copy,
}

/// Window rectangle, in tile columns and scanlines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WindowPosition {
    /// Column boundary in tiles (register 17 counts in units of 2 cells).
    pub h_split: u16,
    /// Window lies right of `h_split` instead of left of it.
    pub right: bool,
    /// Line boundary in pixels (register 18 counts in units of 8 lines).
    pub v_split: u16,
    /// Window lies below `v_split` instead of above it.
    pub down: bool,
}

impl WindowPosition {
    fn decode(h: u8, v: u8) -> Self {
        Self {
            h_split: u16::from(h & WINDOW_POS_MASK) * 2,
            right: (h & WINDOW_RIGHT) != 0,
            v_split: u16::from(v & WINDOW_POS_MASK) * 8,
            down: (v & WINDOW_DOWN) != 0,
        }
    }

    /// Whether the window replaces plane A at tile column `column` on `line`.
    ///
    /// The window covers every line inside its vertical band and every
    /// column inside its horizontal band.
    pub fn covers(&self, column: u16, line: u16) -> bool {
        let in_v = if self.down {
            line >= self.v_split
        } else {
            line < self.v_split
        };
        let in_h = if self.right {
            column >= self.h_split
        } else {
            column < self.h_split
        };
        in_v || in_h
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VdpRegisters {
    // Mode 1
    pub hint_enabled: bool,
    pub blank_left_column: bool,
    // Mode 2
    pub display_enabled: bool,
    pub vint_enabled: bool,
    pub dma_enabled: bool,
    pub v30: bool,
    // Mode 4
    pub h40: bool,
    pub shadow_highlight: bool,

    pub plane_a_base: usize,
    pub window_base: usize,
    pub plane_b_base: usize,
    pub sprite_table_base: usize,
    pub hscroll_base: usize,

    /// Palette index (palette line << 4 | colour) of the backdrop.
    pub backdrop: u8,
    pub hint_reload: u8,
    pub hscroll_mode: HScrollMode,
    pub vscroll_mode: VScrollMode,
    /// Scroll plane size in tiles.
    pub plane_width: usize,
    pub plane_height: usize,
    pub window: WindowPosition,
    pub auto_increment: u8,

    /// Raw length from registers 19-20. Zero means 65536.
    pub dma_length: u32,
    pub dma_mode: DmaMode,
    /// Source byte address for 68k transfers (registers 21-23, shifted left once).
    pub dma_transfer_source: u32,
    /// Source byte address for VRAM copies (registers 21-22).
    pub dma_copy_source: u16,
}

impl VdpRegisters {
    pub fn decode(raw: &[u8; NUM_REGISTERS]) -> Self {
        let mode1 = raw[REG_MODE1];
        let mode2 = raw[REG_MODE2];
        let mode3 = raw[REG_MODE3];
        let mode4 = raw[REG_MODE4];
        let h40 = (mode4 & MODE4_H40_MODE) != 0;

        let (plane_width, plane_height) = plane_size(raw[REG_PLANE_SIZE]);

        // Bit 0 of the sprite table and bit 1 of the window base are ignored in H40.
        let (sprite_mask, window_mask) = if h40 { (0x7E, 0x3C) } else { (0x7F, 0x3E) };

        let hscroll_mode = match mode3 & MODE3_HSCROLL_MASK {
            0x00 => HScrollMode::Full,
            0x02 => HScrollMode::Cell,
            _ => HScrollMode::Line,
        };
        let vscroll_mode = if (mode3 & MODE3_VSCROLL_COLUMN) != 0 {
            VScrollMode::TwoColumn
        } else {
            VScrollMode::Full
        };

        let dma_mode = match raw[REG_DMA_SRC_HI] & DMA_MODE_MASK {
            DMA_MODE_FILL => DmaMode::Fill,
            DMA_MODE_COPY => DmaMode::Copy,
            _ => DmaMode::Transfer,
        };

        let src_lo = u32::from(raw[REG_DMA_SRC_LO]);
        let src_mid = u32::from(raw[REG_DMA_SRC_MID]);
        let src_hi = u32::from(raw[REG_DMA_SRC_HI] & 0x7F);

        Self {
            hint_enabled: (mode1 & MODE1_HINT_ENABLE) != 0,
            blank_left_column: (mode1 & MODE1_BLANK_LEFT) != 0,
            display_enabled: (mode2 & MODE2_DISPLAY_ENABLE) != 0,
            vint_enabled: (mode2 & MODE2_VINT_ENABLE) != 0,
            dma_enabled: (mode2 & MODE2_DMA_ENABLE) != 0,
            v30: (mode2 & MODE2_V30_MODE) != 0,
            h40,
            shadow_highlight: (mode4 & MODE4_SHADOW_HIGHLIGHT) != 0,
            // Bits 3-5 specify bits 13-15 of VRAM address
            plane_a_base: (usize::from(raw[REG_PLANE_A]) & 0x38) << 10,
            window_base: (usize::from(raw[REG_WINDOW]) & window_mask) << 10,
            // Bits 0-2 specify bits 13-15 of VRAM address
            plane_b_base: (usize::from(raw[REG_PLANE_B]) & 0x07) << 13,
            sprite_table_base: (usize::from(raw[REG_SPRITE_TABLE]) & sprite_mask) << 9,
            hscroll_base: (usize::from(raw[REG_HSCROLL]) & 0x3F) << 10,
            backdrop: raw[REG_BG_COLOR] & 0x3F,
            hint_reload: raw[REG_HINT_COUNTER],
            hscroll_mode,
            vscroll_mode,
            plane_width,
            plane_height,
            window: WindowPosition::decode(raw[REG_WINDOW_H], raw[REG_WINDOW_V]),
            auto_increment: raw[REG_AUTO_INC],
            dma_length: (u32::from(raw[REG_DMA_LEN_HI]) << 8) | u32::from(raw[REG_DMA_LEN_LO]),
            dma_mode,
            dma_transfer_source: (src_hi << 17) | (src_mid << 9) | (src_lo << 1),
            dma_copy_source: ((src_mid as u16) << 8) | (src_lo as u16),
        }
    }

    pub fn screen_width(&self) -> usize {
        if self.h40 {
            320
        } else {
            256
        }
    }

    /// Width of the window name table in tiles.
    pub fn window_width(&self) -> usize {
        if self.h40 {
            64
        } else {
            32
        }
    }
}

/// Decode register 16 into (width, height) in tiles.
///
/// The invalid size code `10` reads as 64. Name tables are limited to 4096
/// cells, so the height shrinks when the width would push past that.
fn plane_size(reg: u8) -> (usize, usize) {
    let decode = |bits: u8| match bits & 0x03 {
        0 => 32,
        3 => 128,
        _ => 64,
    };
    let width = decode(reg);
    let height = decode(reg >> 4);
    let height = height.min(4096 / width);
    (width, height)
}
