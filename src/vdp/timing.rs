//! Scanline driver, interrupts, status word and HV counter.

use super::constants::*;
use super::dma::DmaOps;
use super::render::{LineBuffer, Pixel, RenderOps};
use super::Vdp;
use crate::config::Region;
use serde::{Deserialize, Serialize};

/// Main CPU cycles in one scanline.
pub const CYCLES_PER_LINE: u16 = 488;
/// Line position (in main CPU cycles) where horizontal blanking starts.
pub const HBLANK_START: u16 = 416;

/// Receives each finished scanline.
///
/// `cram` is the colour table as it stood when the line was drawn, so a
/// consumer can resolve [`Pixel`] indices even when CRAM changes mid-frame.
pub trait VideoSink {
    fn scanline(&mut self, line: u16, pixels: &[Pixel], cram: &[u16]);
}

pub trait InterruptSink {
    /// Level 4: horizontal (line counter) interrupt.
    fn line_interrupt(&mut self);
    /// Level 6: vertical blank interrupt.
    fn frame_interrupt(&mut self);
    /// The sound CPU's interrupt, raised at the start of every vertical blank.
    fn sound_interrupt(&mut self) {}
}

/// Discards every interrupt.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInterrupts;

impl InterruptSink for NullInterrupts {
    fn line_interrupt(&mut self) {}
    fn frame_interrupt(&mut self) {}
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Timing {
    pub region: Region,
    /// Scanline about to be processed.
    pub line: u16,
    /// Position in the current line, in main CPU cycles.
    pub h_counter: u16,
    pub hint_counter: u8,
    pub odd_frame: bool,
    pub vint_pending: bool,
    pub sprite_overflow: bool,
    pub sprite_collision: bool,
    pub frame: u64,
}

impl Vdp {
    pub fn lines_per_frame(&self) -> u16 {
        match self.timing.region {
            Region::Ntsc => LINES_NTSC,
            Region::Pal => LINES_PAL,
        }
    }

    /// Active display lines. V30 is only honoured on PAL.
    pub fn active_height(&self) -> u16 {
        if self.regs().v30 && self.is_pal() {
            240
        } else {
            224
        }
    }

    pub fn in_vblank(&self) -> bool {
        self.timing.line >= self.active_height()
    }

    pub fn in_hblank(&self) -> bool {
        self.timing.h_counter >= HBLANK_START
    }

    pub fn set_h_counter(&mut self, cycles: u16) {
        self.timing.h_counter = cycles;
    }

    /// Process the current scanline and advance to the next.
    ///
    /// Active lines are drawn and handed to `video`. The line counter is
    /// decremented on every active line and reloaded everywhere else; the
    /// first blank line raises the frame and sound interrupts.
    pub fn run_scanline(&mut self, video: &mut dyn VideoSink, irq: &mut dyn InterruptSink) {
        let line = self.timing.line;
        let active = self.active_height();

        if line < active {
            let mut buf = LineBuffer::new();
            let status = self.render_line(line, &mut buf);
            self.timing.sprite_overflow |= status.overflow;
            self.timing.sprite_collision |= status.collision;
            video.scanline(line, buf.pixels(), &self.cram);
        }

        if line <= active {
            if self.timing.hint_counter == 0 {
                self.timing.hint_counter = self.regs().hint_reload;
                if self.regs().hint_enabled {
                    irq.line_interrupt();
                }
            } else {
                self.timing.hint_counter -= 1;
            }
        } else {
            self.timing.hint_counter = self.regs().hint_reload;
        }

        if line == active {
            self.timing.vint_pending = true;
            if self.regs().vint_enabled {
                irq.frame_interrupt();
            }
            irq.sound_interrupt();
        }

        self.timing.h_counter = 0;
        self.timing.line += 1;
        if self.timing.line >= self.lines_per_frame() {
            self.timing.line = 0;
            self.timing.frame += 1;
            self.timing.odd_frame = !self.timing.odd_frame;
        }
    }

    /// Run scanlines until the start of the next frame.
    pub fn run_frame(&mut self, video: &mut dyn VideoSink, irq: &mut dyn InterruptSink) {
        loop {
            self.run_scanline(video, irq);
            if self.timing.line == 0 {
                break;
            }
        }
    }

    /// Draw every active line of the current state without advancing time.
    pub fn render_frame(&self, video: &mut dyn VideoSink) {
        let mut buf = LineBuffer::new();
        for line in 0..self.active_height() {
            self.render_line(line, &mut buf);
            video.scanline(line, buf.pixels(), &self.cram);
        }
    }

    /// Status word without side effects.
    pub fn status(&self) -> u16 {
        let t = &self.timing;
        let mut status = STATUS_FIXED | STATUS_FIFO_EMPTY;
        if t.vint_pending {
            status |= STATUS_VINT_PENDING;
        }
        if t.sprite_overflow {
            status |= STATUS_SPRITE_OVERFLOW;
        }
        if t.sprite_collision {
            status |= STATUS_SPRITE_COLLISION;
        }
        if t.odd_frame {
            status |= STATUS_ODD_FRAME;
        }
        // Blanked display reads as permanent vblank
        if self.in_vblank() || !self.regs().display_enabled {
            status |= STATUS_VBLANK;
        }
        if self.in_hblank() {
            status |= STATUS_HBLANK;
        }
        if self.is_dma_busy() {
            status |= STATUS_DMA_BUSY;
        }
        if self.is_pal() {
            status |= STATUS_PAL;
        }
        status
    }

    /// Control port read. Clears the command latch and the sticky flags.
    pub fn read_control(&mut self) -> u16 {
        let status = self.status();
        self.command.pending = false;
        self.timing.vint_pending = false;
        self.timing.sprite_overflow = false;
        self.timing.sprite_collision = false;
        status
    }

    /// V counter in the high byte, H counter in the low byte.
    pub fn read_hv_counter(&self) -> u16 {
        let line = self.timing.line;
        let v = match self.timing.region {
            Region::Ntsc if line > 0xEA => line - 6,
            Region::Pal if line > 0x102 => line + 0xC7,
            _ => line,
        };
        let h = (self.timing.h_counter >> 1) & 0xFF;
        ((v & 0xFF) << 8) | h
    }
}
