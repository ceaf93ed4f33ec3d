use super::constants::*;
use super::registers::{HScrollMode, VScrollMode};
use super::sprites::SpriteLineStatus;
use super::Vdp;

/// One composed output pixel.
///
/// Bits 0-5 hold the CRAM index (palette line << 4 | colour), bit 6 marks a
/// shadowed pixel and bit 7 a highlighted one. Resolving the index to RGB is
/// left to whoever consumes the scanline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel(pub u8);

impl Pixel {
    pub const SHADOW: u8 = 0x40;
    pub const HIGHLIGHT: u8 = 0x80;

    pub fn new(index: u8) -> Self {
        Pixel(index & 0x3F)
    }

    pub fn index(self) -> u8 {
        self.0 & 0x3F
    }

    pub fn is_shadowed(self) -> bool {
        self.0 & Self::SHADOW != 0
    }

    pub fn is_highlighted(self) -> bool {
        self.0 & Self::HIGHLIGHT != 0
    }

    pub fn shadowed(self) -> Self {
        Pixel(self.index() | Self::SHADOW)
    }

    pub fn highlighted(self) -> Self {
        Pixel(self.index() | Self::HIGHLIGHT)
    }

    pub fn normal(self) -> Self {
        Pixel(self.index())
    }

    /// Highlight operator. Cancels an existing shadow.
    pub fn brighten(self) -> Self {
        if self.is_shadowed() {
            self.normal()
        } else {
            self.highlighted()
        }
    }

    /// Shadow operator. Cancels an existing highlight.
    pub fn darken(self) -> Self {
        if self.is_highlighted() {
            self.normal()
        } else {
            self.shadowed()
        }
    }
}

/// Working buffer for a single scanline.
///
/// Alongside the colour, each position remembers whether a high-priority
/// plane pixel was drawn there (low-priority sprites stay behind it) and
/// whether any high-priority tile covered it, transparent or not (such
/// positions escape the default shadow).
#[derive(Clone, Debug)]
pub struct LineBuffer {
    pixels: [Pixel; MAX_WIDTH],
    priority: [bool; MAX_WIDTH],
    high_tile: [bool; MAX_WIDTH],
    width: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            pixels: [Pixel::default(); MAX_WIDTH],
            priority: [false; MAX_WIDTH],
            high_tile: [false; MAX_WIDTH],
            width: MAX_WIDTH,
        }
    }

    pub fn reset(&mut self, width: usize, backdrop: u8) {
        self.width = width.min(MAX_WIDTH);
        self.pixels.fill(Pixel::new(backdrop));
        self.priority.fill(false);
        self.high_tile.fill(false);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels[..self.width]
    }

    pub fn pixel(&self, x: usize) -> Pixel {
        self.pixels[x]
    }

    pub fn set_pixel(&mut self, x: usize, pixel: Pixel) {
        self.pixels[x] = pixel;
    }

    /// An opaque high-priority plane pixel sits at `x`.
    pub fn has_priority(&self, x: usize) -> bool {
        self.priority[x]
    }

    fn put_plane_pixel(&mut self, x: usize, index: u8, high: bool) {
        self.pixels[x] = Pixel::new(index);
        self.priority[x] = high;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    A,
    B,
}

impl Plane {
    /// Offset into the H scroll entry and the VSRAM pair.
    fn index(self) -> usize {
        match self {
            Plane::A => 0,
            Plane::B => 1,
        }
    }
}

/// A decoded name table entry.
///
/// ```text
/// 15  14 13  12  11  10..0
/// pri  pal  vf  hf   tile
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileEntry {
    pub priority: bool,
    pub palette: u8,
    pub v_flip: bool,
    pub h_flip: bool,
    pub tile: u16,
}

impl TileEntry {
    pub fn from_word(word: u16) -> Self {
        Self {
            priority: (word & 0x8000) != 0,
            palette: ((word >> 13) & 0x03) as u8,
            v_flip: (word & 0x1000) != 0,
            h_flip: (word & 0x0800) != 0,
            tile: word & 0x07FF,
        }
    }
}

/// Colour nibble `col` (0-7) of a packed 4bpp tile row.
#[inline]
pub(crate) fn tile_pixel(row: [u8; 4], col: usize) -> u8 {
    let byte = row[col >> 1];
    if col & 1 == 0 {
        byte >> 4
    } else {
        byte & 0x0F
    }
}

pub trait RenderOps {
    /// Compose scanline `line` into `buf`. Returns the sprite flags raised.
    fn render_line(&self, line: u16, buf: &mut LineBuffer) -> SpriteLineStatus;
    fn render_plane(&self, plane: Plane, line: u16, high: bool, buf: &mut LineBuffer);
    fn hscroll(&self, plane: Plane, line: u16) -> u16;
    fn vscroll(&self, plane: Plane, screen_x: u16) -> u16;
    fn fetch_nametable_entry(&self, base: usize, row: usize, col: usize, width: usize) -> TileEntry;
    fn fetch_tile_row(&self, tile: u16, row: u16, v_flip: bool) -> [u8; 4];
    fn apply_shadow_highlight(&self, buf: &mut LineBuffer);
}

impl Vdp {
    /// Draw `count` pixels of one tile row starting at tile column `pixel_h`.
    #[allow(clippy::too_many_arguments)]
    fn draw_tile_run(
        &self,
        entry: TileEntry,
        pixel_v: u16,
        pixel_h: u16,
        count: u16,
        screen_x: u16,
        high: bool,
        buf: &mut LineBuffer,
    ) {
        if entry.priority != high {
            return;
        }
        let row = self.fetch_tile_row(entry.tile, pixel_v, entry.v_flip);
        let palette = entry.palette << 4;

        for i in 0..count {
            let x = (screen_x + i) as usize;
            let col = pixel_h + i;
            let col = if entry.h_flip { 7 - col } else { col };
            if high {
                buf.high_tile[x] = true;
            }
            let color = tile_pixel(row, col as usize);
            if color != 0 {
                buf.put_plane_pixel(x, palette | color, high);
            }
        }
    }
}

impl RenderOps for Vdp {
    fn render_line(&self, line: u16, buf: &mut LineBuffer) -> SpriteLineStatus {
        let regs = self.regs();
        buf.reset(regs.screen_width(), regs.backdrop);
        if !regs.display_enabled {
            return SpriteLineStatus::default();
        }

        self.render_plane(Plane::B, line, false, buf);
        self.render_plane(Plane::A, line, false, buf);
        self.render_plane(Plane::B, line, true, buf);
        self.render_plane(Plane::A, line, true, buf);

        if regs.shadow_highlight {
            self.apply_shadow_highlight(buf);
        }

        let low = self.render_sprites(line, false, buf);
        let high = self.render_sprites(line, true, buf);

        if regs.blank_left_column {
            let backdrop = Pixel::new(regs.backdrop);
            for x in 0..8 {
                buf.set_pixel(x, backdrop);
            }
        }

        SpriteLineStatus {
            overflow: low.overflow || high.overflow,
            collision: low.collision || high.collision,
        }
    }

    fn render_plane(&self, plane: Plane, line: u16, high: bool, buf: &mut LineBuffer) {
        let regs = self.regs();
        let width = buf.width() as u16;
        let base = match plane {
            Plane::A => regs.plane_a_base,
            Plane::B => regs.plane_b_base,
        };
        let plane_w = regs.plane_width;
        let w_mask = (plane_w * 8 - 1) as u16;
        let h_mask = (regs.plane_height * 8 - 1) as u16;
        let hscroll = self.hscroll(plane, line);

        let mut x: u16 = 0;
        while x < width {
            if plane == Plane::A && regs.window.covers(x >> 3, line) {
                // The window is never scrolled
                let entry = self.fetch_nametable_entry(
                    regs.window_base,
                    (line >> 3) as usize,
                    (x >> 3) as usize,
                    regs.window_width(),
                );
                let count = (8 - (x & 7)).min(width - x);
                self.draw_tile_run(entry, line & 7, x & 7, count, x, high, buf);
                x += count;
                continue;
            }

            let plane_y = line.wrapping_add(self.vscroll(plane, x)) & h_mask;
            let plane_x = x.wrapping_sub(hscroll) & w_mask;
            let pixel_h = plane_x & 7;

            // Runs stop at tile edges and at screen cell edges, which keeps
            // window and 16-pixel scroll column boundaries inside one run.
            let count = (8 - pixel_h).min(8 - (x & 7)).min(width - x);

            let entry = self.fetch_nametable_entry(
                base,
                (plane_y >> 3) as usize,
                (plane_x >> 3) as usize,
                plane_w,
            );
            self.draw_tile_run(entry, plane_y & 7, pixel_h, count, x, high, buf);
            x += count;
        }
    }

    fn hscroll(&self, plane: Plane, line: u16) -> u16 {
        let regs = self.regs();
        let offset = match regs.hscroll_mode {
            HScrollMode::Full => 0,
            HScrollMode::Cell => (usize::from(line) & !7) * 4,
            HScrollMode::Line => usize::from(line) * 4,
        };
        let addr = regs.hscroll_base + offset + plane.index() * 2;
        self.vram_word(addr) & 0x03FF
    }

    fn vscroll(&self, plane: Plane, screen_x: u16) -> u16 {
        let idx = match self.regs().vscroll_mode {
            VScrollMode::Full => plane.index(),
            VScrollMode::TwoColumn => (usize::from(screen_x) >> 4) * 2 + plane.index(),
        };
        self.vsram[idx % VSRAM_WORDS] & 0x03FF
    }

    fn fetch_nametable_entry(&self, base: usize, row: usize, col: usize, width: usize) -> TileEntry {
        let addr = base + (row * width + col) * 2;
        TileEntry::from_word(self.vram_word(addr))
    }

    fn fetch_tile_row(&self, tile: u16, row: u16, v_flip: bool) -> [u8; 4] {
        let row = if v_flip { 7 - row } else { row };
        let addr = (usize::from(tile) * 32 + usize::from(row) * 4) & 0xFFFF;
        [
            self.vram[addr],
            self.vram[(addr + 1) & 0xFFFF],
            self.vram[(addr + 2) & 0xFFFF],
            self.vram[(addr + 3) & 0xFFFF],
        ]
    }

    fn apply_shadow_highlight(&self, buf: &mut LineBuffer) {
        for x in 0..buf.width() {
            let pixel = buf.pixel(x);
            let shaded = match pixel.index() {
                0x3E => pixel.highlighted(),
                0x3F => pixel.shadowed(),
                _ if buf.high_tile[x] => pixel.normal(),
                _ => pixel.shadowed(),
            };
            buf.set_pixel(x, shaded);
        }
    }
}
