//! Sprite attribute table walk and sprite compositing.
//!
//! Each table entry is 8 bytes:
//!
//! ```text
//! 0-1  ------yy yyyyyyyy   y position + 128
//! 2    ----hhvv            size in tiles - 1
//! 3    -lllllll            link to next entry
//! 4-5  pccvhttt tttttttt   priority, palette, flips, tile
//! 6-7  -------x xxxxxxxx   x position + 128
//! ```

use super::constants::*;
use super::render::{tile_pixel, LineBuffer, Pixel};
use super::Vdp;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteAttributes {
    /// Top edge in screen lines.
    pub y: i32,
    /// Left edge in screen pixels.
    pub x: i32,
    /// Unadjusted x field. Zero masks the rest of the line.
    pub raw_x: u16,
    pub h_size: u8, // tiles
    pub v_size: u8, // tiles
    pub link: u8,
    pub priority: bool,
    pub palette: u8,
    pub v_flip: bool,
    pub h_flip: bool,
    pub base_tile: u16,
}

impl SpriteAttributes {
    pub fn from_bytes(data: [u8; 8]) -> Self {
        let raw_y = u16::from_be_bytes([data[0], data[1]]) & 0x01FF;
        let size = data[2];
        let attr = u16::from_be_bytes([data[4], data[5]]);
        let raw_x = u16::from_be_bytes([data[6], data[7]]) & 0x01FF;

        Self {
            y: i32::from(raw_y) - 128,
            x: i32::from(raw_x) - 128,
            raw_x,
            h_size: ((size >> 2) & 0x03) + 1,
            v_size: (size & 0x03) + 1,
            link: data[3] & 0x7F,
            priority: (attr & 0x8000) != 0,
            palette: ((attr >> 13) & 0x03) as u8,
            v_flip: (attr & 0x1000) != 0,
            h_flip: (attr & 0x0800) != 0,
            base_tile: attr & 0x07FF,
        }
    }

    pub fn height(&self) -> i32 {
        i32::from(self.v_size) * 8
    }

    pub fn width(&self) -> usize {
        usize::from(self.h_size) * 8
    }

    pub fn covers_line(&self, line: u16) -> bool {
        let line = i32::from(line);
        line >= self.y && line < self.y + self.height()
    }

    /// Decode the sprite's pixels on `line` into `out`, left to right.
    ///
    /// Tiles are stored column-major: the tile below `n` is `n + 1`, the
    /// tile to its right is `n + v_size`. Returns the row width in pixels.
    pub fn rasterize_row(&self, vram: &[u8], line: u16, out: &mut [u8; 32]) -> usize {
        let mut py = i32::from(line) - self.y;
        if self.v_flip {
            py = self.height() - 1 - py;
        }
        let tile_row = (py >> 3) as u16;
        let pixel_v = (py & 7) as usize;

        for tx in 0..u16::from(self.h_size) {
            let src_col = if self.h_flip {
                u16::from(self.h_size) - 1 - tx
            } else {
                tx
            };
            let tile = self
                .base_tile
                .wrapping_add(src_col * u16::from(self.v_size))
                .wrapping_add(tile_row)
                & 0x07FF;
            let addr = usize::from(tile) * 32 + pixel_v * 4;
            let row = [
                vram[addr & 0xFFFF],
                vram[(addr + 1) & 0xFFFF],
                vram[(addr + 2) & 0xFFFF],
                vram[(addr + 3) & 0xFFFF],
            ];
            for px in 0..8 {
                let col = if self.h_flip { 7 - px } else { px };
                out[usize::from(tx) * 8 + px] = tile_pixel(row, col);
            }
        }
        self.width()
    }
}

/// Follows the link chain from entry 0.
///
/// Stops after the entry whose link is 0, or after [`SPRITE_LINK_LIMIT`]
/// entries so a cyclic chain cannot run forever.
pub struct SpriteIterator<'a> {
    vram: &'a [u8],
    sat_base: usize,
    next_idx: u8,
    steps: usize,
    done: bool,
}

impl<'a> SpriteIterator<'a> {
    pub fn new(vram: &'a [u8], sat_base: usize) -> Self {
        Self {
            vram,
            sat_base,
            next_idx: 0,
            steps: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for SpriteIterator<'a> {
    type Item = SpriteAttributes;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.steps >= SPRITE_LINK_LIMIT {
            return None;
        }

        let addr = self.sat_base + usize::from(self.next_idx) * 8;
        let mut data = [0u8; 8];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = self.vram[(addr + i) & 0xFFFF];
        }
        let attr = SpriteAttributes::from_bytes(data);

        self.steps += 1;
        self.next_idx = attr.link;
        if attr.link == 0 {
            self.done = true;
        }
        Some(attr)
    }
}

/// Flags raised while drawing a line's sprites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteLineStatus {
    pub overflow: bool,
    pub collision: bool,
}

impl Vdp {
    fn sprites_per_line(&self) -> usize {
        if self.regs().h40 {
            20
        } else {
            16
        }
    }

    /// Draw the sprites of one priority class onto `buf`.
    ///
    /// Every pass walks the whole list so that overlap is always decided by
    /// list order: the first opaque sprite pixel at a position claims it,
    /// whatever its priority, and later sprites never draw there.
    pub fn render_sprites(&self, line: u16, high: bool, buf: &mut LineBuffer) -> SpriteLineStatus {
        let regs = self.regs();
        let width = buf.width();
        let limit = self.sprites_per_line();
        let mut status = SpriteLineStatus::default();
        let mut claimed = [false; MAX_WIDTH];
        let mut row = [0u8; 32];
        let mut on_line = 0;

        for sprite in SpriteIterator::new(&self.vram, regs.sprite_table_base) {
            if !sprite.covers_line(line) {
                continue;
            }
            if sprite.raw_x == 0 {
                break;
            }
            on_line += 1;
            if self.sprite_limits && on_line > limit {
                status.overflow = true;
                break;
            }

            let w = sprite.rasterize_row(&self.vram, line, &mut row);
            let palette = sprite.palette << 4;

            for (i, &color) in row[..w].iter().enumerate() {
                let sx = sprite.x + i as i32;
                if color == 0 || sx < 0 || sx as usize >= width {
                    continue;
                }
                let sx = sx as usize;
                if claimed[sx] {
                    status.collision = true;
                    continue;
                }
                claimed[sx] = true;

                if sprite.priority != high || (!high && buf.has_priority(sx)) {
                    continue;
                }

                let index = palette | color;
                let pixel = if !regs.shadow_highlight {
                    Pixel::new(index)
                } else {
                    match index {
                        0x3E => buf.pixel(sx).brighten(),
                        0x3F => buf.pixel(sx).darken(),
                        _ if high => Pixel::new(index),
                        // Colour 14 of palettes 0-2 is never shadowed
                        _ if index & 0x0F == 0x0E => Pixel::new(index),
                        _ => Pixel::new(index).shadowed(),
                    }
                };
                buf.set_pixel(sx, pixel);
            }
        }
        status
    }
}
