use super::constants::*;
use super::render::Pixel;
use super::timing::VideoSink;

/// CRAM colours expanded to RGB888 for each shading level.
#[derive(Clone, Debug)]
pub struct Palette {
    normal: [[u8; 3]; CRAM_WORDS],
    shadow: [[u8; 3]; CRAM_WORDS],
    highlight: [[u8; 3]; CRAM_WORDS],
}

/// Expand a 3-bit channel to 8 bits. Shadow halves the level, highlight
/// adds half of full scale on top.
fn channel(level: u16, shade: Shade) -> u8 {
    let level = level & 0x07;
    let four_bit = match shade {
        Shade::Normal => level * 2,
        Shade::Shadow => level,
        Shade::Highlight => level + 7,
    };
    (four_bit * 17) as u8
}

#[derive(Clone, Copy)]
enum Shade {
    Normal,
    Shadow,
    Highlight,
}

/// `----BBB-GGG-RRR-` to RGB888.
pub fn genesis_color_to_rgb(color: u16) -> [u8; 3] {
    color_with_shade(color, Shade::Normal)
}

fn color_with_shade(color: u16, shade: Shade) -> [u8; 3] {
    [
        channel(color >> 1, shade),
        channel(color >> 5, shade),
        channel(color >> 9, shade),
    ]
}

impl Palette {
    pub fn from_cram(cram: &[u16]) -> Self {
        let mut palette = Self {
            normal: [[0; 3]; CRAM_WORDS],
            shadow: [[0; 3]; CRAM_WORDS],
            highlight: [[0; 3]; CRAM_WORDS],
        };
        for (i, &color) in cram.iter().take(CRAM_WORDS).enumerate() {
            palette.normal[i] = genesis_color_to_rgb(color);
            palette.shadow[i] = color_with_shade(color, Shade::Shadow);
            palette.highlight[i] = color_with_shade(color, Shade::Highlight);
        }
        palette
    }

    pub fn resolve(&self, pixel: Pixel) -> [u8; 3] {
        let idx = usize::from(pixel.index());
        if pixel.is_shadowed() {
            self.shadow[idx]
        } else if pixel.is_highlighted() {
            self.highlight[idx]
        } else {
            self.normal[idx]
        }
    }
}

/// RGB888 frame assembled from finished scanlines.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    rgb: Vec<u8>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            rgb: vec![0; MAX_WIDTH * 240 * 3],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels of the drawn area, row-major RGB.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height * 3);
        for y in 0..self.height {
            let start = y * MAX_WIDTH * 3;
            out.extend_from_slice(&self.rgb[start..start + self.width * 3]);
        }
        out
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * MAX_WIDTH + x) * 3;
        [self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]]
    }
}

impl VideoSink for FrameBuffer {
    fn scanline(&mut self, line: u16, pixels: &[Pixel], cram: &[u16]) {
        let y = usize::from(line);
        if y >= 240 {
            log::warn!("Scanline {} outside the frame buffer", line);
            return;
        }
        let palette = Palette::from_cram(cram);
        let row = &mut self.rgb[y * MAX_WIDTH * 3..(y + 1) * MAX_WIDTH * 3];
        for (x, &pixel) in pixels.iter().take(MAX_WIDTH).enumerate() {
            row[x * 3..x * 3 + 3].copy_from_slice(&palette.resolve(pixel));
        }
        self.width = pixels.len().min(MAX_WIDTH);
        self.height = self.height.max(y + 1);
    }
}
