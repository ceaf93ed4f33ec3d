// VDP Control Codes (bits 0-3 of the command code)
pub const VRAM_READ: u8 = 0x00;
pub const VRAM_WRITE: u8 = 0x01;
pub const CRAM_WRITE: u8 = 0x03;
pub const VSRAM_READ: u8 = 0x04;
pub const VSRAM_WRITE: u8 = 0x05;
pub const CRAM_READ: u8 = 0x08;

/// CD5 of the command code requests a DMA operation.
pub const CODE_DMA: u8 = 0x20;

// Register indices
pub const REG_MODE1: usize = 0;
pub const REG_MODE2: usize = 1;
pub const REG_PLANE_A: usize = 2;
pub const REG_WINDOW: usize = 3;
pub const REG_PLANE_B: usize = 4;
pub const REG_SPRITE_TABLE: usize = 5;
pub const REG_BG_COLOR: usize = 7;
pub const REG_HINT_COUNTER: usize = 10;
pub const REG_MODE3: usize = 11;
pub const REG_MODE4: usize = 12;
pub const REG_HSCROLL: usize = 13;
pub const REG_AUTO_INC: usize = 15;
pub const REG_PLANE_SIZE: usize = 16;
pub const REG_WINDOW_H: usize = 17;
pub const REG_WINDOW_V: usize = 18;
pub const REG_DMA_LEN_LO: usize = 19;
pub const REG_DMA_LEN_HI: usize = 20;
pub const REG_DMA_SRC_LO: usize = 21;
pub const REG_DMA_SRC_MID: usize = 22;
pub const REG_DMA_SRC_HI: usize = 23;

// Mode bits
pub const MODE1_HINT_ENABLE: u8 = 0x10;
pub const MODE1_BLANK_LEFT: u8 = 0x20;
pub const MODE2_V30_MODE: u8 = 0x08;
pub const MODE2_DMA_ENABLE: u8 = 0x10;
pub const MODE2_VINT_ENABLE: u8 = 0x20;
pub const MODE2_DISPLAY_ENABLE: u8 = 0x40;
pub const MODE3_VSCROLL_COLUMN: u8 = 0x04;
pub const MODE3_HSCROLL_MASK: u8 = 0x03;
pub const MODE4_H40_MODE: u8 = 0x81; // H40 mode check mask
pub const MODE4_SHADOW_HIGHLIGHT: u8 = 0x08;

// Window position registers
pub const WINDOW_RIGHT: u8 = 0x80;
pub const WINDOW_DOWN: u8 = 0x80;
pub const WINDOW_POS_MASK: u8 = 0x1F;

// DMA Modes (bits 7-6 of register 23)
pub const DMA_MODE_MASK: u8 = 0xC0;
pub const DMA_MODE_FILL: u8 = 0x80;
pub const DMA_MODE_COPY: u8 = 0xC0;

/// Word returned for DMA reads from outside the ROM and work RAM windows.
pub const DMA_BAD_SOURCE: u16 = 0x0088;

// Status bits
pub const STATUS_FIXED: u16 = 0x3400;
pub const STATUS_FIFO_EMPTY: u16 = 0x0200;
pub const STATUS_FIFO_FULL: u16 = 0x0100;
pub const STATUS_VINT_PENDING: u16 = 0x0080;
pub const STATUS_SPRITE_OVERFLOW: u16 = 0x0040;
pub const STATUS_SPRITE_COLLISION: u16 = 0x0020;
pub const STATUS_ODD_FRAME: u16 = 0x0010;
pub const STATUS_VBLANK: u16 = 0x0008;
pub const STATUS_HBLANK: u16 = 0x0004;
pub const STATUS_DMA_BUSY: u16 = 0x0002;
pub const STATUS_PAL: u16 = 0x0001;

pub const NUM_REGISTERS: usize = 32;

// Memory sizes
pub const VRAM_SIZE: usize = 0x10000;
/// CRAM and VSRAM are both addressed with a 7-bit byte address (64 words).
pub const CRAM_WORDS: usize = 64;
pub const VSRAM_WORDS: usize = 64;
pub const SMALL_RAM_ADDR_MASK: u32 = 0x7F;

// Display geometry
pub const MAX_WIDTH: usize = 320;
pub const SPRITE_LINK_LIMIT: usize = 80;
pub const LINES_NTSC: u16 = 262;
pub const LINES_PAL: u16 = 313;
