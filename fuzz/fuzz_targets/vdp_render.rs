#![no_main]
use genteel_vdp::vdp::{LineBuffer, RenderOps, Vdp};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 1024 {
        return;
    }

    let mut vdp = Vdp::new();

    // Registers from the head of the input, with the display forced on
    for (reg, &value) in data[..24].iter().enumerate() {
        vdp.write_register(reg, value);
    }
    vdp.write_register(1, data[1] | 0x40);
    vdp.sprite_limits = data[24] & 1 == 0;

    for (i, word) in vdp.vsram.iter_mut().enumerate() {
        *word = u16::from_be_bytes([data[32 + i * 2], data[33 + i * 2]]) & 0x07FF;
    }

    let vram_len = data.len().min(0x10000);
    vdp.vram[..vram_len].copy_from_slice(&data[..vram_len]);

    let mut buf = LineBuffer::new();
    for line in 0..vdp.active_height() {
        vdp.render_line(line, &mut buf);
    }
});
