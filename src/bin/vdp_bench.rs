use genteel_vdp::vdp::{FrameBuffer, LineBuffer, NullInterrupts, RenderOps, Vdp};
use std::time::Instant;

fn main() {
    let mut vdp = Vdp::new();

    // Patterned VRAM so every tile and sprite entry is busy
    for (i, byte) in vdp.vram.iter_mut().enumerate() {
        *byte = (i % 256) as u8;
    }
    for (i, color) in vdp.cram.iter_mut().enumerate() {
        *color = (i as u16 * 0x0123) & 0x0EEE;
    }

    // Display on, H40, planes at 0xC000/0xE000, 64x64
    vdp.write_register(1, 0x44);
    vdp.write_register(2, 0x30);
    vdp.write_register(4, 0x07);
    vdp.write_register(5, 0x78);
    vdp.write_register(12, 0x81);
    vdp.write_register(13, 0x3F);
    vdp.write_register(16, 0x11);

    let iterations = 1000;

    let start = Instant::now();
    let mut buf = LineBuffer::new();
    for _ in 0..iterations {
        for line in 0..224 {
            vdp.render_line(line, &mut buf);
        }
    }
    let duration = start.elapsed();
    println!("Lines only: {} frames in {:?}", iterations, duration);
    println!("FPS: {:.1}", iterations as f64 / duration.as_secs_f64());

    let start = Instant::now();
    let mut frame = FrameBuffer::new();
    for _ in 0..iterations {
        vdp.run_frame(&mut frame, &mut NullInterrupts);
    }
    let duration = start.elapsed();
    println!("With frame buffer: {} frames in {:?}", iterations, duration);
    println!("FPS: {:.1}", iterations as f64 / duration.as_secs_f64());
}
