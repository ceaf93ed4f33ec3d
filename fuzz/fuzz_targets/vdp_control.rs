#![no_main]
use genteel_vdp::vdp::Vdp;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut vdp = Vdp::new();
    // DMA sources read back their own address
    let mut mem = |addr: u32| addr as u16;

    // Each pair of bytes is a control port write
    for chunk in data.chunks(2) {
        let value = if chunk.len() == 2 {
            u16::from_be_bytes([chunk[0], chunk[1]])
        } else {
            chunk[0] as u16
        };
        vdp.write_control(value, &mut mem);
    }

    let _ = vdp.read_control();
    let _ = vdp.read_hv_counter();
});
