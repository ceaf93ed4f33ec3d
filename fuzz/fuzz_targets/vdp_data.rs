#![no_main]
use genteel_vdp::vdp::Vdp;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let mut vdp = Vdp::new();
    let mut mem = |_addr: u32| 0xA5A5u16;

    // DMA enable and an arbitrary auto-increment, fill length and mode
    vdp.write_register(1, 0x14);
    vdp.write_register(15, data[0]);
    vdp.write_register(19, data[1]);
    vdp.write_register(23, data[2] & 0xC0);

    vdp.write_control(u16::from_be_bytes([data[4], data[5]]), &mut mem);
    vdp.write_control(u16::from_be_bytes([data[6], data[7]]), &mut mem);

    for chunk in data[8..].chunks(2) {
        let value = if chunk.len() == 2 {
            u16::from_be_bytes([chunk[0], chunk[1]])
        } else {
            chunk[0] as u16
        };
        if value & 1 == 0 || data[3] & 1 == 0 {
            vdp.write_data(value);
        } else {
            let _ = vdp.read_data();
        }
    }
});
