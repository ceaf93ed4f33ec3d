#![no_main]
use genteel_vdp::memory::{Bus, MemoryInterface, Z80Bus};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|ops: Vec<(u8, u32, u32)>| {
    let mut bus = Bus::new();
    bus.load_rom(&[0; 4096]);

    for (op_type, addr, val) in ops {
        // 24-bit main CPU space, 16-bit sound CPU space
        let addr = addr & 0xFF_FFFF;

        match op_type % 8 {
            0 => {
                bus.read_byte(addr);
            }
            1 => bus.write_byte(addr, val as u8),
            2 => {
                bus.read_word(addr);
            }
            3 => bus.write_word(addr, val as u16),
            4 => {
                bus.read_long(addr);
            }
            5 => bus.write_long(addr, val),
            6 => {
                Z80Bus::new(&mut bus).read_byte(addr & 0xFFFF);
            }
            7 => Z80Bus::new(&mut bus).write_byte(addr & 0xFFFF, val as u8),
            _ => unreachable!(),
        }
    }
});
