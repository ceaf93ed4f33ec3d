use super::{Bus, MemoryInterface, SoundSink};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct PsgLog(Rc<RefCell<Vec<u8>>>);

impl SoundSink for PsgLog {
    fn write_psg(&mut self, value: u8) {
        self.0.borrow_mut().push(value);
    }
    fn write_fm(&mut self, _port: u8, _value: u8) {}
}

fn set_vram_write(bus: &mut Bus, addr: u16) {
    bus.write_word(0xC00004, 0x4000 | (addr & 0x3FFF));
    bus.write_word(0xC00004, addr >> 14);
}

fn set_vram_read(bus: &mut Bus, addr: u16) {
    bus.write_word(0xC00004, addr & 0x3FFF);
    bus.write_word(0xC00004, addr >> 14);
}

#[test]
fn test_vdp_read_long_behavior() {
    let mut bus = Bus::new();
    bus.write_word(0xC00004, 0x8F02);
    set_vram_write(&mut bus, 0);

    bus.write_word(0xC00000, 0x1111);
    bus.write_word(0xC00000, 0x2222);
    bus.write_word(0xC00000, 0x3333);
    bus.write_word(0xC00000, 0x4444);

    set_vram_read(&mut bus, 0);
    let val = bus.read_long(0xC00000);
    assert_eq!(val, 0x11112222, "Expected 0x11112222, got {:08X}", val);
}

#[test]
fn test_vdp_write_long_behavior() {
    let mut bus = Bus::new();
    bus.write_word(0xC00004, 0x8F02);
    set_vram_write(&mut bus, 0);

    // Two data port writes: 0xAABB, 0xCCDD
    bus.write_long(0xC00000, 0xAABBCCDD);

    set_vram_read(&mut bus, 0);
    let w1 = bus.read_word(0xC00000);
    let w2 = bus.read_word(0xC00000);
    assert_eq!(w1, 0xAABB, "Expected first word 0xAABB, got {:04X}", w1);
    assert_eq!(w2, 0xCCDD, "Expected second word 0xCCDD, got {:04X}", w2);
}

#[test]
fn test_vdp_unaligned_read_long() {
    let mut bus = Bus::new();
    bus.write_word(0xC00004, 0x8F02);
    set_vram_write(&mut bus, 0);
    bus.write_word(0xC00000, 0x1111);
    bus.write_word(0xC00000, 0x2222);
    set_vram_read(&mut bus, 0);

    // 0xC00002 is the data port, 0xC00004 the control port
    let val = bus.read_long(0xC00002);
    assert_eq!((val >> 16) as u16, 0x1111, "High word should be VDP data");
    assert_eq!((val & 0xFF00) as u16, 0x3600, "Low word should be status");

    let val2 = bus.read_word(0xC00000);
    assert_eq!(val2, 0x2222, "Subsequent data read should be 0x2222");
}

#[test]
fn test_vdp_mirror_decodes() {
    let mut bus = Bus::new();
    // 0xC10004: bit 16 set, not a valid mirror
    bus.write_word(0xC10004, 0x8F02);
    assert_eq!(bus.vdp.auto_increment(), 0);

    // 0xC80004: bit 19 may vary
    bus.write_word(0xC80004, 0x8F02);
    assert_eq!(bus.vdp.auto_increment(), 2);
    assert_eq!(bus.read_word(0xC10000), 0xFFFF);
}

#[test]
fn test_byte_write_duplicates_into_both_halves() {
    let mut bus = Bus::new();
    bus.write_word(0xC00004, 0x8F02);
    set_vram_write(&mut bus, 0x0100);
    bus.write_byte(0xC00001, 0x5A);

    assert_eq!(bus.vdp.vram[0x100], 0x5A);
    assert_eq!(bus.vdp.vram[0x101], 0x5A);
}

#[test]
fn test_status_byte_reads() {
    let mut bus = Bus::new();
    let status = bus.vdp.status();
    assert_eq!(bus.read_byte(0xC00004), (status >> 8) as u8);
    assert_eq!(bus.read_byte(0xC00005), status as u8);
}

#[test]
fn test_psg_port() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut bus = Bus::new();
    bus.set_sound(Box::new(PsgLog(log.clone())));

    bus.write_byte(0xC00011, 0x9F);
    bus.write_word(0xC00010, 0x00BF);
    assert_eq!(*log.borrow(), vec![0x9F, 0xBF]);
    assert_eq!(bus.read_word(0xC00010), 0);
}

#[test]
fn test_reserved_and_hv_writes_are_ignored() {
    let mut bus = Bus::new();
    bus.write_word(0xC00018, 0x1234);
    bus.write_word(0xC0001C, 0x1234);
    bus.write_word(0xC00008, 0x1234);
    assert_eq!(bus.vdp.registers, [0; 32]);
    assert!(!bus.vdp.is_control_pending());
}

#[test]
fn test_dma_transfer_from_work_ram() {
    let mut bus = Bus::new();
    for (i, word) in [0x1122u16, 0x3344, 0x5566].iter().enumerate() {
        bus.write_word(0xFF0000 + (i as u32) * 2, *word);
    }

    bus.write_word(0xC00004, 0x8114); // DMA enabled
    bus.write_word(0xC00004, 0x8F02);
    bus.write_word(0xC00004, 0x9303); // length 3
    bus.write_word(0xC00004, 0x9400);
    bus.write_word(0xC00004, 0x9500); // source 0xFF0000 >> 1 = 0x7F8000
    bus.write_word(0xC00004, 0x9680);
    bus.write_word(0xC00004, 0x977F);
    bus.write_word(0xC00004, 0x4000);
    bus.write_word(0xC00004, 0x0080); // VRAM 0, DMA

    assert_eq!(&bus.vdp.vram[0..6], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
}

#[test]
fn test_sound_ram_refused_without_bus() {
    let mut bus = Bus::new();
    bus.arbiter.release_reset();

    bus.write_byte(0xA00010, 0x42);
    assert_eq!(bus.z80_ram[0x10], 0);
    assert_eq!(bus.read_byte(0xA00010), 0xFF);

    bus.write_word(0xA11100, 0x0100);
    assert_eq!(bus.read_byte(0xA11100), 0x00, "bus granted");
    bus.write_byte(0xA00010, 0x42);
    assert_eq!(bus.read_byte(0xA00010), 0x42);
    assert_eq!(bus.read_byte(0xA02010), 0x42, "mirror");

    bus.write_word(0xA11100, 0x0000);
    assert_eq!(bus.read_byte(0xA11100), 0x01);
}

#[test]
fn test_word_write_to_sound_ram_keeps_high_byte() {
    let mut bus = Bus::new();
    bus.write_byte(0xA11100, 0x01);
    bus.write_word(0xA00020, 0xABCD);
    assert_eq!(bus.z80_ram[0x20], 0xAB);
    assert_eq!(bus.z80_ram[0x21], 0x00);
}
