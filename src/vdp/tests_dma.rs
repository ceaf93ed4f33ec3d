use super::test_helpers::*;
use super::*;

/// Word at `addr` is `addr` itself, so every transferred word shows where it came from.
fn address_source(addr: u32) -> u16 {
    (addr & 0xFFFF) as u16
}

fn dma_vdp() -> Vdp {
    let mut vdp = Vdp::new();
    set_reg(&mut vdp, 1, 0x14); // DMA enable
    set_reg(&mut vdp, 15, 2);
    vdp
}

#[test]
fn test_transfer_to_vram() {
    let mut vdp = dma_vdp();
    // 4 words from 0x000200
    set_dma_regs(&mut vdp, 4, 0x00, 0x01, 0x00);
    set_dma_write(&mut vdp, Target::Vram, 0x1000, &mut address_source);

    assert_eq!(
        &vdp.vram[0x1000..0x1008],
        &[0x02, 0x00, 0x02, 0x02, 0x02, 0x04, 0x02, 0x06]
    );
    assert_eq!(vdp.command.address, 0x1008);
    assert!(!vdp.is_dma_busy());
}

#[test]
fn test_transfer_writes_back_registers() {
    let mut vdp = dma_vdp();
    set_dma_regs(&mut vdp, 3, 0x00, 0x01, 0x00);
    set_dma_write(&mut vdp, Target::Vram, 0, &mut address_source);

    assert_eq!(vdp.registers[REG_DMA_LEN_LO], 0);
    assert_eq!(vdp.registers[REG_DMA_LEN_HI], 0);
    // 0x200 + 3 words = 0x206 -> 0x103 in word units
    assert_eq!(vdp.registers[REG_DMA_SRC_LO], 0x03);
    assert_eq!(vdp.registers[REG_DMA_SRC_MID], 0x01);
    assert_eq!(vdp.regs().dma_transfer_source, 0x206);
}

#[test]
fn test_transfer_to_cram_and_vsram() {
    let mut vdp = dma_vdp();
    let mut rom = |addr: u32| 0x0E00 | (addr as u16 & 0xFF);

    set_dma_regs(&mut vdp, 2, 0x08, 0x00, 0x00); // source 0x10
    set_dma_write(&mut vdp, Target::Cram, 0x0004, &mut rom);
    // 0x0E10 and 0x0E12 with the unused colour bits dropped
    assert_eq!(vdp.cram[2], 0x0E00);
    assert_eq!(vdp.cram[3], 0x0E02);

    set_dma_regs(&mut vdp, 1, 0x08, 0x00, 0x00);
    set_dma_write(&mut vdp, Target::Vsram, 0x0000, &mut rom);
    assert_eq!(vdp.vsram[0], 0x0610);
}

#[test]
fn test_cram_transfer_stops_past_end() {
    let mut vdp = dma_vdp();
    let mut ones = |_: u32| 0x0222u16;
    set_dma_regs(&mut vdp, 4, 0x00, 0x00, 0x00);
    set_dma_write(&mut vdp, Target::Cram, 0x007C, &mut ones);

    assert_eq!(vdp.cram[62], 0x0222);
    assert_eq!(vdp.cram[63], 0x0222);
    // No wrap back to the start
    assert_eq!(vdp.cram[0], 0);
    assert_eq!(vdp.cram[1], 0);
}

#[test]
fn test_illegal_source_reads_sentinel() {
    let mut vdp = dma_vdp();
    let mut calls = 0;
    let mut mem = |_: u32| {
        calls += 1;
        0xFFFF
    };
    // 0x800000 is outside ROM and RAM
    set_dma_regs(&mut vdp, 1, 0x00, 0x00, 0x40);
    set_dma_write(&mut vdp, Target::Vram, 0, &mut mem);

    assert_eq!(&vdp.vram[0..2], &DMA_BAD_SOURCE.to_be_bytes());
    assert_eq!(calls, 0);
}

#[test]
fn test_source_wraps_into_ram() {
    let mut vdp = dma_vdp();
    let mut seen = Vec::new();
    let mut mem = |addr: u32| {
        seen.push(addr);
        0
    };
    // 0xFFFFFE >> 1 = 0x7FFFFF
    set_dma_regs(&mut vdp, 2, 0xFF, 0xFF, 0x7F);
    set_dma_write(&mut vdp, Target::Vram, 0, &mut mem);

    assert_eq!(seen, vec![0xFFFFFE, 0xE00000]);
    assert_eq!(vdp.regs().dma_transfer_source, 0xE00002);
}

#[test]
fn test_dma_disabled_is_plain_command() {
    let mut vdp = Vdp::new();
    set_reg(&mut vdp, 15, 2);
    set_dma_regs(&mut vdp, 4, 0x00, 0x01, 0x00);
    set_dma_write(&mut vdp, Target::Vram, 0x0100, &mut address_source);

    assert_eq!(vdp.vram[0x0100], 0, "no transfer without the enable bit");
    vdp.write_data(0x4242);
    assert_eq!(vdp.vram[0x0100], 0x42);
}

#[test]
fn test_transfer_with_read_command_does_nothing() {
    let mut vdp = dma_vdp();
    set_dma_regs(&mut vdp, 4, 0x00, 0x01, 0x00);
    // VRAM read code with CD5
    ctrl(&mut vdp, 0x0000);
    vdp.write_control(0x0080, &mut address_source);

    assert!(vdp.vram.iter().all(|&b| b == 0));
    assert!(!vdp.is_dma_busy());
}

#[test]
fn test_fill_uses_high_byte() {
    let mut vdp = dma_vdp();
    set_reg(&mut vdp, 15, 1);
    set_dma_regs(&mut vdp, 6, 0x00, 0x00, 0x80);
    set_dma_write(&mut vdp, Target::Vram, 0x2000, &mut no_dma);

    assert!(vdp.is_dma_busy(), "fill waits for the data write");
    assert_ne!(vdp.status() & STATUS_DMA_BUSY, 0);

    vdp.write_data(0xAB00);
    assert_eq!(&vdp.vram[0x2000..0x2006], &[0xAB; 6]);
    assert_eq!(vdp.vram[0x2006], 0);
    assert!(!vdp.is_dma_busy());
    assert_eq!(vdp.command.address, 0x2006);
}

#[test]
fn test_fill_with_stride() {
    let mut vdp = dma_vdp();
    set_dma_regs(&mut vdp, 3, 0x00, 0x00, 0x80);
    set_dma_write(&mut vdp, Target::Vram, 0x0100, &mut no_dma);
    vdp.write_data(0x7700);

    assert_eq!(vdp.vram[0x0100], 0x77);
    assert_eq!(vdp.vram[0x0101], 0x00);
    assert_eq!(vdp.vram[0x0102], 0x77);
    assert_eq!(vdp.vram[0x0104], 0x77);
    assert_eq!(vdp.vram[0x0106], 0x00);
}

#[test]
fn test_fill_zero_length_covers_64k() {
    let mut vdp = dma_vdp();
    set_reg(&mut vdp, 15, 1);
    set_dma_regs(&mut vdp, 0, 0x00, 0x00, 0x80);
    set_dma_write(&mut vdp, Target::Vram, 0x0000, &mut no_dma);
    assert_eq!(vdp.dma_length(), 0x10000);
    vdp.write_data(0x5500);

    assert!(vdp.vram.iter().all(|&b| b == 0x55));
}

#[test]
fn test_register_write_cancels_armed_fill() {
    let mut vdp = dma_vdp();
    set_dma_regs(&mut vdp, 4, 0x00, 0x00, 0x80);
    set_dma_write(&mut vdp, Target::Vram, 0x0300, &mut no_dma);
    assert!(vdp.is_dma_busy());

    set_reg(&mut vdp, REG_DMA_LEN_LO as u8, 8);
    assert!(!vdp.is_dma_busy());

    // The data write now goes through as a normal write
    vdp.write_data(0x1234);
    assert_eq!(&vdp.vram[0x0300..0x0304], &[0x12, 0x34, 0x00, 0x00]);
}

#[test]
fn test_unrelated_register_keeps_fill_armed() {
    let mut vdp = dma_vdp();
    set_dma_regs(&mut vdp, 2, 0x00, 0x00, 0x80);
    set_dma_write(&mut vdp, Target::Vram, 0x0300, &mut no_dma);
    set_reg(&mut vdp, 7, 0x01);
    assert!(vdp.is_dma_busy());
}

#[test]
fn test_copy() {
    let mut vdp = dma_vdp();
    set_reg(&mut vdp, 15, 1);
    vdp.vram[0x4000..0x4004].copy_from_slice(&[1, 2, 3, 4]);
    set_dma_regs(&mut vdp, 4, 0x00, 0x40, 0xC0);
    set_dma_write(&mut vdp, Target::Vram, 0x5000, &mut no_dma);

    assert_eq!(&vdp.vram[0x5000..0x5004], &[1, 2, 3, 4]);
    assert_eq!(vdp.registers[REG_DMA_SRC_LO], 0x04);
    assert_eq!(vdp.registers[REG_DMA_SRC_MID], 0x40);
    assert_eq!(vdp.registers[REG_DMA_SRC_HI], 0xC0, "mode bits survive");
    assert!(!vdp.is_dma_busy());
}

#[test]
fn test_copy_overlapping_propagates() {
    let mut vdp = dma_vdp();
    set_reg(&mut vdp, 15, 1);
    vdp.vram[0x100] = 0x9A;
    // Copy 0x100.. to 0x101.., one byte behind the source
    set_dma_regs(&mut vdp, 8, 0x00, 0x01, 0xC0);
    set_dma_write(&mut vdp, Target::Vram, 0x0101, &mut no_dma);

    assert_eq!(&vdp.vram[0x100..0x109], &[0x9A; 9]);
}

#[test]
fn test_transfer_zero_length_moves_64k_words() {
    let mut vdp = dma_vdp();
    let mut reads = 0u32;
    let mut counting = |addr: u32| {
        reads += 1;
        address_source(addr)
    };

    // Work RAM at 0xFF0000, both length registers clear
    set_dma_regs(&mut vdp, 0, 0x00, 0x80, 0x7F);
    set_dma_write(&mut vdp, Target::Vram, 0x0000, &mut counting);

    assert_eq!(reads, 0x10000);
    assert!(!vdp.is_dma_busy());
    assert_eq!(vdp.regs().dma_length, 0);
    // Source ran off the top of the map and wrapped into work RAM
    assert_eq!(vdp.regs().dma_transfer_source, 0xE1_0000);
}

#[test]
fn test_transfer_zero_length_to_cram_stops_at_end() {
    let mut vdp = dma_vdp();
    let mut reads = 0u32;
    let mut counting = |addr: u32| {
        reads += 1;
        address_source(addr)
    };

    set_dma_regs(&mut vdp, 0, 0x00, 0x01, 0x00);
    set_dma_write(&mut vdp, Target::Cram, 0x0000, &mut counting);

    // 64 words fill CRAM, then the address passes 0x7F
    assert_eq!(reads, 64);
    assert!(!vdp.is_dma_busy());
    assert_eq!(vdp.cram[0], 0x0200);
    assert_eq!(vdp.cram[63], 0x027E & 0x0EEE);
    assert_eq!(vdp.regs().dma_transfer_source, 0x280);

    let mut reads = 0u32;
    let mut counting = |addr: u32| {
        reads += 1;
        address_source(addr)
    };
    set_dma_regs(&mut vdp, 0, 0x00, 0x01, 0x00);
    set_dma_write(&mut vdp, Target::Vsram, 0x0040, &mut counting);
    assert_eq!(reads, 32);
    assert_eq!(vdp.vsram[32], 0x0200 & 0x07FF);
}
