//! Property tests for the port interface, DMA and rendering.

use super::test_helpers::*;
use super::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn vram_word_round_trip(addr in (0u16..0x8000).prop_map(|a| a * 2), value: u16) {
        let mut vdp = Vdp::new();
        set_write(&mut vdp, Target::Vram, addr);
        vdp.write_data(value);
        set_read(&mut vdp, Target::Vram, addr);
        prop_assert_eq!(vdp.read_data(), value);
    }

    #[test]
    fn odd_address_write_swaps_bytes(word in (0u16..0x8000).prop_map(|a| a * 2), value: u16) {
        let mut vdp = Vdp::new();
        set_write(&mut vdp, Target::Vram, word + 1);
        vdp.write_data(value);
        set_read(&mut vdp, Target::Vram, word);
        prop_assert_eq!(vdp.read_data(), value.swap_bytes());
    }

    #[test]
    fn auto_increment_is_modular(start: u16, increment: u8, writes in 1usize..64) {
        let mut vdp = Vdp::new();
        set_reg(&mut vdp, 15, increment);
        set_write(&mut vdp, Target::Vram, start);
        for _ in 0..writes {
            vdp.write_data(0);
        }
        let expected = (u32::from(start) + writes as u32 * u32::from(increment)) & 0xFFFF;
        prop_assert_eq!(vdp.command.address, expected);
    }

    #[test]
    fn cram_keeps_only_colour_bits(index in 0u16..64, value: u16) {
        let mut vdp = Vdp::new();
        set_write(&mut vdp, Target::Cram, index * 2);
        vdp.write_data(value);
        prop_assert_eq!(vdp.cram[usize::from(index)], value & 0x0EEE);
    }

    #[test]
    fn register_pattern_never_applies_mid_command(first: u16, second in 0x8000u16..0xC000) {
        prop_assume!(first & 0xC000 != 0x8000);
        let mut vdp = Vdp::new();
        ctrl(&mut vdp, first);
        ctrl(&mut vdp, second);
        prop_assert!(vdp.registers.iter().all(|&r| r == 0));
        prop_assert!(!vdp.is_control_pending());
    }

    #[test]
    fn dma_length_never_zero(lo: u8, hi: u8) {
        let mut vdp = Vdp::new();
        set_reg(&mut vdp, REG_DMA_LEN_LO as u8, lo);
        set_reg(&mut vdp, REG_DMA_LEN_HI as u8, hi);
        let len = vdp.dma_length();
        prop_assert!((1..=0x10000).contains(&len));
        if lo == 0 && hi == 0 {
            prop_assert_eq!(len, 0x10000);
        }
    }

    #[test]
    fn fill_writes_high_byte(start in 0u16..0xF000, len in 1u16..0x0800, data: u16) {
        let mut vdp = Vdp::new();
        set_reg(&mut vdp, 1, 0x14);
        set_reg(&mut vdp, 15, 1);
        set_dma_regs(&mut vdp, len, 0, 0, 0x80);
        set_dma_write(&mut vdp, Target::Vram, start, &mut no_dma);
        vdp.write_data(data);

        let start = usize::from(start);
        let end = start + usize::from(len);
        let fill = (data >> 8) as u8;
        prop_assert!(vdp.vram[start..end].iter().all(|&b| b == fill));
        prop_assert!(!vdp.is_dma_busy());
    }

    #[test]
    fn sprite_walk_is_bounded(table in proptest::collection::vec(any::<u8>(), 640)) {
        let mut vdp = Vdp::new();
        vdp.vram[0xF000..0xF280].copy_from_slice(&table);
        let count = SpriteIterator::new(&vdp.vram, 0xF000).count();
        prop_assert!(count >= 1);
        prop_assert!(count <= SPRITE_LINK_LIMIT);
    }

    #[test]
    fn sprite_with_zero_x_hides_later_sprites(later_x in 1u16..0x1FF) {
        let mut vdp = display_vdp();
        solid_tile(&mut vdp, 1, 1);
        put_sprite(&mut vdp, SPRITES, 0, 128, 0x00, 1, 0x0001, 0);
        put_sprite(&mut vdp, SPRITES, 1, 128, 0x0F, 0, 0x0001, later_x);

        let buf = render(&vdp, 0);
        prop_assert!(buf.pixels().iter().all(|p| p.index() == 0));
    }

    #[test]
    fn shade_operators_keep_index(raw: u8) {
        let pixel = Pixel(raw & 0x7F);
        prop_assert_eq!(pixel.brighten().index(), pixel.index());
        prop_assert_eq!(pixel.darken().index(), pixel.index());
        let normal = pixel.normal();
        prop_assert_eq!(normal.brighten().darken(), normal);
        prop_assert_eq!(normal.darken().brighten(), normal);
    }

    #[test]
    fn plane_dimensions_are_valid(size: u8) {
        let mut vdp = Vdp::new();
        set_reg(&mut vdp, 16, size);
        let regs = vdp.regs();
        prop_assert!([32, 64, 128].contains(&regs.plane_width));
        prop_assert!([32, 64, 128].contains(&regs.plane_height));
        prop_assert!(regs.plane_width * regs.plane_height <= 4096);
    }

    #[test]
    fn render_any_register_file(
        regs in proptest::array::uniform24(any::<u8>()),
        fill: u8,
        line in 0u16..240,
    ) {
        let mut vdp = Vdp::new();
        for (i, &value) in regs.iter().enumerate() {
            vdp.write_register(i, value);
        }
        vdp.vram.fill(fill);
        vdp.vsram.fill(u16::from(fill) << 2);

        let mut buf = LineBuffer::new();
        vdp.render_line(line, &mut buf);
        prop_assert!(buf.width() == 256 || buf.width() == 320);
    }
}
