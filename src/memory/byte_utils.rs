//! Helper functions for byte manipulation.
//!
//! Centralised big-endian joins and splits, matching the 68k's byte order.

/// Join two bytes into a 16-bit word (Big Endian)
#[inline(always)]
pub fn join_u16(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}

/// Split a 16-bit word into two bytes (Big Endian)
#[inline(always)]
pub fn split_u16(word: u16) -> (u8, u8) {
    let bytes = word.to_be_bytes();
    (bytes[0], bytes[1])
}

/// Join two 16-bit words into a 32-bit long (Big Endian)
#[inline(always)]
pub fn join_u32_words(high: u16, low: u16) -> u32 {
    (u32::from(high) << 16) | u32::from(low)
}

/// Split a 32-bit long into two 16-bit words (Big Endian)
#[inline(always)]
pub fn split_u32_to_words(value: u32) -> (u16, u16) {
    ((value >> 16) as u16, value as u16)
}

/// Byte lane `addr & 1` of a port word. Even addresses carry the high byte.
#[inline(always)]
pub fn word_lane(word: u16, addr: u32) -> u8 {
    if addr & 1 == 0 {
        (word >> 8) as u8
    } else {
        word as u8
    }
}
