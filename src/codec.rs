//! Raw storage byte <-> posit8_2 value.
//!
//! Storage bytes are threaded bit by bit into a fixed-width bit block and the
//! value is rebuilt from the block. Byte `c` bit `i` lands at block position
//! `c * bits_per_byte + i`. The layout is written for any posit width; only the
//! 8-bit case is instantiated here.

use crate::number_representations::posit::posit8_2::Posit8_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitBlock<const N: usize> {
    bits: [bool; N],
}

impl<const N: usize> Default for BitBlock<N> {
    fn default() -> Self {
        BitBlock { bits: [false; N] }
    }
}

impl<const N: usize> BitBlock<N> {
    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn set(&mut self, index: usize, value: bool) {
        self.bits[index] = value;
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }
}

/// Bytes used to store an `nbits` wide posit and how many bits of each byte
/// are significant. Widths below a byte still take a whole byte.
pub const fn storage_layout(nbits: usize) -> (usize, usize) {
    match nbits {
        4 => (1, 4),
        8 => (1, 8),
        16 => (2, 8),
        32 => (4, 8),
        64 => (8, 8),
        128 => (16, 8),
        256 => (32, 8),
        _ => (0, 8),
    }
}

pub fn marshal<const N: usize>(bytes: &[u8]) -> BitBlock<N> {
    let (nr_bytes, bits_in_byte) = storage_layout(N);
    let mut raw = BitBlock::default();
    let mut bit_cntr = 0;
    for byte in bytes.iter().take(nr_bytes) {
        for b in 0..bits_in_byte {
            raw.set(bit_cntr, byte >> b & 1 == 1);
            bit_cntr += 1;
        }
    }
    raw
}

pub fn unmarshal<const N: usize>(raw: &BitBlock<N>, bytes: &mut [u8]) {
    let (nr_bytes, bits_in_byte) = storage_layout(N);
    let mut bit_cntr = 0;
    for byte in bytes.iter_mut().take(nr_bytes) {
        let mut value = 0u8;
        for b in 0..bits_in_byte {
            if raw.get(bit_cntr) {
                value |= 1 << b;
            }
            bit_cntr += 1;
        }
        *byte = value;
    }
}

pub fn decode(raw: u8) -> Posit8_2 {
    let block = marshal::<8>(&[raw]);
    let bits = (0..8).fold(0u8, |acc, i| acc | (block.get(i) as u8) << i);
    Posit8_2::from_bits(bits)
}

pub fn encode(value: Posit8_2) -> u8 {
    let mut block = BitBlock::<8>::default();
    let bits = value.to_bits();
    for i in 0..8 {
        block.set(i, bits >> i & 1 == 1);
    }
    let mut out = [0u8; 1];
    unmarshal(&block, &mut out);
    out[0]
}
