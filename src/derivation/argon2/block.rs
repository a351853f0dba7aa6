//! The 1 KiB block every Argon2 lane is made of, and the compression
//! function G that mixes two blocks into a third.

use zeroize::Zeroize;

use super::consts::{BLOCK_SIZE, WORDS_IN_BLOCK};

/// 128 little-endian 64-bit words.
///
/// Blocks are the fundamental unit of memory in Argon2. The engine never
/// interprets their words except through the compression function and the
/// single word read used to derive data-dependent addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(C, align(16))]
pub struct Block([u64; WORDS_IN_BLOCK]);

impl Block {
    /// The all-zero block.
    pub const ZERO: Self = Self([0u64; WORDS_IN_BLOCK]);

    /// Sets every byte of the block to `value`.
    pub fn init_value(&mut self, value: u8) {
        let word = u64::from_ne_bytes([value; 8]);
        self.0.iter_mut().for_each(|w| *w = word);
    }

    /// Copies `src` into `self` word for word.
    pub fn copy_from(&mut self, src: &Block) {
        self.0.copy_from_slice(&src.0);
    }

    /// XORs `other` into `self` word for word.
    pub fn in_place_xor(&mut self, other: &Block) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= b);
    }

    /// Reads word `index` (little-endian view of bytes `8*index..8*index+8`).
    #[inline]
    pub fn word(&self, index: usize) -> u64 {
        self.0[index]
    }

    /// Builds a block from its little-endian byte serialisation.
    pub fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Self {
        let mut block = Block::ZERO;
        for (word, chunk) in block.0.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *word = u64::from_le_bytes(buf);
        }
        block
    }

    /// Serialises the block as little-endian bytes.
    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut out = [0u8; BLOCK_SIZE];
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// G(X, Y) from RFC 9106 §3.5.
    ///
    /// R = X xor Y is viewed as an 8x8 matrix of 16-byte registers. P runs
    /// over each row of eight registers, then over each column, and the
    /// result is XOR-ed with R once more.
    pub(crate) fn compress(x: &Self, y: &Self) -> Self {
        let mut r = Block::ZERO;
        for (out, (a, b)) in r.0.iter_mut().zip(x.0.iter().zip(y.0.iter())) {
            *out = a ^ b;
        }

        let mut z = r.clone();

        // Rows: P on 8 groups of 16 consecutive words
        for row in z.0.chunks_exact_mut(16) {
            let mut v = [0u64; 16];
            v.copy_from_slice(row);
            permute_p(&mut v);
            row.copy_from_slice(&v);
        }

        // Columns: P on 8 groups of interleaved word pairs
        for i in 0..8 {
            let base = 2 * i;
            let mut v = [0u64; 16];
            for (k, pair) in v.chunks_exact_mut(2).enumerate() {
                pair[0] = z.0[base + 16 * k];
                pair[1] = z.0[base + 16 * k + 1];
            }

            permute_p(&mut v);

            for (k, pair) in v.chunks_exact(2).enumerate() {
                z.0[base + 16 * k] = pair[0];
                z.0[base + 16 * k + 1] = pair[1];
            }
        }

        z.in_place_xor(&r);
        z
    }

    /// Input block of the data-independent address generator.
    ///
    /// Words 0..6 carry the position and instance shape; word 6 is the
    /// counter, bumped by [`Block::next_addresses`] before every use.
    pub(crate) fn address_seed(
        pass: u32,
        lane: u32,
        slice: u32,
        memory_blocks: u32,
        passes: u32,
        algorithm: u32,
    ) -> Self {
        let mut input = Block::ZERO;
        input.0[0] = pass as u64;
        input.0[1] = lane as u64;
        input.0[2] = slice as u64;
        input.0[3] = memory_blocks as u64;
        input.0[4] = passes as u64;
        input.0[5] = algorithm as u64;
        input
    }

    /// Advances the counter in `input` and returns G(0, G(0, input)).
    pub(crate) fn next_addresses(input: &mut Self) -> Self {
        input.0[6] = input.0[6].wrapping_add(1);
        let tmp = Block::compress(&Block::ZERO, input);
        Block::compress(&Block::ZERO, &tmp)
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Word quadruples mixed by one application of P: four columns, then four
/// diagonals of the 4x4 word matrix.
const P_STEPS: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

/// BLAKE2b's quarter-round with the additions replaced by `fblamka`.
#[inline(always)]
fn gb(v: &mut [u64; 16], [a, b, c, d]: [usize; 4]) {
    v[a] = fblamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = fblamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = fblamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = fblamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// `x + y + 2 * lo32(x) * lo32(y)`, wrapping.
#[inline(always)]
fn fblamka(x: u64, y: u64) -> u64 {
    let xy = (x as u32 as u64).wrapping_mul(y as u32 as u64);
    x.wrapping_add(y).wrapping_add(xy.wrapping_mul(2))
}

#[inline(always)]
fn permute_p(v: &mut [u64; 16]) {
    for step in P_STEPS {
        gb(v, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_block() -> Block {
        let mut bytes = [0u8; BLOCK_SIZE];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Block::from_bytes(&bytes)
    }

    #[test]
    fn init_value_sets_every_byte() {
        let mut block = counting_block();
        block.init_value(0xA5);
        assert!(block.to_bytes().iter().all(|&b| b == 0xA5));
    }

    #[test]
    fn copy_and_xor_cancel_out() {
        let src = counting_block();
        let mut dst = Block::ZERO;
        dst.copy_from(&src);
        assert_eq!(dst, src);

        dst.in_place_xor(&src);
        assert_eq!(dst, Block::ZERO);
    }

    #[test]
    fn words_are_little_endian() {
        let block = counting_block();
        assert_eq!(block.word(0), u64::from_le_bytes([0, 1, 2, 3, 4, 5, 6, 7]));
        assert_eq!(block.to_bytes()[8..16], block.word(1).to_le_bytes());
    }

    #[test]
    fn compress_is_symmetric_in_its_inputs() {
        let x = counting_block();
        let mut y = Block::ZERO;
        y.init_value(0x3C);
        assert_eq!(Block::compress(&x, &y), Block::compress(&y, &x));
        assert_ne!(Block::compress(&x, &y), Block::ZERO);
    }

    #[test]
    fn address_counter_advances() {
        let mut input = Block::address_seed(0, 0, 0, 32, 1, 1);
        let first = Block::next_addresses(&mut input);
        assert_eq!(input.word(6), 1);
        let second = Block::next_addresses(&mut input);
        assert_eq!(input.word(6), 2);
        assert_ne!(first, second);
    }
}
