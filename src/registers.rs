//! ## Register store
//! Fixed-size array of `m` registers packed at `REGISTER_WIDTH` bits each into `u32` words.
//!
//! Register `idx` occupies bits `idx * W .. idx * W + W` of the word buffer, counting from the
//! least significant bit of `words[0]`. A register may straddle two neighbouring words, so the
//! buffer carries one spare trailing word which keeps the two-word read and write in bounds
//! for the last register.

use std::mem::size_of_val;

/// Number of bits used to store a single register
pub const REGISTER_WIDTH: usize = 6;
/// Largest rank a register can hold
pub const MAX_RANK: u8 = (1 << REGISTER_WIDTH) - 1;

const W: usize = REGISTER_WIDTH;

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Registers {
    /// Number of registers
    len: usize,
    /// Packed register ranks
    words: Box<[u32]>,
}

impl Registers {
    /// Create `len` registers, all set to zero
    pub(crate) fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0u32; (len * W).div_ceil(32) + 1].into_boxed_slice(),
        }
    }

    /// Create `len` registers, all set to zero, or `None` if the word buffer cannot be allocated
    pub(crate) fn try_new(len: usize) -> Option<Self> {
        let words_len = Self::words_len(len)?;
        let mut words = Vec::new();
        words.try_reserve_exact(words_len).ok()?;
        words.resize(words_len, 0u32);
        Some(Self {
            len,
            words: words.into_boxed_slice(),
        })
    }

    /// Rebuild registers from a previously exported word buffer.
    /// Bits past the last register are cleared.
    #[cfg(feature = "with_serde")]
    pub(crate) fn from_words(len: usize, mut words: Vec<u32>) -> Option<Self> {
        if Some(words.len()) != Self::words_len(len) {
            return None;
        }
        let used_bits = len * W;
        for (i, word) in words.iter_mut().enumerate() {
            let start = i * 32;
            if start >= used_bits {
                *word = 0;
            } else if start + 32 > used_bits {
                *word &= (1u32 << (used_bits - start)) - 1;
            }
        }
        Some(Self {
            len,
            words: words.into_boxed_slice(),
        })
    }

    /// Length of the word buffer backing `len` registers, `None` if it overflows `usize`
    #[inline]
    pub(crate) fn words_len(len: usize) -> Option<usize> {
        Some(len.checked_mul(W)?.div_ceil(32) + 1)
    }

    /// Number of registers
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Packed word buffer
    #[cfg(feature = "with_serde")]
    #[inline]
    pub(crate) fn words(&self) -> &[u32] {
        &self.words
    }

    /// Get rank stored in register `idx`
    #[inline]
    pub(crate) fn get(&self, idx: usize) -> u8 {
        assert!(idx < self.len, "register {} out of {}", idx, self.len);
        let bit_idx = idx * W;
        let word_idx = bit_idx / 32;
        let bit_pos = bit_idx % 32;
        let bits = &self.words[word_idx..word_idx + 2];
        let bits_1 = W.min(32 - bit_pos);
        let bits_2 = W - bits_1;
        let mask_1 = (1u32 << bits_1) - 1;
        let mask_2 = (1u32 << bits_2) - 1;

        let rank = ((bits[0] >> bit_pos) & mask_1) | ((bits[1] & mask_2) << bits_1);
        rank as u8
    }

    /// Set register `idx` to `rank`
    #[inline]
    pub(crate) fn set(&mut self, idx: usize, rank: u8) {
        assert!(idx < self.len, "register {} out of {}", idx, self.len);
        assert!(rank <= MAX_RANK, "rank {} exceeds {}", rank, MAX_RANK);
        let rank = u32::from(rank);
        let bit_idx = idx * W;
        let word_idx = bit_idx / 32;
        let bit_pos = bit_idx % 32;
        let bits = &mut self.words[word_idx..word_idx + 2];
        let bits_1 = W.min(32 - bit_pos);
        let bits_2 = W - bits_1;
        let mask_1 = (1u32 << bits_1) - 1;
        let mask_2 = (1u32 << bits_2) - 1;

        // Unconditionally update two `u32` elements based on `rank` bits and masks
        bits[0] &= !(mask_1 << bit_pos);
        bits[0] |= (rank & mask_1) << bit_pos;
        bits[1] &= !mask_2;
        bits[1] |= (rank >> bits_1) & mask_2;
    }

    /// Iterate over all register ranks in index order
    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |idx| self.get(idx))
    }

    /// Heap size of the word buffer
    #[inline]
    pub(crate) fn heap_size(&self) -> usize {
        size_of_val(&*self.words)
    }
}
