//! Fixed-length bit-set backed by 32-bit words.

use crate::error::{BitError, BitResult};

const WORD_BITS: usize = 32;

/// A fixed-length set of bits stored in little-endian 32-bit words.
///
/// Bit `i` lives in bit `i % 32` of word `i / 32`. The length is fixed at
/// construction; bits past it are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSet {
    words: Vec<u32>,
    len: usize,
}

impl BitSet {
    /// Creates an all-zero bit-set of `len` bits.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Rebuilds a bit-set of `len` bits from backing words.
    ///
    /// Missing trailing words are treated as zero.
    pub fn from_words(len: usize, words: &[u32]) -> BitResult<Self> {
        let needed = len.div_ceil(WORD_BITS);
        if words.len() > needed {
            return Err(BitError::LengthMismatch {
                expected: needed,
                actual: words.len(),
            });
        }
        let mut set = Self::new(len);
        set.words[..words.len()].copy_from_slice(words);
        if let Some(highest) = set.highest_set() {
            if highest >= len {
                return Err(BitError::BitsBeyondLength { highest, len });
            }
        }
        Ok(set)
    }

    /// Returns the number of bits in the set.
    #[must_use]
    pub const fn bit_len(&self) -> usize {
        self.len
    }

    /// Returns the backing words.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Returns the bit at `index`; indexes past the length read as unset.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Sets the bit at `index`, returning `true` if it was previously unset.
    pub fn set(&mut self, index: usize) -> BitResult<bool> {
        self.check(index)?;
        let word = &mut self.words[index / WORD_BITS];
        let bit = 1 << (index % WORD_BITS);
        let was_unset = *word & bit == 0;
        *word |= bit;
        Ok(was_unset)
    }

    /// Clears the bit at `index`, returning `true` if it was previously set.
    pub fn clear(&mut self, index: usize) -> BitResult<bool> {
        self.check(index)?;
        let word = &mut self.words[index / WORD_BITS];
        let bit = 1 << (index % WORD_BITS);
        let was_set = *word & bit != 0;
        *word &= !bit;
        Ok(was_set)
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    /// Sets every bit that is set in `other`.
    pub fn union_with(&mut self, other: &Self) -> BitResult<()> {
        if other.len != self.len {
            return Err(BitError::LengthMismatch {
                expected: self.len,
                actual: other.len,
            });
        }
        for (word, other) in self.words.iter_mut().zip(&other.words) {
            *word |= *other;
        }
        Ok(())
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Returns the index of the highest set bit.
    #[must_use]
    pub fn highest_set(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, word)| **word != 0)
            .map(|(idx, word)| idx * WORD_BITS + (WORD_BITS - 1 - word.leading_zeros() as usize))
    }

    /// Iterates set bit indexes in ascending order.
    #[must_use]
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn check(&self, index: usize) -> BitResult<()> {
        if index >= self.len {
            return Err(BitError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }
}

/// Iterator over set bit indexes of a [`BitSet`].
#[derive(Debug, Clone)]
pub struct Ones<'a> {
    words: &'a [u32],
    word_idx: usize,
    current: u32,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * WORD_BITS + bit);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}
