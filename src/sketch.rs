//! HyperLogLog sketch estimating the number of distinct elements in a stream.
//!
//! The sketch is sized from a target standard error `ε` (see [`crate::config`]) into
//! `m = 2^p` registers of 6 bits each. Every inserted item is hashed into a `u64`:
//! - the top `p` bits select the register (bucket);
//! - the remaining `64 - p` bits give the rank, which is the 1-based position of their
//!   leftmost set bit.
//!
//! A register keeps the largest rank seen for its bucket, so the register array only ever
//! grows and re-inserting an item never changes it. Estimation scans all registers once and
//! applies one of the three range corrections from [`crate::correction`].
//!
//! # Memory
//! For `ε = 0.02` the sketch holds `4096` registers in `3076` bytes of heap, regardless of
//! how many items are inserted.
//!
//! # Hashing
//! The hash function is a type parameter implementing [`BuildHasher`], `WyHash` by default.
//! Any hasher whose output bits are close to uniformly distributed keeps the error bound;
//! a biased hasher degrades accuracy silently.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};
use std::mem::size_of;

use tracing::{debug, trace};
use wyhash::WyHash;

use crate::config::{self, DEFAULT_PRECISION};
use crate::correction::{self, Regime};
use crate::error::SketchError;
use crate::registers::Registers;

/// Distinct count sketch with `2^precision` registers, hashing items with `S`.
pub struct Sketch<S = BuildHasherDefault<WyHash>> {
    /// Number of hash bits selecting a register
    precision: u32,
    /// Packed registers
    registers: Registers,
    /// Hash function used by `insert`
    build_hasher: S,
}

impl Sketch {
    /// Creates a sketch with `error_rate` target standard error, e.g. `0.02` for 2%.
    pub fn new(error_rate: f64) -> Result<Self, SketchError> {
        Self::with_hasher(error_rate, BuildHasherDefault::default())
    }

    /// Creates a sketch with `2^precision` registers.
    pub fn with_precision(precision: u32) -> Result<Self, SketchError> {
        Self::with_precision_and_hasher(precision, BuildHasherDefault::default())
    }
}

impl<S: BuildHasher> Sketch<S> {
    /// Creates a sketch with `error_rate` target standard error hashing items with `build_hasher`.
    pub fn with_hasher(error_rate: f64, build_hasher: S) -> Result<Self, SketchError> {
        let m = config::register_count(error_rate)?;
        let precision = config::validate_precision(config::precision(m))?;
        debug!(error_rate, precision, registers = m, "creating sketch");
        Self::try_from_precision(precision, build_hasher)
    }

    /// Creates a sketch with `2^precision` registers hashing items with `build_hasher`.
    pub fn with_precision_and_hasher(precision: u32, build_hasher: S) -> Result<Self, SketchError> {
        let precision = config::validate_precision(precision)?;
        debug!(precision, registers = 1u64 << precision, "creating sketch");
        Self::try_from_precision(precision, build_hasher)
    }

    /// Rebuilds a sketch from its precision and packed register words
    #[cfg(feature = "with_serde")]
    pub(crate) fn from_parts(
        precision: u32,
        words: Vec<u32>,
        build_hasher: S,
    ) -> Result<Self, SketchError> {
        let precision = config::validate_precision(precision)?;
        let (m, expected) = 1usize
            .checked_shl(precision)
            .and_then(|m| Some((m, Registers::words_len(m)?)))
            .ok_or(SketchError::AllocationFailed {
                registers: 1 << precision,
            })?;
        let actual = words.len();
        let registers = Registers::from_words(m, words)
            .ok_or(SketchError::InvalidRegisters { expected, actual })?;
        Ok(Self {
            precision,
            registers,
            build_hasher,
        })
    }

    /// Allocate `2^precision` zeroed registers for an already validated precision
    fn try_from_precision(precision: u32, build_hasher: S) -> Result<Self, SketchError> {
        let registers = 1usize
            .checked_shl(precision)
            .and_then(Registers::try_new)
            .ok_or(SketchError::AllocationFailed {
                registers: 1 << precision,
            })?;
        Ok(Self {
            precision,
            registers,
            build_hasher,
        })
    }

    /// Number of hash bits selecting a register
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Number of registers
    #[inline]
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Rank stored in register `idx`
    ///
    /// # Panics
    /// If `idx >= self.register_count()`.
    #[inline]
    pub fn register(&self, idx: usize) -> u8 {
        self.registers.get(idx)
    }

    /// Insert a hashable item into the sketch
    #[inline]
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        let mut hasher = self.build_hasher.build_hasher();
        item.hash(&mut hasher);
        let hash = hasher.finish();
        self.insert_hash(hash);
    }

    /// Insert an already computed 64-bit hash into the sketch
    #[inline]
    pub fn insert_hash(&mut self, hash: u64) {
        let (idx, rank) = self.bucket_and_rank(hash);
        if rank > self.registers.get(idx) {
            self.registers.set(idx, rank);
        }
    }

    /// Split `hash` into its register index and rank.
    ///
    /// When all of the low `64 - p` bits are zero the rank is `64 - p`, the same as for a
    /// tail of `1`, rather than the `64 - p + 1` a plain leading-zero count would give.
    #[inline]
    fn bucket_and_rank(&self, hash: u64) -> (usize, u8) {
        let idx = (hash >> (64 - self.precision)) as usize;
        let tail = hash << self.precision;
        let rank = if tail == 0 {
            64 - self.precision
        } else {
            tail.leading_zeros() + 1
        };
        (idx, rank as u8)
    }

    /// Return cardinality estimate
    pub fn estimate(&self) -> f64 {
        let (m, raw, empty) = self.raw_estimate();
        let regime = correction::regime(m, raw);
        let estimate = correction::correct(regime, m, raw, empty);
        trace!(raw, empty, ?regime, estimate, "estimated cardinality");
        estimate
    }

    /// Return which range correction `estimate` currently applies
    pub fn regime(&self) -> Regime {
        let (m, raw, _) = self.raw_estimate();
        correction::regime(m, raw)
    }

    /// Scan the registers for the raw estimate and the number of empty registers
    #[inline]
    fn raw_estimate(&self) -> (f64, f64, usize) {
        let mut sum = 0.0;
        let mut empty = 0;
        for rank in self.registers.iter() {
            sum += 1.0 / ((1u64 << rank) as f64);
            if rank == 0 {
                empty += 1;
            }
        }
        let m = self.registers.len() as f64;
        (m, correction::raw_estimate(m, sum), empty)
    }

    /// Return memory size of the sketch
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.heap_size()
    }

    /// Packed register words
    #[cfg(feature = "with_serde")]
    #[inline]
    pub(crate) fn words(&self) -> &[u32] {
        self.registers.words()
    }
}

impl<S: BuildHasher + Default> Default for Sketch<S> {
    fn default() -> Self {
        let precision = DEFAULT_PRECISION;
        Self {
            precision,
            registers: Registers::new(1 << precision),
            build_hasher: S::default(),
        }
    }
}

impl<S: Clone> Clone for Sketch<S> {
    fn clone(&self) -> Self {
        Self {
            precision: self.precision,
            registers: self.registers.clone(),
            build_hasher: self.build_hasher.clone(),
        }
    }
}

impl<S> PartialEq for Sketch<S> {
    /// Compare registers, ignoring the hasher
    fn eq(&self, rhs: &Self) -> bool {
        self.precision == rhs.precision && self.registers == rhs.registers
    }
}

impl<S: BuildHasher> Debug for Sketch<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, registers: {}, estimate: {:.2}, size: {} }}",
            self.precision,
            self.register_count(),
            self.estimate(),
            self.size_of()
        )
    }
}
