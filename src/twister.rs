//! A seeded MT19937 (Mersenne Twister) pseudorandom source.
//!
//! This is a Rust port of the classic C implementation by Takuji Nishimura and
//! Makoto Matsumoto. Maze generation depends on the exact output stream: the
//! same seed must produce the same maze on every platform, forever, so the
//! seeding procedures, the twist recurrence and the tempering transform are
//! reproduced bit for bit. All arithmetic is native wrapping `u32`.
//!
//! `next_below` reduces a tempered word modulo the caller's bound. That is
//! statistically biased for bounds that are not a power of two. The bias is
//! part of the reference output stream and is kept rather than fixed - swap in
//! rejection sampling and every previously generated maze changes.

use crate::compass::CompassPrimary;

use rand::{self, Rng};
use std::fmt;

const STATE_WORDS: usize = 624;
const TWIST_OFFSET: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

const SEED_MULTIPLIER: u32 = 1_812_433_253;
const ARRAY_SEED_PREAMBLE: u32 = 19_650_218;
const ARRAY_SEED_MULTIPLIER_A: u32 = 1_664_525;
const ARRAY_SEED_MULTIPLIER_B: u32 = 1_566_083_941;

#[derive(Clone)]
pub struct MersenneTwister {
    mt: [u32; STATE_WORDS],
    mti: usize,
}

impl fmt::Debug for MersenneTwister {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MersenneTwister :: cursor: {}", self.mti)
    }
}

impl MersenneTwister {
    /// Create a generator from an optional seed.
    ///
    /// When `seed` is `None` the seed is drawn from OS entropy: the run is
    /// *not* reproducible. Callers wanting repeatable mazes must pass a seed.
    pub fn new(seed: Option<u32>) -> MersenneTwister {
        match seed {
            Some(s) => MersenneTwister::from_seed(s),
            None => MersenneTwister::from_seed(rand::thread_rng().gen::<u32>()),
        }
    }

    pub fn from_seed(seed: u32) -> MersenneTwister {
        let mut twister = MersenneTwister {
            mt: [0; STATE_WORDS],
            mti: STATE_WORDS,
        };
        twister.reseed(seed);
        twister
    }

    pub fn from_seed_slice(key: &[u32]) -> MersenneTwister {
        let mut twister = MersenneTwister {
            mt: [0; STATE_WORDS],
            mti: STATE_WORDS,
        };
        twister.reseed_from_slice(key);
        twister
    }

    /// Reinitialise all internal state from a single integer seed.
    pub fn reseed(&mut self, seed: u32) {
        self.mt[0] = seed;
        for i in 1..STATE_WORDS {
            let previous = self.mt[i - 1];
            self.mt[i] = SEED_MULTIPLIER
                .wrapping_mul(previous ^ (previous >> 30))
                .wrapping_add(i as u32);
        }
        self.mti = STATE_WORDS;
    }

    /// Reinitialise all internal state from a sequence of integers.
    ///
    /// An empty `key` behaves exactly as `reseed` with the fixed preamble
    /// constant; there is no failure mode.
    pub fn reseed_from_slice(&mut self, key: &[u32]) {
        self.reseed(ARRAY_SEED_PREAMBLE);
        if key.is_empty() {
            return;
        }

        let mut i = 1usize;
        let mut j = 0usize;
        for _ in 0..STATE_WORDS.max(key.len()) {
            let previous = self.mt[i - 1];
            self.mt[i] = (self.mt[i]
                ^ (previous ^ (previous >> 30)).wrapping_mul(ARRAY_SEED_MULTIPLIER_A))
            .wrapping_add(key[j])
            .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= STATE_WORDS {
                self.mt[0] = self.mt[STATE_WORDS - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }

        for _ in 0..STATE_WORDS - 1 {
            let previous = self.mt[i - 1];
            self.mt[i] = (self.mt[i]
                ^ (previous ^ (previous >> 30)).wrapping_mul(ARRAY_SEED_MULTIPLIER_B))
            .wrapping_sub(i as u32);
            i += 1;
            if i >= STATE_WORDS {
                self.mt[0] = self.mt[STATE_WORDS - 1];
                i = 1;
            }
        }

        // Guarantees a non-zero state vector.
        self.mt[0] = UPPER_MASK;
    }

    /// Recompute all state words via the twist recurrence and reset the cursor.
    fn refill(&mut self) {
        for kk in 0..STATE_WORDS {
            let y = (self.mt[kk] & UPPER_MASK) | (self.mt[(kk + 1) % STATE_WORDS] & LOWER_MASK);
            let magic = if y & 0x1 == 0 { 0 } else { MATRIX_A };
            self.mt[kk] = self.mt[(kk + TWIST_OFFSET) % STATE_WORDS] ^ (y >> 1) ^ magic;
        }
        self.mti = 0;
    }

    /// The next full 32 bit word of the stream.
    pub fn next_u32(&mut self) -> u32 {
        if self.mti >= STATE_WORDS {
            self.refill();
        }
        let mut y = self.mt[self.mti];
        self.mti += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// A value in `[0, upper)` by modulo reduction of the next word.
    ///
    /// `upper == 0` returns 0 without consuming a word; degenerate bounds
    /// must not advance the stream.
    pub fn next_below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.next_u32() % upper
    }

    /// A float derived from the next word divided by `0xffffffff`. Note the
    /// reference stream divides by the maximum word rather than the word
    /// count, so `1.0` itself is reachable.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::max_value())
    }

    pub fn next_bool(&mut self) -> bool {
        self.next_u32() % 2 == 0
    }

    /// A uniformly chosen element, or None for an empty slice.
    pub fn random_element<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_below(items.len() as u32) as usize;
        items.get(index)
    }

    /// Remove and return a uniformly chosen element. The relative order of the
    /// remaining elements is preserved.
    pub fn remove_random_element<T>(&mut self, items: &mut Vec<T>) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_below(items.len() as u32) as usize;
        Some(items.remove(index))
    }

    /// Uniform in-place Fisher-Yates shuffle.
    pub fn randomize_list<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_below(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }

    /// A shuffled copy of the four planar directions.
    pub fn random_directions(&mut self) -> [CompassPrimary; 4] {
        let mut directions = CompassPrimary::ALL;
        self.randomize_list(&mut directions);
        directions
    }
}
