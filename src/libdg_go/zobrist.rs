// Copyright 2019 Karl Sundequist Blomdahl <karl.sundequist.blomdahl@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::point::{EXT_AREA, Vertex};

/// A fixed, deterministic stream of 64-bit randoms -- the per-vertex Zobrist
/// table must be the same across every process that plays the same game,
/// so it is derived from a constant seed rather than from OS randomness
/// (spec.md §2.A).
struct SplitMix64(u64);

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

pub struct ZobristTable {
    /// `stone[color.index()][v]` is the Zobrist random for placing `color`
    /// at vertex `v`.
    pub stone: [Vec<u64>; 2],
    /// XORed in whenever the side to move changes.
    pub side: u64,
    /// XORed in whenever `ko` transitions (so undoing a move that changed
    /// `ko` restores the hash exactly).
    pub ko: Vec<u64>,
}

impl ZobristTable {
    fn new() -> Self {
        let mut rng = SplitMix64(0xC0FFEE_1234_5678);
        let mut black = vec![0u64; EXT_AREA + 2];
        let mut white = vec![0u64; EXT_AREA + 2];
        let mut ko = vec![0u64; EXT_AREA + 2];

        for v in 0..(EXT_AREA + 2) {
            black[v] = rng.next();
            white[v] = rng.next();
            ko[v] = rng.next();
        }

        Self { stone: [black, white], side: rng.next(), ko }
    }

    /// The Zobrist random of placing `color` (0=Black, 1=White) at `v`.
    pub fn of(&self, color_index: usize, v: Vertex) -> u64 {
        self.stone[color_index][v as usize]
    }
}

lazy_static::lazy_static! {
    pub static ref ZOBRIST: ZobristTable = ZobristTable::new();
}

/// Computes the Zobrist key of a position from scratch, given an iterator
/// over `(vertex, color_index)` stone pairs plus the side-to-move and `ko`
/// state. Used by the `incremental-vs-scratch` testable property (spec.md
/// §8).
pub fn scratch_key<I: Iterator<Item = (Vertex, usize)>>(stones: I, to_move_is_white: bool, ko: Vertex) -> u64 {
    let mut key = 0u64;

    for (v, color_index) in stones {
        key ^= ZOBRIST.of(color_index, v);
    }

    if to_move_is_white {
        key ^= ZOBRIST.side;
    }

    key ^= ZOBRIST.ko[ko as usize];
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn randoms_are_distinct() {
        let mut seen = HashSet::new();

        for v in 0..EXT_AREA {
            assert!(seen.insert(ZOBRIST.of(0, v as Vertex)));
            assert!(seen.insert(ZOBRIST.of(1, v as Vertex)));
        }
    }

    #[test]
    fn table_is_deterministic_across_instances() {
        let other = ZobristTable::new();

        assert_eq!(ZOBRIST.side, other.side);
        assert_eq!(ZOBRIST.of(0, 5), other.of(0, 5));
    }
}
