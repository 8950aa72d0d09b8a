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
//
// Packed 3x3 + 12-point local pattern (spec.md §4.2). Layout:
//
//   bits  0..15  8 near neighbours (N,E,S,W,NW,NE,SE,SW), 2 bits each
//   bits 16..23  4 far neighbours  (U2,R2,D2,L2), 2 bits each
//   bits 24..31  atari/pre-atari flag pairs for the 4 cardinal directions
//
// A single `ptn[v]` uses only the near-8 + atari portion; `prev_ptn[0..1]`
// (the 12-point response pattern around the last two moves) uses all 12
// directions, grounded in the bitfield layout of original_source's
// `pattern3x3.h` extended with the far neighbours spec.md §4.2 calls for.

pub mod tables;

use crate::color::Color;

pub const DIR_N: usize = 0;
pub const DIR_E: usize = 1;
pub const DIR_S: usize = 2;
pub const DIR_W: usize = 3;
pub const DIR_NW: usize = 4;
pub const DIR_NE: usize = 5;
pub const DIR_SE: usize = 6;
pub const DIR_SW: usize = 7;
pub const DIR_U2: usize = 8;
pub const DIR_R2: usize = 9;
pub const DIR_D2: usize = 10;
pub const DIR_L2: usize = 11;

/// Clockwise rotation of the 12 directions by one quarter turn.
const ROTATE_DIRS: [usize; 12] = [
    DIR_E, DIR_S, DIR_W, DIR_N, // N->E, E->S, S->W, W->N
    DIR_NE, DIR_SE, DIR_SW, DIR_NW,
    DIR_R2, DIR_D2, DIR_L2, DIR_U2,
];
const ROTATE_ATARI: [usize; 4] = [DIR_E, DIR_S, DIR_W, DIR_N];

/// Reflection about the vertical axis (swaps E/W, NW/NE, SE/SW, R2/L2).
const MIRROR_DIRS: [usize; 12] = [
    DIR_N, DIR_W, DIR_S, DIR_E,
    DIR_NE, DIR_NW, DIR_SW, DIR_SE,
    DIR_U2, DIR_L2, DIR_D2, DIR_R2,
];
const MIRROR_ATARI: [usize; 4] = [DIR_N, DIR_W, DIR_S, DIR_E];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Pattern {
    bf: u32,
}

impl Pattern {
    pub fn new() -> Self {
        Self { bf: 0 }
    }

    pub fn color_at(self, dir: usize) -> Color {
        match (self.bf >> (2 * dir)) & 3 {
            0 => Color::Empty,
            1 => Color::Black,
            2 => Color::White,
            _ => Color::Wall,
        }
    }

    pub fn set_color(&mut self, dir: usize, color: Color) {
        self.bf &= !(3 << (2 * dir));
        self.bf |= (color as u32) << (2 * dir);
    }

    /// `stone_bits` is the 24-bit non-atari portion of the pattern, used as
    /// the key into both probability tables (spec.md §6 static data files).
    pub fn stone_bits(self) -> u32 {
        self.bf & 0x00FF_FFFF
    }

    pub fn atari_bits(self) -> u32 {
        (self.bf >> 24) & 0xFF
    }

    fn set_atari_raw(&mut self, dir: usize, atari: bool, pre_atari: bool) {
        let shift = 24 + 2 * dir;
        self.bf &= !(3 << shift);
        self.bf |= ((atari as u32) | ((pre_atari as u32) << 1)) << shift;
    }

    pub fn set_atari(&mut self, dir: usize) {
        self.set_atari_raw(dir, true, false);
    }

    pub fn set_pre_atari(&mut self, dir: usize) {
        self.set_atari_raw(dir, false, true);
    }

    pub fn clear_atari(&mut self, dir: usize) {
        self.set_atari_raw(dir, false, false);
    }

    pub fn is_atari(self, dir: usize) -> bool {
        (self.bf >> (24 + 2 * dir)) & 1 != 0
    }

    pub fn is_pre_atari(self, dir: usize) -> bool {
        (self.bf >> (24 + 2 * dir)) & 2 != 0
    }

    pub fn any_atari(self) -> bool {
        (0..4).any(|dir| self.is_atari(dir))
    }

    /// Number of the 4 cardinal neighbours occupied by `color`.
    pub fn count(self, color: Color) -> usize {
        (0..4).filter(|&dir| self.color_at(dir) == color).count()
    }

    /// True iff the 4 cardinal neighbours are all `color` or `Wall`
    /// (spec.md §4.2 `enclosed_by`).
    pub fn enclosed_by(self, color: Color) -> bool {
        self.count(color) + self.count(Color::Wall) == 4
    }

    /// True iff `side` may legally play into the vertex this pattern
    /// describes, given that it has no empty neighbour (an empty neighbour
    /// always makes a move legal and is checked by the caller before this
    /// is consulted). Implements spec.md §4.4.3 / original_source
    /// `Pattern3x3::IsLegal`: legal if some opponent neighbour is in atari,
    /// or some own neighbour is *not* in atari.
    ///
    /// This is computed directly rather than via a precomputed 2^24-entry
    /// table: per spec.md §9's open question, the exhaustive precomputation
    /// is authoritative for legality, and a direct formula over the same 4
    /// cardinal-neighbour fields is exactly that precomputation evaluated
    /// on demand, with no file-sourced overlay involved.
    pub fn legal(self, side: Color) -> bool {
        if self.count(Color::Empty) > 0 {
            return true;
        }

        let other = !side;
        let mut own_count = 0;
        let mut own_atari = 0;
        let mut other_atari = 0;

        for dir in 0..4 {
            let c = self.color_at(dir);

            if c == side {
                own_count += 1;
                if self.is_atari(dir) {
                    own_atari += 1;
                }
            } else if c == other && self.is_atari(dir) {
                other_atari += 1;
            }
        }

        other_atari > 0 || own_atari < own_count
    }

    /// Rollout move-selection weight for `side`; `restore=true` returns the
    /// multiplicative inverse so a prior contribution can be undone when a
    /// neighbour's pattern changes (spec.md §4.2 `prob`).
    pub fn prob(self, side: Color, restore: bool) -> f64 {
        let weight = tables::PROB_PTN3X3.weight(self, side);

        if restore { weight.recip() } else { weight }
    }

    fn permute(self, dirs: &[usize; 12], atari: &[usize; 4]) -> Pattern {
        let mut out = Pattern::new();

        for dir in 0..12 {
            out.set_color(dirs[dir], self.color_at(dir));
        }

        for dir in 0..4 {
            if self.is_atari(dir) {
                out.set_atari(atari[dir]);
            } else if self.is_pre_atari(dir) {
                out.set_pre_atari(atari[dir]);
            }
        }

        out
    }

    /// Rotates this pattern a quarter turn clockwise.
    pub fn rotate(self) -> Pattern {
        self.permute(&ROTATE_DIRS, &ROTATE_ATARI)
    }

    fn mirror(self) -> Pattern {
        self.permute(&MIRROR_DIRS, &MIRROR_ATARI)
    }

    /// Swaps black and white everywhere in the pattern; atari flags are
    /// unaffected since they describe group state, not color.
    pub fn invert(self) -> Pattern {
        let mut out = self;
        out.bf &= 0xFF00_0000;

        for dir in 0..12 {
            let c = match self.color_at(dir) {
                Color::Black => Color::White,
                Color::White => Color::Black,
                other => other,
            };

            out.set_color(dir, c);
        }

        out
    }

    /// The lexicographically-smallest pattern among the 8 rotations and
    /// reflections of `self`, used to key the trained probability tables
    /// with one canonical orientation (spec.md §4.2 `canonical`).
    pub fn canonical(self) -> Pattern {
        let mut best = self;
        let mut current = self;

        for i in 0..8 {
            if i == 4 {
                current = current.mirror();
            }

            if current.bf < best.bf {
                best = current;
            }

            current = current.rotate();
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_color_round_trips() {
        let mut p = Pattern::new();
        p.set_color(DIR_N, Color::Black);
        p.set_color(DIR_E, Color::White);
        p.set_color(DIR_U2, Color::Wall);

        assert_eq!(p.color_at(DIR_N), Color::Black);
        assert_eq!(p.color_at(DIR_E), Color::White);
        assert_eq!(p.color_at(DIR_U2), Color::Wall);
        assert_eq!(p.color_at(DIR_S), Color::Empty);
    }

    #[test]
    fn legal_with_empty_neighbour() {
        let p = Pattern::new();
        assert!(p.legal(Color::Black));
    }

    #[test]
    fn illegal_self_atari_with_no_opponent_atari() {
        let mut p = Pattern::new();

        for dir in 0..4 {
            p.set_color(dir, Color::Black);
            p.set_atari(dir);
        }

        assert!(!p.legal(Color::Black));
    }

    #[test]
    fn legal_if_opponent_neighbour_is_in_atari() {
        let mut p = Pattern::new();

        for dir in 0..4 {
            p.set_color(dir, Color::Black);
            p.set_atari(dir);
        }
        p.set_color(DIR_N, Color::White);
        p.set_atari(DIR_N);

        assert!(p.legal(Color::Black));
    }

    #[test]
    fn rotate_four_times_is_identity() {
        let mut p = Pattern::new();
        p.set_color(DIR_N, Color::Black);
        p.set_color(DIR_NE, Color::White);
        p.set_atari(DIR_E);

        let rotated = p.rotate().rotate().rotate().rotate();
        assert_eq!(rotated, p);
    }

    #[test]
    fn invert_swaps_colors_but_not_atari() {
        let mut p = Pattern::new();
        p.set_color(DIR_N, Color::Black);
        p.set_atari(DIR_N);

        let inverted = p.invert();
        assert_eq!(inverted.color_at(DIR_N), Color::White);
        assert!(inverted.is_atari(DIR_N));
    }

    #[test]
    fn canonical_is_invariant_under_rotation() {
        let mut p = Pattern::new();
        p.set_color(DIR_N, Color::Black);
        p.set_color(DIR_E, Color::White);

        assert_eq!(p.canonical(), p.rotate().canonical());
        assert_eq!(p.canonical(), p.mirror().canonical());
    }

    #[test]
    fn enclosed_by_counts_walls() {
        let mut p = Pattern::new();

        for dir in 0..4 {
            p.set_color(dir, Color::Wall);
        }

        assert!(p.enclosed_by(Color::Black));
        assert!(p.enclosed_by(Color::White));
    }
}
