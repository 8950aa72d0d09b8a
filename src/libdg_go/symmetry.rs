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

use crate::point::{Vertex, RawVertex, BOARD_SIZE, COORD, PASS};

/// One of the 4 rotations x 2 reflections of the board (spec.md GLOSSARY,
/// "Symmetry index").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    Identity,
    Rot90,
    Rot180,
    Rot270,
    FlipLR,
    FlipUD,
    Transpose,
    TransposeAnti,
}

pub const ALL: [Transform; 8] = [
    Transform::Identity,
    Transform::Rot90,
    Transform::Rot180,
    Transform::Rot270,
    Transform::FlipLR,
    Transform::FlipUD,
    Transform::Transpose,
    Transform::TransposeAnti,
];

impl Transform {
    /// Applies this symmetry to a raw `(x, y)` coordinate pair.
    fn apply_xy(self, x: i32, y: i32) -> (i32, i32) {
        let n = BOARD_SIZE as i32 - 1;

        match self {
            Transform::Identity => (x, y),
            Transform::Rot90 => (y, n - x),
            Transform::Rot180 => (n - x, n - y),
            Transform::Rot270 => (n - y, x),
            Transform::FlipLR => (n - x, y),
            Transform::FlipUD => (x, n - y),
            Transform::Transpose => (y, x),
            Transform::TransposeAnti => (n - y, n - x),
        }
    }

    /// Applies this symmetry to a raw index.
    pub fn apply_raw(self, rv: RawVertex) -> RawVertex {
        let x = rv as i32 % BOARD_SIZE as i32;
        let y = rv as i32 / BOARD_SIZE as i32;
        let (tx, ty) = self.apply_xy(x, y);

        (ty * BOARD_SIZE as i32 + tx) as RawVertex
    }

    /// Applies this symmetry to a board vertex. `Pass` is always a fixed
    /// point of every symmetry.
    pub fn apply(self, v: Vertex) -> Vertex {
        if v == PASS {
            return PASS;
        }

        let (x, y) = COORD.xy(v);
        let (tx, ty) = self.apply_xy(x, y);

        COORD.from_xy(tx as usize, ty as usize)
    }

    pub fn inverse(self) -> Transform {
        match self {
            Transform::Rot90 => Transform::Rot270,
            Transform::Rot270 => Transform::Rot90,
            // every other symmetry (including Rot180) is its own inverse.
            other => other,
        }
    }
}

/// True iff the board is invariant under `t` -- i.e. applying `t` to every
/// stone yields the same position. Used to eliminate symmetric policy moves
/// early in the game (spec.md §4.5 "symmetry-aware" probing).
pub fn is_symmetric<F: Fn(Vertex) -> crate::Color>(at: F, t: Transform) -> bool {
    crate::point::all_vertices().all(|v| at(v) == at(t.apply(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_is_a_fixed_point() {
        for &t in ALL.iter() {
            assert_eq!(t.apply(PASS), PASS);
        }
    }

    #[test]
    fn round_trips_through_the_inverse() {
        for &t in ALL.iter() {
            for v in crate::point::all_vertices() {
                assert_eq!(t.inverse().apply(t.apply(v)), v);
            }
        }
    }

    #[test]
    fn identity_is_a_no_op() {
        for v in crate::point::all_vertices() {
            assert_eq!(Transform::Identity.apply(v), v);
        }
    }

    #[test]
    fn raw_and_vertex_agree() {
        for v in crate::point::all_vertices() {
            let rv = COORD.to_raw(v).unwrap();

            for &t in ALL.iter() {
                let via_vertex = COORD.to_raw(t.apply(v)).unwrap();
                let via_raw = t.apply_raw(rv);

                assert_eq!(via_vertex, via_raw);
            }
        }
    }
}
