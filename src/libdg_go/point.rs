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
// Static, derived constants for one fixed board size (spec.md §2.A,
// "Coordinate & Zobrist table"). The board size is a compile-time choice,
// following the teacher pack's feature-flag convention for this
// (`gyk-michi-rust`'s `board9x9`/`board13x13` features) rather than a
// runtime parameter, so that every array in `Board` can stay a fixed-size
// array with no per-position allocation.

use std::fmt;

#[cfg(feature = "board9x9")]
pub const BOARD_SIZE: usize = 9;
#[cfg(feature = "board13x13")]
pub const BOARD_SIZE: usize = 13;
#[cfg(not(any(feature = "board9x9", feature = "board13x13")))]
pub const BOARD_SIZE: usize = 19;

/// Side length of the expansion board: one extra `Wall` vertex on each edge
/// so neighbour lookups never need a bounds check (spec.md §3 "Vertex").
pub const EXT_SIZE: usize = BOARD_SIZE + 2;
pub const BOARD_AREA: usize = BOARD_SIZE * BOARD_SIZE;
pub const EXT_AREA: usize = EXT_SIZE * EXT_SIZE;

/// An index into the expansion board, `[0, EXT_AREA)`, plus `PASS` and
/// `NULL` sentinels above the board (spec.md §3 "Vertex").
pub type Vertex = u16;

pub const PASS: Vertex = EXT_AREA as Vertex;
pub const NULL: Vertex = PASS + 1;

/// The compact `[0, BOARD_AREA)` index used for network planes and file
/// formats (spec.md §3 "RawVertex").
pub type RawVertex = u16;

/// Compile-time neighbour offsets and coordinate conversions for the
/// expansion board.
pub struct CoordinateTable {
    pub up: isize,
    pub down: isize,
    pub right: isize,
    pub left: isize,
    /// The four cardinal offsets, in N/E/S/W order (matches `Pattern`'s bit
    /// layout in §4.2).
    pub cardinal: [isize; 4],
    /// The four diagonal offsets, in NW/NE/SE/SW order.
    pub diagonal: [isize; 4],
    /// The four two-step cardinal offsets (U²,R²,D²,L²) used by the "far
    /// neighbours" half of `Pattern`.
    pub far_cardinal: [isize; 4],
    /// `raw[v]` is the compact index of vertex `v`, or `BOARD_AREA` if `v`
    /// is off-board.
    pub raw: Vec<usize>,
    /// `vertex[rv]` is the expansion-board vertex of raw index `rv`.
    pub vertex: Vec<Vertex>,
    /// `xy[v] = (x, y)` in `[0, BOARD_SIZE)` coordinates.
    pub xy: Vec<(i32, i32)>,
    /// Chebyshev distance from `v` to the nearest edge (0 = on the edge).
    pub edge_distance: Vec<i32>,
}

impl CoordinateTable {
    fn new() -> Self {
        let ext = EXT_SIZE as isize;
        let up = ext;
        let down = -ext;
        let right = 1;
        let left = -1;

        let mut raw = vec![BOARD_AREA; EXT_AREA + 2];
        let mut vertex = vec![0 as Vertex; BOARD_AREA];
        let mut xy = vec![(0, 0); EXT_AREA + 2];
        let mut edge_distance = vec![0; EXT_AREA + 2];

        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let v = ((y + 1) * EXT_SIZE + (x + 1)) as Vertex;
                let rv = (y * BOARD_SIZE + x) as usize;

                raw[v as usize] = rv;
                vertex[rv] = v;
                xy[v as usize] = (x as i32, y as i32);

                let dist_x = x.min(BOARD_SIZE - 1 - x) as i32;
                let dist_y = y.min(BOARD_SIZE - 1 - y) as i32;
                edge_distance[v as usize] = dist_x.min(dist_y);
            }
        }

        Self {
            up,
            down,
            right,
            left,
            cardinal: [up, right, down, left],
            diagonal: [up + left, up + right, down + right, down + left],
            far_cardinal: [2 * up, 2 * right, 2 * down, 2 * left],
            raw,
            vertex,
            xy,
            edge_distance,
        }
    }

    pub fn to_raw(&self, v: Vertex) -> Option<RawVertex> {
        if v == PASS || v == NULL {
            None
        } else {
            let rv = self.raw[v as usize];

            if rv == BOARD_AREA { None } else { Some(rv as RawVertex) }
        }
    }

    pub fn from_xy(&self, x: usize, y: usize) -> Vertex {
        ((y + 1) * EXT_SIZE + (x + 1)) as Vertex
    }

    pub fn xy(&self, v: Vertex) -> (i32, i32) {
        self.xy[v as usize]
    }

    /// True for every vertex that is a star point on the board: the 3-3
    /// points, tengen, and their mirrors. The source's predicate for this
    /// mixes `||`/`&&` in a way that is ambiguous for non-19x19 boards
    /// (spec.md §9 open question); this makes the intent explicit instead
    /// of guessing at the original precedence.
    pub fn is_star_point(&self, v: Vertex) -> bool {
        let (x, y) = self.xy(v);
        let n = BOARD_SIZE as i32;
        let tengen = n / 2;

        if n >= 13 {
            let hoshi = [3, n - 4, tengen];

            hoshi.contains(&x) && hoshi.contains(&y) && !(x == tengen && y != tengen) && !(y == tengen && x != tengen) || (x == tengen && y == tengen)
        } else if n == 9 {
            let corner = [2, n - 3];

            (corner.contains(&x) && corner.contains(&y)) || (x == tengen && y == tengen)
        } else {
            false
        }
    }
}

lazy_static::lazy_static! {
    pub static ref COORD: CoordinateTable = CoordinateTable::new();
}

/// All valid (non-wall) vertices of the board, in raw order.
pub fn all_vertices() -> impl Iterator<Item = Vertex> {
    (0..BOARD_AREA).map(|rv| COORD.vertex[rv])
}

pub fn vertex_to_string(v: Vertex) -> String {
    if v == PASS {
        return "pass".to_string();
    } else if v == NULL {
        return "null".to_string();
    }

    const COLUMNS: &str = "ABCDEFGHJKLMNOPQRST";
    let (x, y) = COORD.xy(v);

    format!("{}{}", COLUMNS.as_bytes()[x as usize] as char, y + 1)
}

impl fmt::Display for CoordinateTable {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "CoordinateTable({}x{})", BOARD_SIZE, BOARD_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trips() {
        for v in all_vertices() {
            let rv = COORD.to_raw(v).unwrap();
            assert_eq!(COORD.vertex[rv as usize], v);
        }
    }

    #[test]
    fn pass_and_null_have_no_raw_index() {
        assert_eq!(COORD.to_raw(PASS), None);
        assert_eq!(COORD.to_raw(NULL), None);
    }

    #[test]
    fn corners_have_zero_edge_distance() {
        let corner = COORD.from_xy(0, 0);
        assert_eq!(COORD.edge_distance[corner as usize], 0);
    }

    #[test]
    fn tengen_has_the_largest_edge_distance() {
        let tengen = COORD.from_xy(BOARD_SIZE / 2, BOARD_SIZE / 2);
        let max_distance = all_vertices().map(|v| COORD.edge_distance[v as usize]).max().unwrap();

        assert_eq!(COORD.edge_distance[tengen as usize], max_distance);
    }
}
