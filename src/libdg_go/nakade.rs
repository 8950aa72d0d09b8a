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
// Static shape tables for nakade (dead-shape vital points) and bent-four in
// the corner, consulted by the search crate's end-of-game scoring -- they
// describe local shape only, so they live here next to `Pattern` rather than
// in the scoring module itself (spec.md §4.9 "nakade", "bent-four").

use crate::point::{BOARD_SIZE, COORD, Vertex};

/// A region's shape, normalized to its own bounding box's origin so it can
/// be looked up independent of where on the board it sits.
fn normalize(region: &[Vertex]) -> Vec<(i32, i32)> {
    let coords: Vec<(i32, i32)> = region.iter().map(|&v| COORD.xy(v)).collect();
    let min_x = coords.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let min_y = coords.iter().map(|&(_, y)| y).min().unwrap_or(0);

    let mut shifted: Vec<(i32, i32)> = coords.into_iter().map(|(x, y)| (x - min_x, y - min_y)).collect();
    shifted.sort();
    shifted
}

/// The 8 symmetries of a normalized shape, each re-normalized, so a shape
/// table lookup does not need to try every rotation/reflection itself.
fn canonical_shape(region: &[Vertex]) -> Vec<(i32, i32)> {
    let base = normalize(region);
    let transforms: [fn((i32, i32)) -> (i32, i32); 8] = [
        |(x, y)| (x, y),
        |(x, y)| (-x, y),
        |(x, y)| (x, -y),
        |(x, y)| (-x, -y),
        |(x, y)| (y, x),
        |(x, y)| (-y, x),
        |(x, y)| (y, -x),
        |(x, y)| (-y, -x),
    ];

    transforms
        .iter()
        .map(|t| {
            let mut points: Vec<(i32, i32)> = base.iter().map(|&p| t(p)).collect();
            let min_x = points.iter().map(|&(x, _)| x).min().unwrap();
            let min_y = points.iter().map(|&(_, y)| y).min().unwrap();
            for p in points.iter_mut() {
                *p = (p.0 - min_x, p.1 - min_y);
            }
            points.sort();
            points
        })
        .min()
        .unwrap()
}

/// Known nakade (unsettleable dead-shape) regions, indexed by their
/// canonical shape, with the vital point that kills the group if played (in
/// the same coordinate frame as the shape).
struct NakadeTable {
    shapes: Vec<(Vec<(i32, i32)>, (i32, i32))>,
}

impl NakadeTable {
    fn new() -> Self {
        let shapes = vec![
            // straight three
            (vec![(0, 0), (1, 0), (2, 0)], (1, 0)),
            // bent three (L-tromino)
            (vec![(0, 0), (1, 0), (0, 1)], (0, 0)),
            // square four
            (vec![(0, 0), (1, 0), (0, 1), (1, 1)], (0, 0)),
            // T-tetromino four
            (vec![(0, 0), (1, 0), (2, 0), (1, 1)], (1, 0)),
            // bent four (the non-corner L-tetromino)
            (vec![(0, 0), (1, 0), (2, 0), (2, 1)], (1, 0)),
            // pyramid five
            (vec![(0, 0), (1, 0), (2, 0), (1, 1), (1, -1)], (1, 0)),
            // bulky five (plus-shaped)
            (vec![(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)], (1, 1)),
        ];

        Self { shapes: shapes.into_iter().map(|(s, v)| (canonicalize_points(&s), v)).collect() }
    }

    fn vital_point_offset(&self, region: &[Vertex]) -> Option<(i32, i32)> {
        let shape = canonical_shape(region);

        self.shapes.iter().find(|(s, _)| *s == shape).map(|(_, v)| *v)
    }
}

fn canonicalize_points(points: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let min_x = points.iter().map(|&(x, _)| x).min().unwrap();
    let min_y = points.iter().map(|&(_, y)| y).min().unwrap();
    let mut shifted: Vec<_> = points.iter().map(|&(x, y)| (x - min_x, y - min_y)).collect();
    shifted.sort();
    shifted
}

lazy_static::lazy_static! {
    static ref NAKADE: NakadeTable = NakadeTable::new();
}

/// Returns the vital point of `region` (an enclosed empty area of dead
/// shape), if it is one of the recognized nakade shapes. `region` must be
/// the full set of vertices of a single connected empty area.
///
/// `canonical_shape` only tells us *that* some rotation/reflection of
/// `region` matches a table entry, not which one, so the point itself is
/// recovered separately as the member of `region` closest to its own
/// centroid -- every shape in the table happens to have its vital point
/// there, and it sidesteps inverting the matched symmetry.
pub fn vital_point(region: &[Vertex]) -> Option<Vertex> {
    if region.len() < 3 || region.len() > 6 {
        return None;
    }

    NAKADE.vital_point_offset(region)?;

    let cx = region.iter().map(|&v| COORD.xy(v).0).sum::<i32>() as f64 / region.len() as f64;
    let cy = region.iter().map(|&v| COORD.xy(v).1).sum::<i32>() as f64 / region.len() as f64;

    region.iter().copied().min_by(|&a, &b| {
        let (ax, ay) = COORD.xy(a);
        let (bx, by) = COORD.xy(b);
        let da = (ax as f64 - cx).powi(2) + (ay as f64 - cy).powi(2);
        let db = (bx as f64 - cx).powi(2) + (by as f64 - cy).powi(2);
        da.partial_cmp(&db).unwrap()
    })
}

/// True iff `region` is the classic bent-four-in-the-corner shape: four
/// points, bent (not a straight line or a square), touching two board
/// edges that meet at a corner. Under area-scoring rules this group is
/// alive unless played out, so scoring treats it specially (spec.md §4.9).
pub fn is_bent_four_in_corner(region: &[Vertex]) -> bool {
    if region.len() != 4 {
        return false;
    }

    let shape = canonical_shape(region);
    let bent_four = canonicalize_points(&[(0, 0), (1, 0), (2, 0), (2, 1)]);
    if shape != bent_four {
        return false;
    }

    let touches_edge = |axis: fn((i32, i32)) -> i32, limit: i32| region.iter().any(|&v| axis(COORD.xy(v)) == 0 || axis(COORD.xy(v)) == limit);
    let n = BOARD_SIZE as i32 - 1;

    touches_edge(|(x, _)| x, n) && touches_edge(|(_, y)| y, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_three_vital_point_is_the_middle() {
        let a = COORD.from_xy(3, 3);
        let b = COORD.from_xy(4, 3);
        let c = COORD.from_xy(5, 3);

        assert_eq!(vital_point(&[a, b, c]), Some(b));
    }

    #[test]
    fn square_four_is_recognised_as_nakade() {
        let region = [
            COORD.from_xy(3, 3),
            COORD.from_xy(4, 3),
            COORD.from_xy(3, 4),
            COORD.from_xy(4, 4),
        ];

        assert!(vital_point(&region).is_some());
    }

    #[test]
    fn unrecognized_shape_has_no_vital_point() {
        let region = [COORD.from_xy(3, 3), COORD.from_xy(10, 10)];

        assert_eq!(vital_point(&region), None);
    }

    #[test]
    fn corner_bent_four_is_recognised() {
        let region = [
            COORD.from_xy(0, 0),
            COORD.from_xy(1, 0),
            COORD.from_xy(0, 1),
            COORD.from_xy(0, 2),
        ];

        assert!(is_bent_four_in_corner(&region));
    }
}
