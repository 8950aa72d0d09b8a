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
// Input feature planes handed to the (external) neural network, spec.md
// §4.6. Planes are laid out `[plane][y][x]`, each plane a flat `BOARD_AREA`
// run of `f32`, so the whole tensor is one contiguous `Vec<f32>` ready to be
// handed across the `Predictor` boundary.

use crate::board::{Board, MoveMode};
use crate::color::Color;
use crate::point::{all_vertices, BOARD_AREA, COORD, Vertex};
use crate::symmetry::Transform;

/// History-of-stones planes kept per color when `use_full_features` is off.
const NUM_HISTORY_STEPS: usize = 8;

/// Number of one-hot buckets used for liberty/capture-size/self-atari/
/// liberties-after counts: `[1, 2, .., 7, 8+]`.
const NUM_BUCKETS: usize = 8;

/// `2 * NUM_HISTORY_STEPS` stone-history planes, 2 constant side-to-move
/// planes, 4 bucketed-count categories (liberties, capture size, self-atari
/// size, liberties-after) of `NUM_BUCKETS` planes each, one ladder-escape
/// plane, and one sensibleness plane -- the 52 channels of spec.md §4.6.
pub const NUM_FEATURES_FULL: usize = 2 * NUM_HISTORY_STEPS + 2 + 4 * NUM_BUCKETS + 2;
pub const NUM_FEATURES_SMALL: usize = 2 * NUM_HISTORY_STEPS + 2;

/// One position's worth of history, most recent first, used to fill the
/// stone-history planes. `boards[0]` must be the current position.
pub struct History<'a> {
    pub boards: &'a [Board],
}

fn plane_mut(tensor: &mut [f32], plane: usize) -> &mut [f32] {
    &mut tensor[plane * BOARD_AREA..(plane + 1) * BOARD_AREA]
}

fn write_stone_plane(tensor: &mut [f32], plane: usize, board: &Board, color: Color, t: Transform) {
    let slice = plane_mut(tensor, plane);

    for v in all_vertices() {
        if board.at(v) == color {
            let rv = COORD.to_raw(t.apply(v)).unwrap();
            slice[rv as usize] = 1.0;
        }
    }
}

/// Maps a count in `1..` to one of `NUM_BUCKETS` buckets: `1 -> 0`, `2 -> 1`,
/// ..., `7 -> 6`, `8+ -> 7`.
fn bucket(n: u32) -> usize {
    (n.saturating_sub(1) as usize).min(NUM_BUCKETS - 1)
}

struct MoveEffect {
    captures: u32,
    liberties_after: u32,
    self_atari_size: Option<u32>,
}

/// What would happen if `to_move` played at the empty vertex `v`, found by
/// playing it out on a scratch copy and reading the result straight back off
/// -- the same scratch-and-discard idiom `Board::is_ladder_capture` uses,
/// since none of these three counts are otherwise tracked incrementally.
fn move_effect(current: &Board, to_move: Color, v: Vertex) -> Option<MoveEffect> {
    if !current.is_legal(to_move, v) {
        return None;
    }

    let mut scratch = current.clone();
    let captures_before = scratch.captures(to_move);
    scratch.play(to_move, v, MoveMode::Quick).ok()?;

    let captures = scratch.captures(to_move) - captures_before;
    let liberties_after = scratch.num_liberties(v);
    let self_atari_size = if liberties_after == 1 { Some(scratch.group_size(v)) } else { None };

    Some(MoveEffect { captures, liberties_after, self_atari_size })
}

/// Extracts the feature tensor for `to_move`, applying board symmetry `t` so
/// the same canonical orientation can be probed in `EvalCache` regardless of
/// which rotation the search happened to be looking at (spec.md §4.5).
pub fn extract(history: &History, to_move: Color, t: Transform, use_full_features: bool) -> Vec<f32> {
    let num_features = if use_full_features { NUM_FEATURES_FULL } else { NUM_FEATURES_SMALL };
    let mut tensor = vec![0.0f32; num_features * BOARD_AREA];
    let opponent = !to_move;

    for step in 0..NUM_HISTORY_STEPS {
        if let Some(board) = history.boards.get(step) {
            write_stone_plane(&mut tensor, 2 * step, board, to_move, t);
            write_stone_plane(&mut tensor, 2 * step + 1, board, opponent, t);
        }
    }

    let current = &history.boards[0];
    let mut plane = 2 * NUM_HISTORY_STEPS;

    // Two constant planes, one per color, rather than a single 0/1 plane --
    // the same "who is to move" fact is then visible to the network under
    // every rotation without relying on it to learn a sign convention.
    plane_mut(&mut tensor, plane).iter_mut().for_each(|x| *x = if to_move == Color::Black { 1.0 } else { 0.0 });
    plane += 1;
    plane_mut(&mut tensor, plane).iter_mut().for_each(|x| *x = if to_move == Color::White { 1.0 } else { 0.0 });
    plane += 1;

    if !use_full_features {
        return tensor;
    }

    let liberties_base = plane;
    for v in all_vertices() {
        if current.at(v).is_stone() {
            let b = bucket(current.num_liberties(v));
            let rv = COORD.to_raw(t.apply(v)).unwrap();
            plane_mut(&mut tensor, liberties_base + b)[rv as usize] = 1.0;
        }
    }
    plane += NUM_BUCKETS;

    let capture_base = plane;
    let self_atari_base = capture_base + NUM_BUCKETS;
    let liberties_after_base = self_atari_base + NUM_BUCKETS;

    for v in all_vertices() {
        if current.at(v) != Color::Empty {
            continue;
        }

        if let Some(effect) = move_effect(current, to_move, v) {
            let rv = COORD.to_raw(t.apply(v)).unwrap() as usize;

            if effect.captures > 0 {
                plane_mut(&mut tensor, capture_base + bucket(effect.captures))[rv] = 1.0;
            }
            if let Some(size) = effect.self_atari_size {
                plane_mut(&mut tensor, self_atari_base + bucket(size))[rv] = 1.0;
            }
            plane_mut(&mut tensor, liberties_after_base + bucket(effect.liberties_after))[rv] = 1.0;
        }
    }
    plane = liberties_after_base + NUM_BUCKETS;

    let ladder_plane = plane;
    for v in current.ladder_escapes(4) {
        if let Some(rv) = COORD.to_raw(t.apply(v)) {
            plane_mut(&mut tensor, ladder_plane)[rv as usize] = 1.0;
        }
    }
    plane += 1;

    let sensible_plane = plane;
    for v in all_vertices() {
        if current.at(v) == Color::Empty && current.is_legal(to_move, v) && !current.is_eye(v, to_move) {
            let rv = COORD.to_raw(t.apply(v)).unwrap();
            plane_mut(&mut tensor, sensible_plane)[rv as usize] = 1.0;
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_tensor_has_the_expected_length() {
        let board = Board::new(7.5);
        let history = History { boards: std::slice::from_ref(&board) };

        let small = extract(&history, Color::Black, Transform::Identity, false);
        assert_eq!(small.len(), NUM_FEATURES_SMALL * BOARD_AREA);

        let full = extract(&history, Color::Black, Transform::Identity, true);
        assert_eq!(full.len(), NUM_FEATURES_FULL * BOARD_AREA);
        assert_eq!(NUM_FEATURES_FULL, 52);
    }

    #[test]
    fn own_stone_plane_marks_the_played_vertex() {
        let mut board = Board::new(7.5);
        let v = COORD.from_xy(3, 3);
        board.play(Color::Black, v, MoveMode::OneWay).unwrap();

        let history = History { boards: std::slice::from_ref(&board) };
        let tensor = extract(&history, Color::Black, Transform::Identity, false);
        let rv = COORD.to_raw(v).unwrap();

        assert_eq!(tensor[rv as usize], 1.0);
    }

    #[test]
    fn full_features_mark_a_four_liberty_stone_in_bucket_three() {
        let mut board = Board::new(7.5);
        let v = COORD.from_xy(10, 10);
        board.play(Color::Black, v, MoveMode::OneWay).unwrap();

        let history = History { boards: std::slice::from_ref(&board) };
        let tensor = extract(&history, Color::Black, Transform::Identity, true);
        let rv = COORD.to_raw(v).unwrap() as usize;

        let liberties_base = 2 * NUM_HISTORY_STEPS + 2;
        assert_eq!(tensor[(liberties_base + 3) * BOARD_AREA + rv], 1.0);
    }

    #[test]
    fn full_features_mark_a_capturing_move() {
        let mut board = Board::new(7.5);
        let center = COORD.from_xy(4, 4);
        let n = COORD.from_xy(4, 5);
        let e = COORD.from_xy(5, 4);
        let s = COORD.from_xy(4, 3);
        let w = COORD.from_xy(3, 4);

        board.play(Color::White, center, MoveMode::OneWay).unwrap();
        board.play(Color::Black, n, MoveMode::OneWay).unwrap();
        board.play(Color::Black, e, MoveMode::OneWay).unwrap();
        board.play(Color::Black, s, MoveMode::OneWay).unwrap();

        let history = History { boards: std::slice::from_ref(&board) };
        let tensor = extract(&history, Color::Black, Transform::Identity, true);
        let rv = COORD.to_raw(w).unwrap() as usize;

        let capture_base = 2 * NUM_HISTORY_STEPS + 2 + NUM_BUCKETS;
        assert_eq!(tensor[capture_base * BOARD_AREA + rv], 1.0);
    }
}
