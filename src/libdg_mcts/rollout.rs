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
// The rollout policy shared by the `rollout_rate` half of PUCT's lambda
// blend (spec.md §4.8.1) and the scoring pass's ownership rollouts (spec.md
// §4.9 step 1). Candidates are weighted by their pattern-table prior
// (spec.md §4.2 `Pattern::prob`), which is the same weight `Board::play`
// accumulates into `rollout_prior` under `MoveMode::Rollout`.

use dg_go::point::{all_vertices, NULL};
use dg_go::{Board, Color, MoveMode, Vertex, PASS};
use rand::Rng;

/// Upper bound on a single rollout's length, generous enough that only a
/// position stuck in an unreachable repeating cycle would ever hit it.
pub const MAX_ROLLOUT_PLIES: usize = 3 * dg_go::point::BOARD_AREA;

/// Picks one legal move for `color`, weighted by rollout prior; Pass if no
/// non-eye-filling candidate exists. Plays the nakade vital point left by
/// the previous move's capture (`response_move[0]`) outright when one is
/// standing, rather than leaving it to chance (spec.md §4.4.4).
pub fn choose_move(board: &Board, color: Color, rng: &mut impl Rng) -> Vertex {
    let vital = board.response_move(0);
    if vital != NULL && board.at(vital) == Color::Empty && board.is_legal(color, vital) && !board.is_eye(vital, color) {
        return vital;
    }

    let mut candidates = Vec::new();
    let mut total_weight = 0.0f64;

    for v in all_vertices() {
        if board.at(v) == Color::Empty && !board.is_eye(v, color) && board.is_legal(color, v) {
            let weight = board.pattern_at(v).prob(color, false).max(1e-6);
            total_weight += weight;
            candidates.push((v, weight));
        }
    }

    if candidates.is_empty() {
        return PASS;
    }

    let mut pick = rng.gen::<f64>() * total_weight;

    for &(v, weight) in &candidates {
        if pick < weight {
            return v;
        }
        pick -= weight;
    }

    candidates.last().unwrap().0
}

/// Plays a full game out from `board` to two passes (or `max_plies`),
/// returning the terminal position.
pub fn playout(board: &Board, max_plies: usize, rng: &mut impl Rng) -> Board {
    let mut board = board.clone();
    let mut plies = 0;

    while !board.is_two_passes() && plies < max_plies {
        let color = board.to_move();
        let v = choose_move(&board, color, rng);
        let _ = board.play(color, v, MoveMode::Rollout);
        plies += 1;
    }

    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn playout_terminates_with_two_passes() {
        let board = Board::new(7.5);
        let mut rng = SmallRng::seed_from_u64(1);
        let result = playout(&board, MAX_ROLLOUT_PLIES, &mut rng);

        assert!(result.is_two_passes());
    }

    #[test]
    fn empty_board_eventually_passes() {
        let board = Board::new(7.5);
        let mut rng = SmallRng::seed_from_u64(7);
        let v = choose_move(&board, Color::Black, &mut rng);

        assert_ne!(v, PASS);
    }
}
