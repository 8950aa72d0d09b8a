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
// Neural-network-guided Monte Carlo tree search over a Go board. `dg_go`
// supplies the board and `dg_nn` the evaluation boundary; this crate only
// owns the tree, the PUCT descent, time management, and end-of-game scoring.

pub mod options;
pub mod rollout;
pub mod scoring;
pub mod search;
pub mod time_control;
pub mod tree;

use dg_go::{Board, Color, Vertex};
use dg_nn::{EvalCache, EvalWorker, Predictor};
use log::debug;
use rand::Rng;

use self::options::SearchOptions;
use self::search::{evaluate, legal_moves_with_priors};
use self::time_control::TimeStrategy;
use self::tree::{Node, RootNode};

/// Evaluates `board` and builds a freshly expanded root node from it --
/// the one place a `Node` is ever created without already being some other
/// node's child, spec.md §3 "Lifecycle".
fn expand_root<P: Predictor>(
    board: &Board,
    to_move: Color,
    predictor: &P,
    cache: &EvalCache,
    worker: &EvalWorker,
    options: &dyn SearchOptions,
) -> Node {
    let response = evaluate(board, to_move, predictor, cache, worker, options.use_full_features());
    let moves = legal_moves_with_priors(board, to_move, options, response.policy());
    let value = 2.0 * response.value() - 1.0;

    Node::new(to_move, value, moves)
}

/// Rebases `root` onto the position reached by playing `vertex`, reusing
/// that subtree's statistics if it was already expanded, spec.md §4.7
/// `ShiftRootNode`. `board` must already reflect the position *after*
/// `vertex` was played.
pub fn advance_root<P: Predictor>(
    root: RootNode,
    vertex: Vertex,
    board: &Board,
    predictor: &P,
    cache: &EvalCache,
    worker: &EvalWorker,
    options: &dyn SearchOptions,
) -> RootNode {
    let to_move = board.to_move();

    match root.shift(vertex) {
        Some(node) if node.to_move == to_move => RootNode::new(node),
        _ => RootNode::new(expand_root(board, to_move, predictor, cache, worker, options)),
    }
}

/// The result of one `generate_move` call. Callers hold on to `root` and
/// pass it back through `advance_root` once `vertex` has actually been
/// played, so the next search resumes from where this one left off instead
/// of starting cold.
pub struct GenMoveResult {
    pub vertex: Vertex,
    pub value: f32,
    pub resign: bool,
    pub root: RootNode,
}

/// Searches from `board` and picks a move for the side to move, spec.md
/// §4.8. `root` is the caller's previous search tree, already shifted with
/// `advance_root` to the current position, or `None` to start a fresh tree.
#[allow(clippy::too_many_arguments)]
pub fn generate_move<P: Predictor + Sync + 'static>(
    root: Option<RootNode>,
    board: &Board,
    predictor: &P,
    cache: &EvalCache,
    worker: &EvalWorker,
    options: &(dyn SearchOptions + Sync),
    time_strategy: &(dyn TimeStrategy + Sync),
    rng: &mut impl Rng,
) -> GenMoveResult {
    let to_move = board.to_move();
    let root = root.unwrap_or_else(|| RootNode::new(expand_root(board, to_move, predictor, cache, worker, options)));

    search::run(&root, board, options, time_strategy, predictor, cache, worker);

    let best = root.node.best();
    let mut vertex = root.node.children[best].vertex;
    let value = root.node.children[best].value_rate();
    let resign = value < options.resign_value();

    // A settled won position is still worth double-checking against the
    // scoring oracle even when the tree's top pick is a play -- PUCT has no
    // reason to prefer Pass once every point left on the board nets the
    // same score either way, spec.md §4.9.
    if vertex != dg_go::PASS && scoring::should_pass(board, vertex, rng) {
        vertex = dg_go::PASS;
    }

    debug!(
        "generate_move: {} (value {:.3}, {} playouts{})",
        dg_go::point::vertex_to_string(vertex),
        value,
        root.node.total_count(),
        if resign { ", resigning" } else { "" }
    );

    GenMoveResult { vertex, value, resign, root }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_nn::RandomPredictor;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use self::options::StandardSearch;
    use self::time_control::RolloutLimit;

    #[test]
    fn generate_move_on_empty_board_picks_a_legal_vertex() {
        let board = Board::new(7.5);
        let predictor = RandomPredictor::default();
        let cache = EvalCache::with_capacity(64);
        let worker = EvalWorker::spawn(predictor.clone(), 4);
        let options = StandardSearch::new(1);
        let time_strategy = RolloutLimit::new(16);
        let mut rng = SmallRng::seed_from_u64(42);

        let result = generate_move(None, &board, &predictor, &cache, &worker, &options, &time_strategy, &mut rng);

        assert!(result.vertex == dg_go::PASS || board.is_legal(Color::Black, result.vertex));
    }

    #[test]
    fn advance_root_without_prior_search_rebuilds_from_scratch() {
        let mut board = Board::new(7.5);
        let predictor = RandomPredictor::default();
        let cache = EvalCache::with_capacity(64);
        let worker = EvalWorker::spawn(predictor.clone(), 4);
        let options = StandardSearch::new(1);

        let root = RootNode::new(expand_root(&board, Color::Black, &predictor, &cache, &worker, &options));
        let vertex = dg_go::point::COORD.from_xy(3, 3);
        board.play(Color::Black, vertex, dg_go::MoveMode::OneWay).unwrap();

        let root = advance_root(root, vertex, &board, &predictor, &cache, &worker, &options);
        assert_eq!(root.node.to_move, Color::White);
    }
}
