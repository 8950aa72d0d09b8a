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
// PUCT tree search, spec.md §4.8. `run` drives `options.num_workers()`
// threads, each repeatedly descending from the shared root until the time
// strategy says to stop; the only cross-thread contention is the per-child
// `Mutex` in `tree::ChildNode` (spec.md §5 "the only write contention is on
// each node's small mutex during expansion").

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use dg_go::point::{all_vertices, BOARD_AREA};
use dg_go::symmetry::Transform;
use dg_go::{Board, Color, MoveMode, RepetitionOutcome, Vertex, PASS};
use dg_nn::{EvalCache, EvalWorker, PredictResponse, Predictor};
use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::options::SearchOptions;
use crate::rollout::playout;
use crate::scoring::terminal_area_score;
use crate::time_control::{is_done, TimeStrategy};
use crate::tree::{Node, RootNode};

/// Caps how deep a single descent can go before the node's stored network
/// value is used instead, spec.md §4.8.2 step 4 "Ply cap".
const MAX_PLY: usize = 2 * BOARD_AREA;

fn features_for(board: &Board, to_move: Color, use_full_features: bool) -> Vec<f32> {
    let history = dg_go::features::History { boards: std::slice::from_ref(board) };
    dg_go::features::extract(&history, to_move, Transform::Identity, use_full_features)
}

pub(crate) fn evaluate<P: Predictor>(board: &Board, to_move: Color, predictor: &P, cache: &EvalCache, worker: &EvalWorker, use_full_features: bool) -> PredictResponse {
    let _ = predictor;

    if let Some(hit) = cache.probe(board.zobrist_key(), to_move, Transform::Identity) {
        return hit;
    }

    let features = features_for(board, to_move, use_full_features);
    let response = worker.submit(features);
    cache.insert(board.zobrist_key(), to_move, Transform::Identity, response.clone());
    response
}

/// Builds the legal-move list for a freshly expanded node: every candidate
/// the policy checker allows, paired with its network prior, with the
/// ladder-escape reduction of spec.md §4.8.6 applied to deprioritised
/// laddered stones.
pub(crate) fn legal_moves_with_priors(board: &Board, color: Color, options: &dyn SearchOptions, policy: &[f32]) -> Vec<(Vertex, f32)> {
    let checker = options.policy_checker(board, color);
    let mut moves = Vec::new();

    for v in all_vertices() {
        if !checker.is_policy_candidate(board, v) {
            continue;
        }

        let rv = dg_go::point::COORD.to_raw(v).unwrap() as usize;
        let mut prior = policy[rv].max(0.0);

        if board.is_ladder_capture(v, color) {
            prior *= options.ladder_reduction();
        }

        moves.push((v, prior));
    }

    if checker.is_policy_candidate(board, PASS) {
        moves.push((PASS, policy[BOARD_AREA].max(0.0)));
    }

    let total: f32 = moves.iter().map(|&(_, p)| p).sum();
    if total > 1e-6 {
        for (_, p) in moves.iter_mut() {
            *p /= total;
        }
    }

    moves
}

fn puct_cp(parent_count: f32, cp_init: f32, cp_base: f32) -> f32 {
    ((parent_count + cp_base) / cp_base).ln() + cp_init
}

/// Selects the child with the highest `q + u` score, spec.md §4.8.1.
fn select_child<'a>(node: &'a Node, lambda: f32, options: &dyn SearchOptions) -> usize {
    let parent_count = node.total_count() as f32;
    let cp = puct_cp(parent_count, options.cp_init(), options.cp_base());

    let visited: Vec<&'a crate::tree::ChildNode> = node.children.iter().filter(|c| c.count() > 0).collect();
    let fpu = if visited.is_empty() {
        node.value
    } else {
        let mean: f32 = visited.iter().map(|c| c.blended_rate(lambda)).sum::<f32>() / visited.len() as f32;
        mean - 0.1
    };

    let mut best_index = 0;
    let mut best_score = f32::NEG_INFINITY;

    for (i, child) in node.children.iter().enumerate() {
        let q = if child.count() == 0 { fpu } else { child.blended_rate(lambda) };
        let u = cp * child.prior * parent_count.sqrt() / (1.0 + child.count() as f32);
        let score = q + u;

        if score > best_score {
            best_score = score;
            best_index = i;
        }
    }

    best_index
}

/// One recursive descent from `node`, mutating `board` in lock-step and
/// undoing every move before returning. Returns `(value, rollout)` from
/// `node`'s side-to-move perspective, each in `[-1, 1]` -- the two halves of
/// `ChildNode::blended_rate`'s lambda blend, spec.md §4.8.1. `value` comes
/// from the network's evaluation of the position (or, at a terminal or
/// ply-capped position, the deterministic area score standing in for it);
/// `rollout` comes from actually playing a random game out to the end, so
/// the two genuinely disagree until the network has learned to predict
/// rollout outcomes.
#[allow(clippy::too_many_arguments)]
fn descend<P: Predictor>(
    node: &Node,
    board: &mut Board,
    options: &dyn SearchOptions,
    predictor: &P,
    cache: &EvalCache,
    worker: &EvalWorker,
    depth: usize,
    rng: &mut SmallRng,
) -> (f32, f32) {
    let lambda = options.lambda(board.move_number() as usize);
    let index = select_child(node, lambda, options);
    let child = &node.children[index];
    let virtual_loss = options.virtual_loss();
    child.add_virtual_loss(virtual_loss);

    let to_move = node.to_move;
    let vertex = child.vertex;
    let repetition = board.check_repetition(to_move, vertex);

    let (value, rollout) = if repetition != RepetitionOutcome::None {
        // Repetition is legal at the board layer (spec.md §7); it is this
        // layer's job to turn it into a terminal result instead of playing
        // the move out.
        let s = match repetition {
            RepetitionOutcome::Draw => 0.0,
            RepetitionOutcome::Loss => -1.0,
            RepetitionOutcome::None => unreachable!(),
        };
        (s, s)
    } else {
        match board.play(to_move, vertex, MoveMode::Reversible) {
        Err(_) => {
            // The policy checker is not a perfect legality filter, so an
            // illegal pick here is simply scored as a loss for the side that
            // chose it; no board mutation happened, nothing to undo.
            (-1.0, -1.0)
        }
        Ok(diff) => {
            let result = if board.is_two_passes() {
                let s = -terminal_area_score_signed(board, !to_move);
                (s, s)
            } else if depth + 1 >= MAX_PLY {
                // The ply cap is far beyond any game that isn't stuck in a
                // repeating cycle, so there is no stored node value to fall
                // back on yet; settle for the same cheap area score used at
                // a genuine terminal position.
                let s = -terminal_area_score_signed(board, !to_move);
                (s, s)
            } else if child.is_complete() {
                child
                    .with_next(|next| descend(next, board, options, predictor, cache, worker, depth + 1, rng))
                    .map(|(v, r)| (-v, -r))
                    .unwrap()
            } else if child.try_start_creation() {
                let opponent = !to_move;
                let response = evaluate(board, opponent, predictor, cache, worker, options.use_full_features());
                let moves = legal_moves_with_priors(board, opponent, options, response.policy());
                let value = 2.0 * response.value() - 1.0;
                let new_node = Node::new(opponent, value, moves);
                child.complete_creation(new_node);

                let rollout_result = playout(board, crate::rollout::MAX_ROLLOUT_PLIES, rng);
                let rollout_score = terminal_area_score_signed(&rollout_result, opponent);

                (-value, -rollout_score)
            } else {
                child.wait_for_complete();
                child
                    .with_next(|next| descend(next, board, options, predictor, cache, worker, depth + 1, rng))
                    .map(|(v, r)| (-v, -r))
                    .unwrap()
            };

            if let Some(diff) = diff {
                board.undo(diff);
            }

            result
        }
        }
    };

    child.backup(virtual_loss, value, rollout);
    (value, rollout)
}

fn terminal_area_score_signed(board: &Board, perspective: Color) -> f32 {
    let score = terminal_area_score(board);
    let signed = if perspective == Color::Black { score } else { -score };

    if signed > 0.0 {
        1.0
    } else if signed < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Drives `num_workers` descents in parallel until `time_strategy` reports
/// the search is done, spec.md §4.8.3.
pub fn run<P: Predictor + Sync + 'static>(
    root: &RootNode,
    board: &Board,
    options: &(dyn SearchOptions + Sync),
    time_strategy: &(dyn TimeStrategy + Sync),
    predictor: &P,
    cache: &EvalCache,
    worker: &EvalWorker,
) {
    let stop = Arc::new(AtomicBool::new(false));
    let num_workers = options.num_workers().max(1);

    thread::scope(|scope| {
        for i in 0..num_workers {
            let stop = stop.clone();
            let node = &root.node;

            scope.spawn(move || {
                let mut rng = SmallRng::seed_from_u64(0xd9a0_f00d ^ (i as u64));

                while !stop.load(Ordering::Acquire) {
                    let mut worker_board = board.clone();
                    descend(node, &mut worker_board, options, predictor, cache, worker, 0, &mut rng);
                }
            });
        }

        loop {
            if is_done(&root.node, time_strategy) {
                stop.store(true, Ordering::Release);
                break;
            }
            thread::yield_now();
        }
    });

    debug!("search finished with {} total playouts", root.node.total_count());
}
