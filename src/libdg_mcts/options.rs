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
// Search-time policy filtering, spec.md §4.8 "policy candidate". Two
// strategies are provided: the standard one only removes flatly illegal
// moves, the scoring one additionally removes moves into settled territory
// once the main search has finished, so a final "fill in the dame" pass
// does not spend visits refilling its own eyes.

use dg_go::{Board, Color, Vertex};
use dg_utils::config::Options;

fn lambda_schedule(ply: usize, lambda_init: f32, lambda_delta: f32, move_start: usize, move_end: usize) -> f32 {
    if move_end <= move_start || ply <= move_start {
        lambda_init
    } else if ply >= move_end {
        (lambda_init - lambda_delta).clamp(0.0, 1.0)
    } else {
        let t = (ply - move_start) as f32 / (move_end - move_start) as f32;
        (lambda_init - t * lambda_delta).clamp(0.0, 1.0)
    }
}

pub trait PolicyChecker {
    fn is_policy_candidate(&self, board: &Board, v: Vertex) -> bool;
}

pub trait SearchOptions: Send + Sync {
    fn policy_checker(&self, board: &Board, to_move: Color) -> Box<dyn PolicyChecker>;

    fn deterministic(&self) -> bool;

    fn num_workers(&self) -> usize;

    fn cp_init(&self) -> f32;
    fn cp_base(&self) -> f32;
    fn virtual_loss(&self) -> f32;
    fn ladder_reduction(&self) -> f32;

    /// The network-value weight at move `ply`, ramped linearly between
    /// `lambda_move_start` and `lambda_move_end`, spec.md §4.8.5.
    fn lambda(&self, ply: usize) -> f32;

    fn search_limit(&self) -> Option<usize>;
    fn resign_value(&self) -> f32;
    fn use_full_features(&self) -> bool;
}

pub struct StandardPolicyChecker {
    to_move: Color,
}

impl PolicyChecker for StandardPolicyChecker {
    fn is_policy_candidate(&self, board: &Board, v: Vertex) -> bool {
        v == dg_go::PASS || board.is_legal(self.to_move, v)
    }
}

#[derive(Clone)]
pub struct StandardSearch {
    num_workers: usize,
    cp_init: f32,
    cp_base: f32,
    virtual_loss: f32,
    ladder_reduction: f32,
    lambda_init: f32,
    lambda_delta: f32,
    lambda_move_start: usize,
    lambda_move_end: usize,
    search_limit: Option<usize>,
    resign_value: f32,
    use_full_features: bool,
    deterministic: bool,
}

impl StandardSearch {
    pub fn new(num_workers: usize) -> Self {
        Self::from_options(&Options { num_threads: num_workers, ..Options::default() })
    }

    pub fn from_options(options: &Options) -> Self {
        Self {
            num_workers: options.num_threads,
            cp_init: options.cp_init,
            cp_base: options.cp_base,
            virtual_loss: options.virtual_loss,
            ladder_reduction: options.ladder_reduction,
            lambda_init: options.lambda_init,
            lambda_delta: options.lambda_delta,
            lambda_move_start: options.lambda_move_start,
            lambda_move_end: options.lambda_move_end,
            search_limit: options.search_limit,
            resign_value: options.resign_value,
            use_full_features: options.use_full_features,
            deterministic: false,
        }
    }

    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }
}

impl SearchOptions for StandardSearch {
    fn policy_checker(&self, _board: &Board, to_move: Color) -> Box<dyn PolicyChecker> {
        Box::new(StandardPolicyChecker { to_move })
    }

    fn deterministic(&self) -> bool {
        self.deterministic
    }

    fn num_workers(&self) -> usize {
        self.num_workers
    }

    fn cp_init(&self) -> f32 {
        self.cp_init
    }

    fn cp_base(&self) -> f32 {
        self.cp_base
    }

    fn virtual_loss(&self) -> f32 {
        self.virtual_loss
    }

    fn ladder_reduction(&self) -> f32 {
        self.ladder_reduction
    }

    fn lambda(&self, ply: usize) -> f32 {
        lambda_schedule(ply, self.lambda_init, self.lambda_delta, self.lambda_move_start, self.lambda_move_end)
    }

    fn search_limit(&self) -> Option<usize> {
        self.search_limit
    }

    fn resign_value(&self) -> f32 {
        self.resign_value
    }

    fn use_full_features(&self) -> bool {
        self.use_full_features
    }
}

/// Excludes both player's eyes from the policy, as an approximation of
/// Benson-style unconditional-life detection: good enough to stop the
/// scoring pass from refilling its own territory, without the cost of a
/// full safety proof.
pub struct ScoringPolicyChecker {
    to_move: Color,
}

impl PolicyChecker for ScoringPolicyChecker {
    fn is_policy_candidate(&self, board: &Board, v: Vertex) -> bool {
        if v == dg_go::PASS {
            return true;
        }

        board.is_legal(self.to_move, v)
            && !board.is_eye(v, Color::Black)
            && !board.is_eye(v, Color::White)
    }
}

#[derive(Clone)]
pub struct ScoringSearch {
    inner: StandardSearch,
}

impl ScoringSearch {
    pub fn new(num_workers: usize) -> Self {
        Self { inner: StandardSearch::new(num_workers) }
    }
}

impl SearchOptions for ScoringSearch {
    fn policy_checker(&self, _board: &Board, to_move: Color) -> Box<dyn PolicyChecker> {
        Box::new(ScoringPolicyChecker { to_move })
    }

    fn deterministic(&self) -> bool {
        true
    }

    fn num_workers(&self) -> usize {
        self.inner.num_workers
    }

    fn cp_init(&self) -> f32 {
        self.inner.cp_init
    }

    fn cp_base(&self) -> f32 {
        self.inner.cp_base
    }

    fn virtual_loss(&self) -> f32 {
        self.inner.virtual_loss
    }

    fn ladder_reduction(&self) -> f32 {
        self.inner.ladder_reduction
    }

    fn lambda(&self, _ply: usize) -> f32 {
        // The scoring pass only ever runs after the main search has settled,
        // so it leans entirely on the (by-then trustworthy) network value.
        1.0
    }

    fn search_limit(&self) -> Option<usize> {
        self.inner.search_limit
    }

    fn resign_value(&self) -> f32 {
        self.inner.resign_value
    }

    fn use_full_features(&self) -> bool {
        self.inner.use_full_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_go::MoveMode;

    #[test]
    fn standard_checker_allows_pass() {
        let board = Board::new(7.5);
        let checker = StandardPolicyChecker { to_move: Color::Black };

        assert!(checker.is_policy_candidate(&board, dg_go::PASS));
    }

    #[test]
    fn scoring_checker_excludes_eyes() {
        let mut board = Board::new(7.5);
        let corner = dg_go::point::COORD.from_xy(0, 0);
        let right = dg_go::point::COORD.from_xy(1, 0);
        let up = dg_go::point::COORD.from_xy(0, 1);
        let diag = dg_go::point::COORD.from_xy(1, 1);

        board.play(Color::Black, right, MoveMode::OneWay).unwrap();
        board.play(Color::Black, up, MoveMode::OneWay).unwrap();
        board.play(Color::Black, diag, MoveMode::OneWay).unwrap();

        let checker = ScoringPolicyChecker { to_move: Color::Black };
        assert!(!checker.is_policy_candidate(&board, corner));
    }
}
