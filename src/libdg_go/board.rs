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
// The board: stone placement, group/liberty bookkeeping, ko, seki, nakade
// response hints, and ladder search (spec.md §4.1, §4.4). Scoring (ownership
// rollouts, dame-filling) lives one level up, in the search crate, since it
// needs the policy/value evaluator this crate does not depend on; this
// module only exposes the primitives -- `is_eye`, `is_seki`, groups,
// legality -- that scoring is built from.

use std::collections::HashSet;

use dg_utils::config::{RepetitionRule, Rule};
use dg_utils::Error;

use crate::color::Color;
use crate::group::GroupTable;
use crate::nakade;
use crate::pattern::Pattern;
use crate::point::{all_vertices, vertex_to_string, COORD, EXT_AREA, NULL, PASS, Vertex};

/// How thoroughly a move updates the board's auxiliary state. Every mode
/// applies the same stone/group/zobrist update and the same near-neighbour
/// pattern refresh; they differ only in whether a `Diff` is produced and
/// whether the rollout-prior product is updated (spec.md §4.4.1):
///
/// | mode       | diff | rollout prior |
/// |------------|------|----------------|
/// | `Rollout`  | no   | yes            |
/// | `OneWay`   | no   | yes            |
/// | `Reversible` | yes | yes          |
/// | `Quick`    | yes  | no             |
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveMode {
    /// Used by the in-tree-search rollout policy; updates `rollout_prior`
    /// but produces no `Diff` since a playout never needs to be undone.
    Rollout,
    /// The cheapest mode that still keeps the board legal for the rest of
    /// the game: no `Diff` is produced, so the move cannot be undone.
    OneWay,
    /// Returns a `Diff` so the move can be undone with `Board::undo`. Used
    /// by tactical search (MCTS descent).
    Reversible,
    /// Returns a `Diff` like `Reversible`, but skips the rollout-prior
    /// update, since ladder search plays moves that are never actually
    /// part of a rollout. Used by `is_ladder_capture`/`ladder_escapes`.
    Quick,
}

const MAX_LADDER_DEPTH: usize = 2 * EXT_AREA;

/// Bound on how many recent positions `key_history` keeps, spec.md §4.4.3's
/// "8-deep" positional-superko window.
const MAX_KEY_HISTORY: usize = 8;

/// Outcome of probing whether a candidate move would recreate an earlier
/// position, spec.md §4.4.3/§7: repetition is legal at the board layer, and
/// is instead flagged to the caller (the search tree) as a terminal result.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RepetitionOutcome {
    /// The move does not recreate any of the last `MAX_KEY_HISTORY`
    /// positions.
    None,
    /// `RepetitionRule::Draw`: the game ends drawn.
    Draw,
    /// `RepetitionRule::SuperKo`: the move is a loss for whoever plays it.
    Loss,
}

#[derive(Clone)]
pub struct Diff {
    color: Vec<Color>,
    ptn: Vec<Pattern>,
    groups: GroupTable,
    zobrist_key: u64,
    ko: Vertex,
    to_move: Color,
    passes: u32,
    captures: [u32; 2],
    move_number: u32,
    rollout_prior: f64,
    key_history: Vec<u64>,
    response_move: [Vertex; 4],
}

#[derive(Clone)]
pub struct Board {
    color: Vec<Color>,
    ptn: Vec<Pattern>,
    groups: GroupTable,
    zobrist_key: u64,
    to_move: Color,
    ko: Vertex,
    history: Vec<u64>,
    /// The last `MAX_KEY_HISTORY` positions, used by `check_repetition`.
    /// Separate from `history` (which never shrinks, since `unique_positions`
    /// needs the whole game) so the repetition check stays O(1) per probe.
    key_history: Vec<u64>,
    passes: u32,
    captures: [u32; 2],
    move_number: u32,
    rollout_prior: f64,
    /// Four standing move hints refreshed on every `play`, spec.md §3:
    /// `[0]` the nakade vital point of whatever this move just captured;
    /// `[1]` left unset -- distinguishing a genuine counter-capture from a
    /// plain escape needs cross-referencing every neighbouring group's atari
    /// state, not just this move's, and is not implemented;
    /// `[2]` the sole liberty of whatever opponent group this move just put
    /// in atari (the vertex a rollout would try to escape through);
    /// `[3]` the sole liberty of the mover's own group, if this move left it
    /// in atari and that liberty is not the new ko.
    response_move: [Vertex; 4],
    pub komi: f32,
    pub rule: Rule,
    pub repetition_rule: RepetitionRule,
}

impl Board {
    pub fn new(komi: f32) -> Self {
        let n = EXT_AREA + 2;
        let mut color = vec![Color::Wall; n];

        for v in all_vertices() {
            color[v as usize] = Color::Empty;
        }

        let mut board = Self {
            color,
            ptn: vec![Pattern::new(); n],
            groups: GroupTable::new(),
            zobrist_key: crate::zobrist::ZOBRIST.ko[NULL as usize],
            to_move: Color::Black,
            ko: NULL,
            history: Vec::new(),
            key_history: Vec::new(),
            passes: 0,
            captures: [0, 0],
            move_number: 0,
            rollout_prior: 1.0,
            response_move: [NULL; 4],
            komi,
            rule: Rule::Chinese,
            repetition_rule: RepetitionRule::SuperKo,
        };

        for v in all_vertices() {
            board.refresh_pattern(v);
        }
        board.history.push(board.zobrist_key);
        board.key_history.push(board.zobrist_key);
        board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn at(&self, v: Vertex) -> Color {
        self.color[v as usize]
    }

    pub fn ko(&self) -> Vertex {
        self.ko
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn is_two_passes(&self) -> bool {
        self.passes >= 2
    }

    pub fn captures(&self, color: Color) -> u32 {
        self.captures[color.index()]
    }

    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    pub fn pattern_at(&self, v: Vertex) -> Pattern {
        self.ptn[v as usize]
    }

    pub fn num_liberties(&self, v: Vertex) -> u32 {
        self.groups.num_liberties(v)
    }

    pub fn group_size(&self, v: Vertex) -> u32 {
        self.groups.size_of(v)
    }

    /// The `i`'th response-move hint set by the most recent `play` call
    /// (`NULL` if none applies), spec.md §3 `response_move[0..3]`.
    pub fn response_move(&self, i: usize) -> Vertex {
        self.response_move[i]
    }

    /// True iff `v` is empty and every one of its 8 near neighbours is
    /// either `color` or off-board, and at most one diagonal is held by the
    /// opponent (the usual "false eye" allowance) -- spec.md §4.4.3.
    pub fn is_eye(&self, v: Vertex, color: Color) -> bool {
        if self.color[v as usize] != Color::Empty {
            return false;
        }

        let ptn = self.ptn[v as usize];
        if !ptn.enclosed_by(color) {
            return false;
        }

        !self.is_false_eye(v, color)
    }

    /// A real eye becomes false if the opponent holds too many of the
    /// diagonal points (more than one away from the edge, any on the edge).
    pub fn is_false_eye(&self, v: Vertex, color: Color) -> bool {
        let ptn = self.ptn[v as usize];
        let opponent = !color;
        let hostile_diagonals = (4..8).filter(|&dir| ptn.color_at(dir) == opponent).count();
        let wall_diagonals = (4..8).filter(|&dir| ptn.color_at(dir) == Color::Wall).count();

        if wall_diagonals > 0 {
            hostile_diagonals > 0
        } else {
            hostile_diagonals >= 2
        }
    }

    /// Whether the empty point `v` is part of a seki: a mutual standoff
    /// where neither color can fill their shared liberties without putting
    /// their own group in atari, spec.md §4.4.3. Gathers every group of
    /// both colors touching `v`, pools their liberties, and disambiguates on
    /// how many liberties are actually shared.
    pub fn is_seki(&self, v: Vertex) -> bool {
        if self.color[v as usize] != Color::Empty {
            return false;
        }

        let mut black_groups = HashSet::new();
        let mut white_groups = HashSet::new();

        for &offset in COORD.cardinal.iter() {
            let w = neighbor(v, offset);
            match self.color[w as usize] {
                Color::Black => {
                    black_groups.insert(self.groups.find(w));
                }
                Color::White => {
                    white_groups.insert(self.groups.find(w));
                }
                _ => {}
            }
        }

        // A seki liberty is shared between groups of both colors; a point
        // that only touches one color (or none) is an eye or a dame, not a
        // capturing-race standoff.
        if black_groups.is_empty() || white_groups.is_empty() {
            return false;
        }

        let mut shared = HashSet::new();
        for &root in black_groups.iter().chain(white_groups.iter()) {
            for lib in self.groups.liberties_of(root).iter() {
                shared.insert(lib);
            }
        }

        match shared.len() {
            2 => {
                // The classic two-liberty race: filling either liberty is
                // self-atari for whoever plays it. A bent-four-in-the-corner
                // shape can look like this from one side, but that shape
                // only ever touches a single color, which is already
                // rejected above.
                let region: Vec<Vertex> = shared.iter().copied().collect();
                !nakade::is_bent_four_in_corner(&region)
            }
            3 => {
                // Three shared liberties are still a standoff unless at
                // least two of them are real eyes for one side, which would
                // let that side capture outright instead of staying in
                // seki.
                let region: Vec<Vertex> = shared.iter().copied().collect();
                region.iter().filter(|&&lib| self.is_eye(lib, Color::Black) || self.is_eye(lib, Color::White)).count() < 2
            }
            _ => false,
        }
    }

    pub fn is_legal(&self, color: Color, v: Vertex) -> bool {
        if v == PASS {
            return true;
        }
        if self.color[v as usize] != Color::Empty {
            return false;
        }
        if v == self.ko {
            return false;
        }

        self.ptn[v as usize].legal(color)
    }

    /// Whether playing `color` at `v` would recreate one of the last
    /// `MAX_KEY_HISTORY` positions, and if so what the search should do
    /// about it, per `repetition_rule` (spec.md §4.4.3, §7). Does not mutate
    /// `self`; `v == PASS` or an otherwise-illegal move is never a
    /// repetition by this definition (the plain ko check in `is_legal`
    /// already covers the single-position case).
    pub fn check_repetition(&self, color: Color, v: Vertex) -> RepetitionOutcome {
        if v == PASS || !self.is_legal(color, v) {
            return RepetitionOutcome::None;
        }

        let mut scratch = self.clone();
        if scratch.play(color, v, MoveMode::Quick).is_err() {
            return RepetitionOutcome::None;
        }

        let resulting_key = scratch.zobrist_key();
        if !self.key_history.contains(&resulting_key) {
            return RepetitionOutcome::None;
        }

        match self.repetition_rule {
            RepetitionRule::Draw => RepetitionOutcome::Draw,
            RepetitionRule::SuperKo => RepetitionOutcome::Loss,
            RepetitionRule::TrompTaylor => {
                let mover_stones = scratch.stones(color).count();
                let opponent_stones = scratch.stones(!color).count();

                if mover_stones >= opponent_stones {
                    RepetitionOutcome::Draw
                } else {
                    RepetitionOutcome::Loss
                }
            }
        }
    }

    /// Applies `color`'s move at `v`. Returns the pre-move snapshot when
    /// `mode` needs one (`Reversible`, `Quick`), so the caller can later call
    /// `undo`. Repetition is never rejected here -- spec.md §7 treats it as
    /// legal at this layer, to be resolved by the caller via
    /// `check_repetition`.
    pub fn play(&mut self, color: Color, v: Vertex, mode: MoveMode) -> Result<Option<Diff>, Error> {
        if v != PASS && !self.is_legal(color, v) {
            return Err(Error::IllegalMove { color: color.to_string(), vertex: vertex_to_string(v) });
        }

        let needs_diff = matches!(mode, MoveMode::Reversible | MoveMode::Quick);
        let snapshot = if needs_diff { Some(self.snapshot()) } else { None };

        self.response_move = [NULL; 4];

        if v == PASS {
            self.do_pass();
        } else {
            self.do_place(color, v, mode);
        }

        self.history.push(self.zobrist_key);
        self.key_history.push(self.zobrist_key);
        if self.key_history.len() > MAX_KEY_HISTORY {
            self.key_history.remove(0);
        }
        self.move_number += 1;

        Ok(snapshot)
    }

    pub fn undo(&mut self, diff: Diff) {
        self.restore(diff);
        self.history.pop();
        self.move_number -= 1;
    }

    fn do_pass(&mut self) {
        self.passes += 1;

        // The ko restriction only binds the very next move; a pass clears it.
        let old_ko = self.ko;
        self.ko = NULL;
        self.zobrist_key ^= crate::zobrist::ZOBRIST.ko[old_ko as usize];
        self.zobrist_key ^= crate::zobrist::ZOBRIST.ko[NULL as usize];

        self.zobrist_key ^= crate::zobrist::ZOBRIST.side;
        self.to_move = !self.to_move;
    }

    fn do_place(&mut self, color: Color, v: Vertex, mode: MoveMode) {
        let pre_pattern = self.ptn[v as usize];
        self.passes = 0;

        let old_ko = self.ko;
        self.ko = NULL;

        self.color[v as usize] = color;
        self.groups.reset(v);
        self.zobrist_key ^= crate::zobrist::ZOBRIST.of(color.index(), v);

        let neighbours = COORD.cardinal;
        let mut captured_single = NULL;
        let mut num_captured_stones = 0;
        let mut newly_atari_defender = NULL;

        for &offset in neighbours.iter() {
            let w = neighbor(v, offset);
            match self.color[w as usize] {
                c if c == !color => {
                    if self.groups.num_liberties(w) == 1 {
                        num_captured_stones += self.capture_group(w, &mut captured_single);
                    } else {
                        self.groups.remove_liberty(w, v);
                        if newly_atari_defender == NULL && self.groups.num_liberties(w) == 1 {
                            newly_atari_defender = w;
                        }
                    }
                }
                c if c == color => {
                    self.groups.merge(v, w);
                }
                _ => {}
            }
        }

        for &offset in neighbours.iter() {
            let w = neighbor(v, offset);
            if self.color[w as usize] == Color::Empty {
                self.groups.add_liberty(v, w);
            }
        }

        self.captures[color.index()] += num_captured_stones;

        if num_captured_stones == 1 && self.groups.size_of(v) == 1 && self.groups.num_liberties(v) == 1 {
            self.ko = captured_single;
        }

        self.zobrist_key ^= crate::zobrist::ZOBRIST.ko[old_ko as usize];
        self.zobrist_key ^= crate::zobrist::ZOBRIST.ko[self.ko as usize];
        self.zobrist_key ^= crate::zobrist::ZOBRIST.side;
        self.to_move = !color;

        if newly_atari_defender != NULL {
            if let Some(escape) = self.groups.liberties_of(newly_atari_defender).first() {
                self.response_move[2] = escape;
            }
        }

        if self.groups.num_liberties(v) == 1 {
            if let Some(save) = self.groups.liberties_of(v).first() {
                if save != self.ko {
                    self.response_move[3] = save;
                }
            }
        }

        self.refresh_pattern(v);
        for &offset in COORD.cardinal.iter().chain(COORD.diagonal.iter()) {
            self.refresh_pattern(neighbor(v, offset));
        }

        if mode != MoveMode::Quick {
            self.rollout_prior *= pre_pattern.prob(color, false);
        }
    }

    /// Removes the captured group rooted at (any member of) `w`, crediting
    /// its vertex count to the caller and, if it was a single stone,
    /// recording it in `captured_single` for the ko check. A captured group
    /// of 3-6 stones leaves behind a dead shape small enough to have a
    /// nakade vital point, which becomes `response_move[0]` (spec.md §4.4.4).
    fn capture_group(&mut self, w: Vertex, captured_single: &mut Vertex) -> u32 {
        let members: Vec<Vertex> = self.groups.iter_members(w).collect();
        let color = self.color[w as usize];

        if members.len() == 1 {
            *captured_single = w;
        } else if let Some(vital) = nakade::vital_point(&members) {
            self.response_move[0] = vital;
        }

        for &m in &members {
            self.color[m as usize] = Color::Empty;
            self.zobrist_key ^= crate::zobrist::ZOBRIST.of(color.index(), m);
        }

        for &m in &members {
            self.groups.reset(m);
            self.refresh_pattern(m);

            for &offset in COORD.cardinal.iter() {
                let n = neighbor(m, offset);
                if self.color[n as usize] != Color::Empty && self.color[n as usize] != Color::Wall {
                    self.groups.add_liberty(n, m);
                    self.refresh_pattern(n);
                }
            }
        }

        members.len() as u32
    }

    /// Recomputes `ptn[v]` directly from the color array, rather than
    /// twiddling individual bits, trading a handful of extra comparisons
    /// for a representation that can never drift out of sync with `color`.
    fn refresh_pattern(&mut self, v: Vertex) {
        if self.color[v as usize] == Color::Wall {
            return;
        }

        let mut ptn = Pattern::new();
        let dirs = COORD.cardinal.iter().chain(COORD.diagonal.iter()).chain(COORD.far_cardinal.iter());

        for (dir, &offset) in dirs.enumerate() {
            let w = neighbor(v, offset);
            ptn.set_color(dir, self.color[w as usize]);
        }

        for (dir, &offset) in COORD.cardinal.iter().enumerate() {
            let w = neighbor(v, offset);
            if self.color[w as usize].is_stone() {
                match self.groups.num_liberties(w) {
                    0 => {}
                    1 => ptn.set_atari(dir),
                    2 => ptn.set_pre_atari(dir),
                    _ => {}
                }
            }
        }

        self.ptn[v as usize] = ptn;
    }

    fn snapshot(&self) -> Diff {
        Diff {
            color: self.color.clone(),
            ptn: self.ptn.clone(),
            groups: self.groups.clone(),
            zobrist_key: self.zobrist_key,
            ko: self.ko,
            to_move: self.to_move,
            passes: self.passes,
            captures: self.captures,
            move_number: self.move_number,
            rollout_prior: self.rollout_prior,
            key_history: self.key_history.clone(),
            response_move: self.response_move,
        }
    }

    fn restore(&mut self, diff: Diff) {
        self.color = diff.color;
        self.ptn = diff.ptn;
        self.groups = diff.groups;
        self.zobrist_key = diff.zobrist_key;
        self.ko = diff.ko;
        self.to_move = diff.to_move;
        self.passes = diff.passes;
        self.captures = diff.captures;
        self.move_number = diff.move_number;
        self.rollout_prior = diff.rollout_prior;
        self.key_history = diff.key_history;
        self.response_move = diff.response_move;
    }

    pub fn reset_rollout_prior(&mut self) {
        self.rollout_prior = 1.0;
    }

    pub fn rollout_prior(&self) -> f64 {
        self.rollout_prior
    }

    pub fn stones(&self, color: Color) -> impl Iterator<Item = Vertex> + '_ {
        all_vertices().filter(move |&v| self.color[v as usize] == color)
    }

    /// True iff `attacker` can capture the group at `v` (which must be in
    /// atari) with a forcing ladder sequence, grounded in the
    /// quick-reject-then-search shape of original_source's
    /// `pattern3x3.h::IsLadder`: bail immediately if the group already has
    /// room to run, otherwise play the chase out on a scratch copy of the
    /// board (spec.md §4.4.5).
    pub fn is_ladder_capture(&self, v: Vertex, attacker: Color) -> bool {
        if self.color[v as usize] != Color::Empty {
            return false;
        }

        let mut scratch = self.clone();
        self.try_ladder(&mut scratch, v, attacker, 0)
    }

    fn try_ladder(&self, board: &mut Board, liberty: Vertex, attacker: Color, depth: usize) -> bool {
        if depth >= MAX_LADDER_DEPTH {
            return false;
        }
        if !board.is_legal(attacker, liberty) {
            return false;
        }

        let defender = !attacker;
        let diff = match board.play(attacker, liberty, MoveMode::Quick) {
            Ok(diff) => diff,
            Err(_) => return false,
        };

        let defender_group = COORD.cardinal.iter().map(|&o| neighbor(liberty, o)).find(|&w| board.at(w) == defender);

        let captured = match defender_group {
            None => true,
            Some(w) => match board.num_liberties(w) {
                0 => true,
                1 => {
                    let escape = board.groups.liberties_of(w).first().unwrap();
                    self.try_ladder(board, escape, attacker, depth + 1)
                }
                _ => false,
            },
        };

        if let Some(diff) = diff {
            board.undo(diff);
        }

        captured
    }

    /// Empty vertices where a ladder chase forces a capture at least
    /// `min_depth` plies deep, for either color, spec.md §4.4.5. A defender
    /// group already down to one or two liberties adjacent to the candidate
    /// is the cheap precondition worth bothering to search; everything else
    /// cannot possibly be a ladder.
    pub fn ladder_escapes(&self, min_depth: usize) -> HashSet<Vertex> {
        let mut result = HashSet::new();

        for v in all_vertices() {
            if self.color[v as usize] != Color::Empty {
                continue;
            }

            for &attacker in &[Color::Black, Color::White] {
                let defender = !attacker;

                if !self.is_legal(attacker, v) {
                    continue;
                }

                let defender_neighbor_libs = COORD
                    .cardinal
                    .iter()
                    .map(|&o| neighbor(v, o))
                    .filter(|&w| self.color[w as usize] == defender)
                    .map(|w| self.groups.num_liberties(w))
                    .min();

                if !matches!(defender_neighbor_libs, Some(1) | Some(2)) {
                    continue;
                }

                let mut scratch = self.clone();
                let mut path = HashSet::new();
                let (captured, depth) = self.try_ladder_path(&mut scratch, v, attacker, 0, &mut path);

                if captured && depth + 1 >= min_depth {
                    result.extend(path);
                }
            }
        }

        result
    }

    fn try_ladder_path(&self, board: &mut Board, liberty: Vertex, attacker: Color, depth: usize, path: &mut HashSet<Vertex>) -> (bool, usize) {
        if depth >= MAX_LADDER_DEPTH {
            return (false, depth);
        }
        if !board.is_legal(attacker, liberty) {
            return (false, depth);
        }

        path.insert(liberty);

        let defender = !attacker;
        let diff = match board.play(attacker, liberty, MoveMode::Quick) {
            Ok(diff) => diff,
            Err(_) => return (false, depth),
        };

        let defender_group = COORD.cardinal.iter().map(|&o| neighbor(liberty, o)).find(|&w| board.at(w) == defender);

        let (captured, reached) = match defender_group {
            None => (true, depth),
            Some(w) => match board.num_liberties(w) {
                0 => (true, depth),
                1 => {
                    let escape = board.groups.liberties_of(w).first().unwrap();
                    self.try_ladder_path(board, escape, attacker, depth + 1, path)
                }
                _ => (false, depth),
            },
        };

        if let Some(diff) = diff {
            board.undo(diff);
        }

        (captured, reached)
    }
}

#[inline]
fn neighbor(v: Vertex, offset: isize) -> Vertex {
    (v as isize + offset) as Vertex
}

/// Positions reached in a game so far, used by the `SuperKo` repetition rule.
/// Exposed separately from `Board::history` so callers (e.g. a text-protocol
/// front-end replaying a game log) can rebuild it without re-deriving it
/// from scratch each time.
pub fn unique_positions(keys: &[u64]) -> HashSet<u64> {
    keys.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_with_black_to_move() {
        let board = Board::new(7.5);

        assert_eq!(board.to_move(), Color::Black);
        for v in all_vertices() {
            assert_eq!(board.at(v), Color::Empty);
        }
    }

    #[test]
    fn single_stone_capture_sets_ko() {
        let mut board = Board::new(7.5);
        let center = COORD.from_xy(4, 4);
        let n = neighbor(center, COORD.up);
        let e = neighbor(center, COORD.right);
        let s = neighbor(center, COORD.down);
        let w = neighbor(center, COORD.left);

        // A lone white stone at `center` is surrounded by black on 3 sides
        // and, once black also plays `w`, has no liberties left. `w` itself
        // is boxed in by white on every side but `center`, so capturing
        // leaves it with exactly one liberty: a textbook ko.
        board.play(Color::White, center, MoveMode::OneWay).unwrap();
        board.play(Color::Black, n, MoveMode::OneWay).unwrap();
        board.play(Color::Black, e, MoveMode::OneWay).unwrap();
        board.play(Color::Black, s, MoveMode::OneWay).unwrap();
        board.play(Color::White, neighbor(w, COORD.up), MoveMode::OneWay).unwrap();
        board.play(Color::White, neighbor(w, COORD.down), MoveMode::OneWay).unwrap();
        board.play(Color::White, neighbor(w, COORD.left), MoveMode::OneWay).unwrap();
        board.play(Color::Black, w, MoveMode::OneWay).unwrap();

        assert_eq!(board.at(center), Color::Empty);
        assert_eq!(board.captures(Color::Black), 1);
        assert_eq!(board.ko(), center);
        assert!(!board.is_legal(Color::White, center));
    }

    #[test]
    fn suicide_is_illegal() {
        let mut board = Board::new(7.5);
        let center = COORD.from_xy(4, 4);

        for &offset in COORD.cardinal.iter() {
            board.play(Color::Black, neighbor(center, offset), MoveMode::OneWay).unwrap();
        }
        board.play(Color::Black, COORD.from_xy(0, 0), MoveMode::OneWay).unwrap();

        assert!(!board.is_legal(Color::White, center));
    }

    #[test]
    fn reversible_play_can_be_undone() {
        let mut board = Board::new(7.5);
        let v = COORD.from_xy(3, 3);
        let before = board.zobrist_key();

        let diff = board.play(Color::Black, v, MoveMode::Reversible).unwrap().unwrap();
        assert_eq!(board.at(v), Color::Black);

        board.undo(diff);
        assert_eq!(board.at(v), Color::Empty);
        assert_eq!(board.zobrist_key(), before);
    }

    #[test]
    fn two_passes_end_the_game() {
        let mut board = Board::new(7.5);

        board.play(Color::Black, PASS, MoveMode::OneWay).unwrap();
        board.play(Color::White, PASS, MoveMode::OneWay).unwrap();

        assert!(board.is_two_passes());
    }

    #[test]
    fn corner_eye_is_recognised() {
        let mut board = Board::new(7.5);
        let corner = COORD.from_xy(0, 0);

        board.play(Color::Black, neighbor(corner, COORD.right), MoveMode::OneWay).unwrap();
        board.play(Color::Black, neighbor(corner, COORD.up), MoveMode::OneWay).unwrap();
        board.play(Color::Black, neighbor(corner, COORD.up + COORD.right), MoveMode::OneWay).unwrap();

        assert!(board.is_eye(corner, Color::Black));
        assert!(!board.is_eye(corner, Color::White));
    }

    #[test]
    fn is_seki_is_false_for_a_plain_eye() {
        let mut board = Board::new(7.5);
        let corner = COORD.from_xy(0, 0);

        board.play(Color::Black, neighbor(corner, COORD.right), MoveMode::OneWay).unwrap();
        board.play(Color::Black, neighbor(corner, COORD.up), MoveMode::OneWay).unwrap();
        board.play(Color::Black, neighbor(corner, COORD.up + COORD.right), MoveMode::OneWay).unwrap();

        assert!(!board.is_seki(corner));
    }

    #[test]
    fn ladder_escapes_contains_the_capturing_point() {
        let mut board = Board::new(7.5);
        let center = COORD.from_xy(10, 10);
        let n = neighbor(center, COORD.up);
        let e = neighbor(center, COORD.right);
        let s = neighbor(center, COORD.down);
        let w = neighbor(center, COORD.left);

        board.play(Color::White, center, MoveMode::OneWay).unwrap();
        board.play(Color::Black, n, MoveMode::OneWay).unwrap();
        board.play(Color::Black, e, MoveMode::OneWay).unwrap();
        board.play(Color::Black, s, MoveMode::OneWay).unwrap();

        let escapes = board.ladder_escapes(1);
        assert!(escapes.contains(&w));
    }

    #[test]
    fn capturing_a_straight_three_sets_the_nakade_response_move() {
        let mut board = Board::new(7.5);
        let a = COORD.from_xy(3, 3);
        let b = COORD.from_xy(4, 3);
        let c = COORD.from_xy(5, 3);

        board.play(Color::White, a, MoveMode::OneWay).unwrap();
        board.play(Color::White, b, MoveMode::OneWay).unwrap();
        board.play(Color::White, c, MoveMode::OneWay).unwrap();

        for &v in &[
            neighbor(a, COORD.up),
            neighbor(a, COORD.down),
            neighbor(a, COORD.left),
            neighbor(b, COORD.up),
            neighbor(b, COORD.down),
            neighbor(c, COORD.up),
            neighbor(c, COORD.down),
        ] {
            board.play(Color::Black, v, MoveMode::OneWay).unwrap();
        }

        assert_eq!(board.at(a), Color::White);
        board.play(Color::Black, neighbor(c, COORD.right), MoveMode::OneWay).unwrap();

        assert_eq!(board.at(a), Color::Empty);
        assert_eq!(board.at(b), Color::Empty);
        assert_eq!(board.at(c), Color::Empty);
        assert_eq!(board.response_move(0), b);
    }

    #[test]
    fn check_repetition_is_none_for_a_fresh_position() {
        let board = Board::new(7.5);
        let v = COORD.from_xy(3, 3);

        assert_eq!(board.check_repetition(Color::Black, v), RepetitionOutcome::None);
    }
}
