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
// The search tree, spec.md §4.7. Each `Node` owns an array of `ChildNode`,
// one per legal move plus Pass. `ChildNode.next` is conceptually the single-
// writer owning pointer the spec describes; here it is a `Mutex<Option<Box<
// Node>>>` rather than a raw pointer guarded by a hand-rolled CAS, since Rust
// has no atomic `f32` and the short critical section a `Mutex` gives is the
// same one the spec already carves out for expansion. The visit/value
// accumulators live behind that same lock for the same reason -- a single
// short critical section per child, not lock-free atomics, but the same
// "only contention is on expansion" shape.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use crossbeam_utils::Backoff;
use dg_go::{Color, Vertex};

#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum CreationState {
    Initial = 0,
    Creating = 1,
    Complete = 2,
}

struct Stats {
    count: u32,
    value_sum: f32,
    rollout_count: u32,
    rollout_sum: f32,
}

impl Stats {
    fn new() -> Self {
        Self { count: 0, value_sum: 0.0, rollout_count: 0, rollout_sum: 0.0 }
    }
}

/// One legal move out of some `Node`, spec.md §2.I.
pub struct ChildNode {
    pub vertex: Vertex,
    pub prior: f32,
    stats: Mutex<Stats>,
    state: AtomicU8,
    next: Mutex<Option<Box<Node>>>,
}

impl ChildNode {
    pub fn new(vertex: Vertex, prior: f32) -> Self {
        Self {
            vertex,
            prior,
            stats: Mutex::new(Stats::new()),
            state: AtomicU8::new(CreationState::Initial as u8),
            next: Mutex::new(None),
        }
    }

    pub fn count(&self) -> u32 {
        self.stats.lock().unwrap().count
    }

    pub fn value_rate(&self) -> f32 {
        let stats = self.stats.lock().unwrap();
        if stats.count == 0 { 0.0 } else { stats.value_sum / stats.count as f32 }
    }

    pub fn rollout_rate(&self) -> f32 {
        let stats = self.stats.lock().unwrap();
        if stats.rollout_count == 0 { 0.0 } else { stats.rollout_sum / stats.rollout_count as f32 }
    }

    /// `(1-λ)·rollout_rate + λ·value_rate`, spec.md §4.8.1.
    pub fn blended_rate(&self, lambda: f32) -> f32 {
        (1.0 - lambda) * self.rollout_rate() + lambda * self.value_rate()
    }

    /// Adds `virtual_loss` to both accumulators, spec.md §4.8.2 step 2.
    pub fn add_virtual_loss(&self, virtual_loss: f32) {
        let mut stats = self.stats.lock().unwrap();
        stats.count += 1;
        stats.value_sum -= virtual_loss;
        stats.rollout_count += 1;
        stats.rollout_sum -= virtual_loss;
    }

    /// Cancels a previously applied virtual loss and records the observed
    /// `value`/`rollout` outcomes, spec.md §4.8.2 step 6 and INVARIANT I8.
    pub fn backup(&self, virtual_loss: f32, value: f32, rollout: f32) {
        let mut stats = self.stats.lock().unwrap();
        stats.value_sum += virtual_loss + value;
        stats.rollout_sum += virtual_loss + rollout;
    }

    pub fn is_complete(&self) -> bool {
        self.state.load(Ordering::Acquire) == CreationState::Complete as u8
    }

    /// Attempts the `Initial -> Creating` transition; the caller that wins is
    /// the unique writer of `next`, spec.md §4.7.
    pub fn try_start_creation(&self) -> bool {
        self.state
            .compare_exchange(CreationState::Initial as u8, CreationState::Creating as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn complete_creation(&self, node: Node) {
        *self.next.lock().unwrap() = Some(Box::new(node));
        self.state.store(CreationState::Complete as u8, Ordering::Release);
    }

    /// Spin-waits for another thread's `complete_creation`, spec.md §4.7
    /// `WaitForComplete`.
    pub fn wait_for_complete(&self) {
        let backoff = Backoff::new();
        while !self.is_complete() {
            backoff.snooze();
        }
    }

    pub fn with_next<R>(&self, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.next.lock().unwrap().as_deref().map(f)
    }

    pub fn take_next(&self) -> Option<Node> {
        self.next.lock().unwrap().take().map(|boxed| *boxed)
    }
}

/// A position in the search tree, populated once from a `Board` (spec.md
/// §3 "Lifecycle").
pub struct Node {
    pub to_move: Color,
    pub value: f32,
    pub children: Vec<ChildNode>,
}

impl Node {
    pub fn new(to_move: Color, value: f32, moves: Vec<(Vertex, f32)>) -> Self {
        let children = moves.into_iter().map(|(vertex, prior)| ChildNode::new(vertex, prior)).collect();

        Self { to_move, value, children }
    }

    /// INVARIANT I7: `num_total_* = Σ children.num_*`.
    pub fn total_count(&self) -> u32 {
        self.children.iter().map(ChildNode::count).sum()
    }

    pub fn index_of(&self, vertex: Vertex) -> Option<usize> {
        self.children.iter().position(|child| child.vertex == vertex)
    }

    pub fn child(&self, vertex: Vertex) -> Option<&ChildNode> {
        self.children.iter().find(|child| child.vertex == vertex)
    }

    /// The most-visited child, prior-broken on ties, spec.md §4.8.6.
    pub fn best(&self) -> usize {
        let mut best = 0;

        for i in 1..self.children.len() {
            let (count_best, count_i) = (self.children[best].count(), self.children[i].count());

            if count_i > count_best || (count_i == count_best && self.children[i].prior > self.children[best].prior) {
                best = i;
            }
        }

        best
    }

    pub fn argmax_count(&self) -> usize {
        self.best()
    }

    pub fn nonzero(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.children.len()).filter(move |&i| self.children[i].count() > 0)
    }
}

/// Owns the root of the live subtree, and rebases it as real moves are
/// played on the board, spec.md §4.7 `ShiftRootNode`.
pub struct RootNode {
    pub node: Node,
}

impl RootNode {
    pub fn new(node: Node) -> Self {
        Self { node }
    }

    /// Detaches and returns the subtree reached by playing `vertex`, or
    /// `None` if that child was never expanded -- the caller then builds a
    /// fresh `Node` from the board instead. The rest of this root's subtree
    /// is dropped here; for very large trees the spec calls for releasing it
    /// on a background task, which the caller (not this type) is expected to
    /// do by moving the discarded `RootNode` onto a detached thread.
    pub fn shift(self, vertex: Vertex) -> Option<Node> {
        let index = self.node.index_of(vertex)?;

        self.node.children[index].take_next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_go::PASS;

    #[test]
    fn virtual_loss_round_trips() {
        let child = ChildNode::new(PASS, 0.5);
        child.add_virtual_loss(3.0);
        assert_eq!(child.count(), 1);
        assert!(child.value_rate() < 0.0);

        child.backup(3.0, 1.0, 1.0);
        assert_eq!(child.value_rate(), 1.0);
    }

    #[test]
    fn creation_state_is_single_writer() {
        let child = ChildNode::new(PASS, 0.5);
        assert!(child.try_start_creation());
        assert!(!child.try_start_creation());

        child.complete_creation(Node::new(Color::Black, 0.0, vec![(PASS, 1.0)]));
        assert!(child.is_complete());
        assert_eq!(child.with_next(|n| n.children.len()), Some(1));
    }

    #[test]
    fn best_breaks_ties_by_prior() {
        let node = Node::new(Color::Black, 0.0, vec![(PASS, 0.2), (PASS, 0.8)]);
        node.children[0].add_virtual_loss(0.0);
        node.children[1].add_virtual_loss(0.0);

        assert_eq!(node.best(), 1);
    }

    #[test]
    fn shift_detaches_the_matching_child() {
        let node = Node::new(Color::Black, 0.0, vec![(PASS, 1.0)]);
        node.children[0].complete_creation(Node::new(Color::White, 0.0, vec![(PASS, 1.0)]));

        let root = RootNode::new(node);
        let detached = root.shift(PASS).unwrap();
        assert_eq!(detached.to_move, Color::White);
    }
}
