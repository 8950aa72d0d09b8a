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

mod byo_yomi;
mod rollout_limit;

pub use self::byo_yomi::*;
pub use self::rollout_limit::*;

use crate::tree;

pub enum TimeStrategyResult {
    NotExpired(usize),
    NotExtended,
    Expired,
    Extended,
}

pub trait TimeStrategy: Send {
    /// Checks whether this time period has expired, and if so calls back
    /// into the caller's own extension policy via the returned result.
    ///
    /// * `root` - the root of the search tree.
    fn try_extend(&self, root: &tree::Node) -> TimeStrategyResult;
}

/// Returns the minimum number of additional playouts the second most visited
/// child would need to overtake the most visited one.
fn min_promote_rollouts(root: &tree::Node) -> usize {
    let top_1 = root.argmax_count();
    let mut top_2 = if top_1 == 0 { 1.min(root.children.len().saturating_sub(1)) } else { 0 };

    for i in root.nonzero() {
        if i != top_1 && root.children[i].count() > root.children[top_2].count() {
            top_2 = i;
        }
    }

    let count_1 = root.children[top_1].count();
    let count_2 = root.children.get(top_2).map(tree::ChildNode::count).unwrap_or(0);

    if count_1 > count_2 {
        (count_1 - count_2) as usize
    } else {
        0 // ignore the race condition
    }
}

/// Implements the `UNST-N` / `EARLY-C` time management scheme of Baier and
/// Winands, spec.md §4.8.4:
///
/// * `UNST-N` extends the search until the most visited child also has the
///   highest win rate.
/// * `EARLY-C` stops the search early once the second most visited child
///   cannot catch up to the most visited one in the remaining budget.
pub fn is_done(root: &tree::Node, strategy: &dyn TimeStrategy) -> bool {
    if root.total_count() == 0 {
        false
    } else {
        match strategy.try_extend(root) {
            TimeStrategyResult::NotExpired(remaining) => min_promote_rollouts(root) > remaining,
            TimeStrategyResult::Extended => false,
            _ => true,
        }
    }
}
