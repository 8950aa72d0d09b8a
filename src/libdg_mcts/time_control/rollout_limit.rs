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
// A fixed playout budget, independent of wall-clock time -- used for the
// scoring pass (spec.md §4.9, 1000 rollouts) and for deterministic tests.

use super::{TimeStrategy, TimeStrategyResult};
use crate::tree;

#[derive(Clone)]
pub struct RolloutLimit {
    limit: usize,
}

impl RolloutLimit {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl TimeStrategy for RolloutLimit {
    fn try_extend(&self, root: &tree::Node) -> TimeStrategyResult {
        let total = root.total_count() as usize;

        if total >= self.limit {
            TimeStrategyResult::Expired
        } else {
            TimeStrategyResult::NotExpired(self.limit - total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_go::{Color, PASS};

    #[test]
    fn expires_once_the_limit_is_reached() {
        let node = tree::Node::new(Color::Black, 0.0, vec![(PASS, 1.0)]);
        node.children[0].add_virtual_loss(0.0);

        let strategy = RolloutLimit::new(1);
        assert!(matches!(strategy.try_extend(&node), TimeStrategyResult::Expired));
    }

    #[test]
    fn reports_remaining_budget() {
        let node = tree::Node::new(Color::Black, 0.0, vec![(PASS, 1.0)]);
        let strategy = RolloutLimit::new(100);

        match strategy.try_extend(&node) {
            TimeStrategyResult::NotExpired(remaining) => assert_eq!(remaining, 100),
            _ => panic!("expected NotExpired"),
        }
    }
}
