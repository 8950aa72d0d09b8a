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
// Clock-based time control, spec.md §4.8.4.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{TimeStrategy, TimeStrategyResult};
use crate::tree;

/// Past this many plies the game is no longer considered "the opening", so a
/// lopsided win estimate is trusted enough to compress the budget.
const OPENING_PLIES: usize = 30;

fn budget_seconds(main_time: f32, byoyomi: f32, margin: f32, left_time: f32, ply: usize, win_estimate: f32) -> f32 {
    if ply > OPENING_PLIES && !(0.01..=0.95).contains(&win_estimate) {
        return (byoyomi - margin).max(0.1);
    }

    if main_time <= 0.0 {
        (byoyomi - margin).max(0.1)
    } else if left_time < 2.0 * byoyomi {
        (byoyomi - margin).max(1.0)
    } else {
        let a = left_time / (55.0 + (50.0 - ply as f32).max(0.0));
        let ply_factor = ((ply as f32 - 16.0) / 16.0).clamp(0.0, 1.0);
        let b = byoyomi * (0.5 + 1.5 * ply_factor);

        a.max(b)
    }
}

pub struct ByoYomi {
    start: Instant,
    budget: Mutex<Duration>,
    extension: Duration,
    extensions_remaining: AtomicUsize,
}

impl ByoYomi {
    pub fn new(main_time: f32, byoyomi: f32, margin: f32, left_time: f32, ply: usize, num_extensions: usize, win_estimate: f32) -> Self {
        let secs = budget_seconds(main_time, byoyomi, margin, left_time, ply, win_estimate).max(0.0);

        Self {
            start: Instant::now(),
            budget: Mutex::new(Duration::from_secs_f32(secs)),
            extension: Duration::from_secs_f32(secs * 0.7),
            extensions_remaining: AtomicUsize::new(num_extensions),
        }
    }

    fn try_consume_extension(&self) -> bool {
        self.extensions_remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| if n > 0 { Some(n - 1) } else { None })
            .is_ok()
    }

    /// True when the best and second-best children are close (within 1.5x
    /// visits) and the second has a higher win rate, spec.md §4.8.4's final
    /// paragraph.
    fn should_extend(&self, root: &tree::Node) -> bool {
        if root.children.len() < 2 {
            return false;
        }

        let top1 = root.argmax_count();
        let mut top2 = if top1 == 0 { 1 } else { 0 };

        for i in root.nonzero() {
            if i != top1 && root.children[i].count() > root.children[top2].count() {
                top2 = i;
            }
        }

        if top1 == top2 {
            return false;
        }

        let count_1 = root.children[top1].count() as f32;
        let count_2 = root.children[top2].count() as f32;

        count_1 <= count_2 * 1.5 && root.children[top2].value_rate() > root.children[top1].value_rate()
    }
}

impl TimeStrategy for ByoYomi {
    fn try_extend(&self, root: &tree::Node) -> TimeStrategyResult {
        let elapsed = self.start.elapsed();
        let budget = *self.budget.lock().unwrap();

        if elapsed < budget {
            let total = root.total_count() as f32;
            let elapsed_secs = elapsed.as_secs_f32();
            let rate = if elapsed_secs > 0.0 { total / elapsed_secs } else { total.max(1.0) };
            let remaining_secs = (budget - elapsed).as_secs_f32();

            TimeStrategyResult::NotExpired((rate * remaining_secs).round() as usize)
        } else if self.should_extend(root) && self.try_consume_extension() {
            *self.budget.lock().unwrap() += self.extension;
            TimeStrategyResult::Extended
        } else {
            TimeStrategyResult::Expired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byoyomi_only_uses_the_margin_adjusted_budget() {
        let secs = budget_seconds(0.0, 3.0, 0.1, 0.0, 10, 0.5);
        assert!((secs - 2.9).abs() < 1e-6);
    }

    #[test]
    fn extreme_win_estimate_past_the_opening_compresses_the_budget() {
        let normal = budget_seconds(60.0, 3.0, 0.1, 60.0, 100, 0.5);
        let compressed = budget_seconds(60.0, 3.0, 0.1, 60.0, 100, 0.99);

        assert!(compressed < normal);
    }

    #[test]
    fn extreme_estimate_during_the_opening_is_ignored() {
        let secs = budget_seconds(60.0, 3.0, 0.1, 60.0, 5, 0.99);
        assert!(secs > 3.0);
    }
}
