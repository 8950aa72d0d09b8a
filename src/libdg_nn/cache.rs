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
// Bounded, symmetry-aware evaluation cache, spec.md §4.5: a position and its
// 8 rotations/reflections all carry the same value and a simply-permuted
// policy, so a cache hit under any symmetry saves an evaluation under every
// other one.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use dg_go::point::{all_vertices, BOARD_AREA, COORD};
use dg_go::symmetry::Transform;
use dg_go::Color;

use crate::predict::PredictResponse;

fn permute_policy(policy: &[f32], t: Transform) -> Vec<f32> {
    let mut out = vec![0.0; policy.len()];
    out[BOARD_AREA] = policy[BOARD_AREA];

    for v in all_vertices() {
        let rv = COORD.to_raw(v).unwrap() as usize;
        let trv = COORD.to_raw(t.apply(v)).unwrap() as usize;
        out[trv] = policy[rv];
    }

    out
}

fn canonicalize(response: &PredictResponse, t: Transform) -> PredictResponse {
    PredictResponse::new(response.value(), permute_policy(response.policy(), t.inverse()))
}

fn apply_transform(response: &PredictResponse, t: Transform) -> PredictResponse {
    PredictResponse::new(response.value(), permute_policy(response.policy(), t))
}

type Key = (u64, Color);

struct Inner {
    entries: HashMap<Key, PredictResponse>,
    order: VecDeque<Key>,
    capacity: usize,
}

/// A cache of network evaluations keyed by board position and side to move,
/// always stored canonicalized to `Transform::Identity` so a probe under any
/// symmetry can be served from one entry. Eviction is FIFO once `capacity`
/// is exceeded, which is simpler than true LRU and, for the access pattern
/// of a tree search revisiting recent positions, nearly as effective.
pub struct EvalCache {
    inner: Mutex<Inner>,
}

impl EvalCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { inner: Mutex::new(Inner { entries: HashMap::new(), order: VecDeque::new(), capacity }) }
    }

    pub fn probe(&self, zobrist_key: u64, to_move: Color, t: Transform) -> Option<PredictResponse> {
        let inner = self.inner.lock().unwrap();

        inner.entries.get(&(zobrist_key, to_move)).map(|response| apply_transform(response, t))
    }

    pub fn insert(&self, zobrist_key: u64, to_move: Color, t: Transform, response: PredictResponse) {
        let mut inner = self.inner.lock().unwrap();
        let key = (zobrist_key, to_move);

        if !inner.entries.contains_key(&key) {
            if inner.order.len() >= inner.capacity {
                if let Some(evict) = inner.order.pop_front() {
                    inner.entries.remove(&evict);
                }
            }
            inner.order.push_back(key);
        }

        inner.entries.insert(key, canonicalize(&response, t));
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_symmetry() {
        let cache = EvalCache::with_capacity(4);
        let policy = vec![1.0; BOARD_AREA + 1];
        let response = PredictResponse::new(0.7, policy);

        cache.insert(42, Color::Black, Transform::Rot90, response);
        let found = cache.probe(42, Color::Black, Transform::Identity).unwrap();

        assert_eq!(found.value(), 0.7);
        assert_eq!(found.policy()[BOARD_AREA], 1.0);
    }

    #[test]
    fn evicts_oldest_entry_past_capacity() {
        let cache = EvalCache::with_capacity(1);
        let policy = vec![0.0; BOARD_AREA + 1];

        cache.insert(1, Color::Black, Transform::Identity, PredictResponse::new(0.1, policy.clone()));
        cache.insert(2, Color::Black, Transform::Identity, PredictResponse::new(0.2, policy));

        assert!(cache.probe(1, Color::Black, Transform::Identity).is_none());
        assert!(cache.probe(2, Color::Black, Transform::Identity).is_some());
        assert_eq!(cache.len(), 1);
    }
}
