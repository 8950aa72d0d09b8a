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
// The boundary to the (external) neural network, spec.md §1 / §4.6: this
// crate never runs inference itself, it only defines the shape of a batched
// request/response and a trait the search crate programs against.

/// One board's worth of network output: a value in `[0, 1]` (from the
/// perspective of the player to move) and a policy over every vertex plus
/// pass.
#[derive(Clone, Debug)]
pub struct PredictResponse {
    value: f32,
    policy: Vec<f32>,
}

impl PredictResponse {
    pub fn new(value: f32, policy: Vec<f32>) -> Self {
        Self { value, policy }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn policy(&self) -> &[f32] {
        &self.policy
    }

    pub fn into_policy(self) -> Vec<f32> {
        self.policy
    }
}

/// Implemented by whatever actually runs the network -- a process-local GPU
/// client, an RPC stub, or (in tests) a fixed response generator. `predict`
/// receives `batch_size` feature tensors concatenated into one slice and
/// must return exactly `batch_size` responses, in the same order.
pub trait Predictor: Clone + Send {
    /// The largest number of in-flight batches this predictor can usefully
    /// overlap; `EvalWorker` uses this to size its own thread pool.
    fn max_num_threads(&self) -> usize;

    fn predict(&self, features: &[f32], batch_size: usize) -> Vec<PredictResponse>;
}

/// A predictor that returns a uniform policy and a fixed value, useful for
/// exercising the search machinery without a real network attached.
#[derive(Clone, Default)]
pub struct RandomPredictor {
    pub num_features: usize,
}

impl Predictor for RandomPredictor {
    fn max_num_threads(&self) -> usize {
        1
    }

    fn predict(&self, _features: &[f32], batch_size: usize) -> Vec<PredictResponse> {
        (0..batch_size)
            .map(|_| PredictResponse::new(0.5, vec![1.0; dg_go::point::BOARD_AREA + 1]))
            .collect()
    }
}
