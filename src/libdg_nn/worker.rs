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
// Batches individual evaluation requests from many search threads into the
// fixed-size calls the predictor wants, spec.md §4.6 "evaluator queue". The
// wait for more requests to arrive before flushing a partial batch is
// self-tuning: it grows while batches keep arriving full (the predictor is
// the bottleneck, so waiting a little longer pays for itself) and shrinks
// the moment one arrives partial (requests are sparse, so waiting just adds
// latency).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::predict::{PredictResponse, Predictor};

struct EvalRequest {
    features: Vec<f32>,
    reply: Sender<PredictResponse>,
}

pub struct EvalWorker {
    sender: Sender<EvalRequest>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

const MIN_WAIT: Duration = Duration::from_micros(10);
const MAX_WAIT: Duration = Duration::from_millis(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

impl EvalWorker {
    pub fn spawn<P: Predictor + 'static>(predictor: P, batch_size: usize) -> Self {
        let (sender, receiver): (Sender<EvalRequest>, Receiver<EvalRequest>) = unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let running_thread = running.clone();

        let handle = thread::Builder::new()
            .name("dg-eval-worker".into())
            .spawn(move || Self::run(receiver, predictor, batch_size, running_thread))
            .expect("failed to spawn evaluation worker");

        Self { sender, running, handle: Some(handle) }
    }

    fn run<P: Predictor>(receiver: Receiver<EvalRequest>, predictor: P, batch_size: usize, running: Arc<AtomicBool>) {
        let mut wait = MIN_WAIT;

        while running.load(Ordering::Acquire) {
            let first = match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(req) => req,
                Err(_) => continue,
            };

            let mut batch = vec![first];
            let deadline = Instant::now() + wait;

            while batch.len() < batch_size {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                match receiver.recv_timeout(remaining) {
                    Ok(req) => batch.push(req),
                    Err(_) => break,
                }
            }

            wait = if batch.len() == batch_size {
                (wait * 2).min(MAX_WAIT)
            } else {
                (wait / 2).max(MIN_WAIT)
            };

            let mut features = Vec::with_capacity(batch.len());
            for req in &batch {
                features.extend_from_slice(&req.features);
            }

            let responses = predictor.predict(&features, batch.len());

            for (req, response) in batch.into_iter().zip(responses.into_iter()) {
                let _ = req.reply.send(response);
            }
        }
    }

    /// Submits one feature tensor and blocks until its response is ready.
    pub fn submit(&self, features: Vec<f32>) -> PredictResponse {
        let (reply, recv) = bounded(1);

        self.sender.send(EvalRequest { features, reply }).expect("evaluation worker thread is not running");
        recv.recv().expect("evaluation worker dropped the reply channel")
    }
}

impl Drop for EvalWorker {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::RandomPredictor;

    #[test]
    fn submit_returns_a_response() {
        let worker = EvalWorker::spawn(RandomPredictor::default(), 8);
        let response = worker.submit(vec![0.0; 16]);

        assert_eq!(response.value(), 0.5);
    }

    #[test]
    fn handles_concurrent_submissions() {
        let worker = Arc::new(EvalWorker::spawn(RandomPredictor::default(), 4));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let worker = worker.clone();
                thread::spawn(move || worker.submit(vec![0.0; 4]))
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap().value(), 0.5);
        }
    }
}
