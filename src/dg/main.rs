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
// Entry point. The line-oriented command loop a real frontend would speak
// over stdin/stdout is a separate external collaborator and lives outside
// this crate; what's here is just enough to load a configuration, wire the
// board/cache/worker/search together, and drive a game to completion, the
// same four core operations (`clear`, `play`, `gen_move`, `final_score`)
// such a frontend would call.

use std::env;
use std::fs;
use std::time::Instant;

use cpu_time::ProcessTime;
use dg_go::Board;
use dg_mcts::options::StandardSearch;
use dg_mcts::time_control::RolloutLimit;
use dg_mcts::GenMoveResult;
use dg_nn::{EvalCache, EvalWorker, RandomPredictor};
use dg_utils::config::Options;
use dg_utils::{logging, Error};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Loads `Options` from the path named by the first CLI argument, or the
/// defaults if none was given. Bad configuration is fatal, §7.
fn load_options() -> Options {
    match env::args().nth(1) {
        None => Options::default(),
        Some(path) => {
            let text = fs::read_to_string(&path).unwrap_or_else(|err| {
                logging::fatal(&Error::config(&path, err.to_string()));
                std::process::exit(1);
            });

            Options::from_str(&text).unwrap_or_else(|err| {
                logging::fatal(&err);
                std::process::exit(1);
            })
        }
    }
}

fn main() {
    env_logger::init();

    let options = load_options();

    // The real neural network is an external collaborator this crate only
    // defines the wire format for (`dg_nn::Predictor`); substitute a fixed
    // response so the rest of the search machinery still runs end to end
    // without a model file on disk.
    let predictor = RandomPredictor { num_features: dg_go::point::BOARD_AREA };
    let cache = EvalCache::with_capacity(1 << 16);
    let worker = EvalWorker::spawn(predictor.clone(), options.batch_size);
    let search_options = StandardSearch::from_options(&options);
    let mut rng = SmallRng::seed_from_u64(0x5eed_c0de);

    let mut board = Board::new(options.komi);
    board.rule = options.rule;
    board.repetition_rule = options.repetition_rule;

    let mut root = None;
    let wall_clock = Instant::now();
    let cpu_clock = ProcessTime::now();

    while !board.is_two_passes() {
        let time_strategy = RolloutLimit::new(options.search_limit.unwrap_or(1_600));
        let GenMoveResult { vertex, value, resign, root: searched_root } =
            dg_mcts::generate_move(root.take(), &board, &predictor, &cache, &worker, &search_options, &time_strategy, &mut rng);

        let to_move = board.to_move();
        if resign {
            log::info!("{} resigns", to_move);
            break;
        }

        board.play(to_move, vertex, dg_go::MoveMode::OneWay).expect("search produced an illegal move");
        log::info!("{} plays {} (value {:.3})", to_move, dg_go::point::vertex_to_string(vertex), value);

        root = Some(dg_mcts::advance_root(searched_root, vertex, &board, &predictor, &cache, &worker, &search_options));
    }

    let score = dg_mcts::scoring::final_score(&board, &mut rng);
    let winner = if score > 0.0 { "B" } else if score < 0.0 { "W" } else { "0" };

    log::info!(
        "final score: {}+{:.1} ({:?} wall clock, {:?} cpu time)",
        winner,
        score.abs(),
        wall_clock.elapsed(),
        cpu_clock.elapsed()
    );
}
