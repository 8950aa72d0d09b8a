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

pub mod bitboard;
pub mod color;
pub mod features;
pub mod group;
pub mod nakade;
pub mod pattern;
pub mod point;
pub mod symmetry;
pub mod zobrist;

mod board;

pub use self::bitboard::Bitboard;
pub use self::board::{Board, Diff, MoveMode, RepetitionOutcome};
pub use self::color::Color;
pub use self::pattern::Pattern;
pub use self::point::{Vertex, BOARD_SIZE, PASS};
