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

use std::fmt;
use std::ops::Not;

/// A stone color, plus the two sentinels `Empty` and `Wall` used to avoid
/// bounds checks on neighbour access (spec.md §3 "Color").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Empty = 0,
    Black = 1,
    White = 2,
    Wall = 3,
}

impl Color {
    pub fn is_stone(self) -> bool {
        matches!(self, Color::Black | Color::White)
    }

    /// Index into 2-element per-color arrays (Black=0, White=1). Panics if
    /// called on `Empty`/`Wall`.
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
            _ => unreachable!("index() is only defined for stone colors"),
        }
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            other => other,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Empty => write!(fmt, "."),
            Color::Black => write!(fmt, "B"),
            Color::White => write!(fmt, "W"),
            Color::Wall => write!(fmt, "#"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_flips_stone_colors() {
        assert_eq!(!Color::Black, Color::White);
        assert_eq!(!Color::White, Color::Black);
    }

    #[test]
    fn not_is_identity_on_sentinels() {
        assert_eq!(!Color::Empty, Color::Empty);
        assert_eq!(!Color::Wall, Color::Wall);
    }
}
