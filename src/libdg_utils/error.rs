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

/// The error categories of §7: configuration and model-loading failures are
/// fatal and terminate the process, gameplay failures are recovered locally
/// by the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An invalid configuration key or value, with the file:line context it
    /// was read from. Fatal.
    #[error("invalid configuration at {location}: {message}")]
    Config { location: String, message: String },

    /// A pattern probability table could not be read from disk. Recoverable;
    /// the caller should proceed with neutral (1.0) weights.
    #[error("missing pattern table {path}: {source}")]
    MissingPatternTable { path: String, source: std::io::Error },

    /// The model file at `path` is missing or has an incompatible format.
    /// Fatal.
    #[error("could not load model from {path}: {message}")]
    Model { path: String, message: String },

    /// A `play` command named a color that did not match the board's
    /// side-to-move.
    #[error("wrong color: expected {expected}, got {actual}")]
    WrongColor { expected: String, actual: String },

    /// A `play` command named an illegal vertex.
    #[error("illegal move: {color} at {vertex}")]
    IllegalMove { color: String, vertex: String },

    /// The inference engine failed to produce a response for a batch. Fatal,
    /// since move quality depends on it.
    #[error("inference engine failure: {0}")]
    Inference(String),
}

impl Error {
    pub fn config(location: impl fmt::Display, message: impl Into<String>) -> Self {
        Error::Config { location: location.to_string(), message: message.into() }
    }

    /// Returns true for the categories that §7 says should terminate the
    /// process rather than be returned to a caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config { .. } | Error::Model { .. } | Error::Inference(_))
    }
}
