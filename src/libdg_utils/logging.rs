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

/// Logs a fatal top-level error (missing model, corrupt tables, GPU failure)
/// to stderr with `log::error!` before the caller terminates the process.
/// Kept as a named helper, instead of `eprintln!` at every call site, so the
/// wording stays consistent across the few places that hit it.
pub fn fatal(error: &crate::Error) {
    log::error!("{}", error);
}

/// Logs a recoverable condition (missing pattern table) that the caller
/// proceeds past with a documented fallback.
pub fn warn_recoverable(error: &crate::Error) {
    log::warn!("{}", error);
}
