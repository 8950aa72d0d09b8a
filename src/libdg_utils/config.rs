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
// The configuration loader is an external collaborator per the core spec --
// its job is to produce a frozen `Options` and hand it to the core once at
// startup. Nothing here is re-read after `Options::from_str` returns.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Scoring rule used by `final_score` / `should_pass`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Chinese,
    Japanese,
    Tromp,
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chinese" => Ok(Rule::Chinese),
            "japanese" => Ok(Rule::Japanese),
            "tromp" => Ok(Rule::Tromp),
            other => Err(format!("unrecognized rule `{}`", other)),
        }
    }
}

/// Positional-repetition policy used by `Board::check_repetition`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepetitionRule {
    Draw,
    SuperKo,
    TrompTaylor,
}

impl FromStr for RepetitionRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draw" => Ok(RepetitionRule::Draw),
            "superko" => Ok(RepetitionRule::SuperKo),
            "tromp" => Ok(RepetitionRule::TrompTaylor),
            other => Err(format!("unrecognized repetition_rule `{}`", other)),
        }
    }
}

/// The frozen set of options recognized by the core, §6 "Configuration
/// options". Built once by the (out-of-scope) configuration loader and
/// passed by reference into `Board` / `SearchTree` -- there is no process-
/// wide mutable singleton, per spec.md §9.
#[derive(Clone, Debug)]
pub struct Options {
    pub num_threads: usize,
    pub num_gpus: usize,
    pub komi: f32,
    pub rule: Rule,
    pub repetition_rule: RepetitionRule,
    pub main_time: f32,
    pub byoyomi: f32,
    pub byoyomi_margin: f32,
    pub num_extensions: usize,
    pub batch_size: usize,
    pub lambda_init: f32,
    pub lambda_delta: f32,
    pub lambda_move_start: usize,
    pub lambda_move_end: usize,
    pub cp_init: f32,
    pub cp_base: f32,
    pub virtual_loss: f32,
    pub ladder_reduction: f32,
    pub use_dirichlet_noise: bool,
    pub dirichlet_noise: f32,
    pub search_limit: Option<usize>,
    pub use_full_features: bool,
    pub value_from_black: bool,
    pub resign_value: f32,
    pub save_log: bool,
    pub working_dir: String,
    pub model_path: String,
    pub node_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            num_threads: 8,
            num_gpus: 1,
            komi: 7.5,
            rule: Rule::Chinese,
            repetition_rule: RepetitionRule::SuperKo,
            main_time: 0.0,
            byoyomi: 3.0,
            byoyomi_margin: 0.1,
            num_extensions: 1,
            batch_size: 16,
            lambda_init: 0.5,
            lambda_delta: 0.2,
            lambda_move_start: 0,
            lambda_move_end: 240,
            cp_init: 1.25,
            cp_base: 19652.0,
            virtual_loss: 3.0,
            ladder_reduction: 0.1,
            use_dirichlet_noise: true,
            dirichlet_noise: 0.03,
            search_limit: None,
            use_full_features: true,
            value_from_black: false,
            resign_value: 0.05,
            save_log: false,
            working_dir: ".".to_string(),
            model_path: "dg.json".to_string(),
            node_size: 1_000_000,
        }
    }
}

impl Options {
    /// Parses `key=value` lines (ignoring blank lines and `#` comments) into
    /// a frozen `Options`, starting from the defaults above. Bad keys/values
    /// are reported with their 1-based line number, per §7.
    pub fn from_str(text: &str) -> Result<Self, Error> {
        let mut options = Self::default();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let location = format!("line {}", lineno + 1);
            let (key, value) = line.split_once('=')
                .ok_or_else(|| Error::config(&location, format!("expected `key=value`, got `{}`", line)))?;
            let (key, value) = (key.trim(), value.trim());

            options.set(key, value, &location)?;
        }

        Ok(options)
    }

    fn set(&mut self, key: &str, value: &str, location: &str) -> Result<(), Error> {
        macro_rules! parse {
            ($field:expr) => {
                $field = value.parse()
                    .map_err(|_| Error::config(location, format!("invalid value for `{}`: `{}`", key, value)))?
            };
        }

        match key {
            "num_threads" => parse!(self.num_threads),
            "num_gpus" => parse!(self.num_gpus),
            "komi" => parse!(self.komi),
            "rule" => self.rule = value.parse().map_err(|message| Error::config(location, message))?,
            "repetition_rule" => self.repetition_rule = value.parse().map_err(|message| Error::config(location, message))?,
            "main_time" => parse!(self.main_time),
            "byoyomi" => parse!(self.byoyomi),
            "byoyomi_margin" => parse!(self.byoyomi_margin),
            "num_extensions" => parse!(self.num_extensions),
            "batch_size" => parse!(self.batch_size),
            "lambda_init" => parse!(self.lambda_init),
            "lambda_delta" => parse!(self.lambda_delta),
            "lambda_move_start" => parse!(self.lambda_move_start),
            "lambda_move_end" => parse!(self.lambda_move_end),
            "cp_init" => parse!(self.cp_init),
            "cp_base" => parse!(self.cp_base),
            "virtual_loss" => parse!(self.virtual_loss),
            "ladder_reduction" => parse!(self.ladder_reduction),
            "use_dirichlet_noise" => parse!(self.use_dirichlet_noise),
            "dirichlet_noise" => parse!(self.dirichlet_noise),
            "search_limit" => {
                let limit: usize = value.parse()
                    .map_err(|_| Error::config(location, format!("invalid value for `search_limit`: `{}`", value)))?;
                self.search_limit = if limit == 0 { None } else { Some(limit) };
            },
            "use_full_features" => parse!(self.use_full_features),
            "value_from_black" => parse!(self.value_from_black),
            "resign_value" => parse!(self.resign_value),
            "save_log" => parse!(self.save_log),
            "working_dir" => self.working_dir = value.to_string(),
            "model_path" => self.model_path = value.to_string(),
            "node_size" => parse!(self.node_size),
            other => return Err(Error::config(location, format!("unrecognized configuration key `{}`", other))),
        }

        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rule::Chinese => write!(fmt, "chinese"),
            Rule::Japanese => write!(fmt, "japanese"),
            Rule::Tromp => write!(fmt, "tromp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();

        assert_eq!(options.komi, 7.5);
        assert_eq!(options.rule, Rule::Chinese);
    }

    #[test]
    fn parses_recognized_keys() {
        let options = Options::from_str("komi=6.5\nrule=japanese\n# a comment\n\nnum_threads=4\n").unwrap();

        assert_eq!(options.komi, 6.5);
        assert_eq!(options.rule, Rule::Japanese);
        assert_eq!(options.num_threads, 4);
    }

    #[test]
    fn rejects_unrecognized_key() {
        let err = Options::from_str("not_a_key=1\n").unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn rejects_bad_value() {
        let err = Options::from_str("komi=not_a_number\n").unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn search_limit_zero_means_unlimited() {
        let options = Options::from_str("search_limit=0\n").unwrap();

        assert_eq!(options.search_limit, None);
    }
}
