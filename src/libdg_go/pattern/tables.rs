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
// Loads the trained rollout-prior tables named in spec.md §6
// (`prob_ptn3x3.txt`, `prob_ptn_rsp.txt`, `prob_dist.txt`) from
// `working_dir/prob/`. A row that is never read is treated as a neutral
// weight of 1.0 -- these tables are prior-weight overlays on top of
// `Pattern::legal`, never a source of legality, per spec.md §9.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::RwLock;

use crate::color::Color;
use crate::pattern::Pattern;

/// `stone_bits -> [p_white, p_white_inv, p_black, p_black_inv]`.
pub struct Ptn3x3Table {
    rows: RwLock<HashMap<u32, [f64; 4]>>,
}

impl Ptn3x3Table {
    fn new() -> Self {
        Self { rows: RwLock::new(HashMap::new()) }
    }

    pub fn weight(&self, pattern: Pattern, side: Color) -> f64 {
        let rows = self.rows.read().unwrap();

        match rows.get(&pattern.stone_bits()) {
            Some(row) => match side {
                Color::White => row[0],
                Color::Black => row[2],
                _ => 1.0,
            },
            None => 1.0,
        }
    }

    fn load(&self, path: &Path) -> Result<(), dg_utils::Error> {
        let mut rows = self.rows.write().unwrap();
        rows.clear();

        for line in read_lines(path)? {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 6 {
                continue;
            }

            if let (Ok(stone_bits), Ok(p_white), Ok(p_white_inv), Ok(p_black), Ok(p_black_inv)) = (
                fields[0].parse::<u32>(),
                fields[2].parse::<f64>(),
                fields[3].parse::<f64>(),
                fields[4].parse::<f64>(),
                fields[5].parse::<f64>(),
            ) {
                rows.insert(stone_bits, [p_white, p_white_inv, p_black, p_black_inv]);
            }
        }

        Ok(())
    }
}

/// `12pt_pattern_bits -> (p_forward, p_inverse)`, keyed on the full 12-point
/// `stone_bits` of the response pattern around the previous move.
pub struct RspTable {
    rows: RwLock<HashMap<u32, (f64, f64)>>,
}

impl RspTable {
    fn new() -> Self {
        Self { rows: RwLock::new(HashMap::new()) }
    }

    pub fn weight(&self, pattern: Pattern, forward: bool) -> f64 {
        let rows = self.rows.read().unwrap();

        match rows.get(&pattern.stone_bits()) {
            Some(&(fwd, inv)) => if forward { fwd } else { inv },
            None => 1.0,
        }
    }

    fn load(&self, path: &Path) -> Result<(), dg_utils::Error> {
        let mut rows = self.rows.write().unwrap();
        rows.clear();

        for line in read_lines(path)? {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 3 {
                continue;
            }

            if let (Ok(bits), Ok(fwd), Ok(inv)) =
                (fields[0].parse::<u32>(), fields[1].parse::<f64>(), fields[2].parse::<f64>())
            {
                rows.insert(bits, (fwd, inv));
            }
        }

        Ok(())
    }
}

/// Manhattan-distance-from-last-move prior, indexed `[bucket][forward=0/inverse=1]`,
/// grounded in original_source's `distance.cpp` weight kernel.
pub struct DistTable {
    rows: RwLock<Vec<(f64, f64)>>,
}

const MAX_DISTANCE_BUCKET: usize = 17;

impl DistTable {
    fn new() -> Self {
        Self { rows: RwLock::new(vec![(1.0, 1.0); MAX_DISTANCE_BUCKET]) }
    }

    pub fn weight(&self, distance: usize, forward: bool) -> f64 {
        let rows = self.rows.read().unwrap();
        let bucket = distance.min(rows.len() - 1);
        let (fwd, inv) = rows[bucket];

        if forward { fwd } else { inv }
    }

    fn load(&self, path: &Path) -> Result<(), dg_utils::Error> {
        let mut rows = self.rows.write().unwrap();

        for (bucket, line) in read_lines(path)?.into_iter().enumerate() {
            if bucket >= rows.len() {
                break;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 2 {
                continue;
            }

            if let (Ok(fwd), Ok(inv)) = (fields[0].parse::<f64>(), fields[1].parse::<f64>()) {
                rows[bucket] = (fwd, inv);
            }
        }

        Ok(())
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, dg_utils::Error> {
    let file = fs::File::open(path).map_err(|source| dg_utils::Error::MissingPatternTable {
        path: path.display().to_string(),
        source,
    })?;

    Ok(BufReader::new(file)
        .lines()
        .filter_map(Result::ok)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect())
}

lazy_static::lazy_static! {
    pub static ref PROB_PTN3X3: Ptn3x3Table = Ptn3x3Table::new();
    pub static ref PROB_PTN_RSP: RspTable = RspTable::new();
    pub static ref PROB_DIST: DistTable = DistTable::new();
}

/// Loads all three rollout-prior tables from `working_dir/prob/`. A missing
/// or malformed file is a recoverable warning (spec.md §7): the table that
/// failed to load simply keeps returning neutral weights.
pub fn load_all(working_dir: &Path) -> Vec<dg_utils::Error> {
    let dir = working_dir.join("prob");
    let mut errors = Vec::new();

    if let Err(e) = PROB_PTN3X3.load(&dir.join("prob_ptn3x3.txt")) {
        errors.push(e);
    }
    if let Err(e) = PROB_PTN_RSP.load(&dir.join("prob_ptn_rsp.txt")) {
        errors.push(e);
    }
    if let Err(e) = PROB_DIST.load(&dir.join("prob_dist.txt")) {
        errors.push(e);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_recoverable_error() {
        let table = Ptn3x3Table::new();
        let err = table.load(Path::new("/nonexistent/prob_ptn3x3.txt"));

        assert!(err.is_err());
    }

    #[test]
    fn unloaded_table_returns_neutral_weight() {
        let table = Ptn3x3Table::new();
        let pattern = Pattern::new();

        assert_eq!(table.weight(pattern, Color::Black), 1.0);
    }

    #[test]
    fn dist_table_clamps_out_of_range_buckets() {
        let table = DistTable::new();

        assert_eq!(table.weight(1000, true), table.weight(MAX_DISTANCE_BUCKET - 1, true));
    }
}
