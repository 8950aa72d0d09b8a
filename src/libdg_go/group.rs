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
// A connected group of same-colored stones and its liberties (spec.md §4.1,
// GLOSSARY "Group"). Groups are tracked without union-find path compression:
// each vertex belongs to a circular linked list of its group's members, and
// every member caches the vertex of the group's current canonical root.
// Merging two groups splices their rings together and repaints the root of
// every member of the smaller ring, so `find` stays O(1) between merges.

use crate::bitboard::Bitboard;
use crate::point::{EXT_AREA, Vertex};

#[derive(Clone)]
pub struct GroupTable {
    /// `next[v]` is the next member of `v`'s group, walking the ring back to
    /// `v` after visiting every member exactly once.
    next: Vec<Vertex>,
    root: Vec<Vertex>,
    liberties: Vec<Bitboard>,
    size: Vec<u32>,
}

impl GroupTable {
    pub fn new() -> Self {
        let n = EXT_AREA + 2;

        Self {
            next: (0..n as Vertex).collect(),
            root: (0..n as Vertex).collect(),
            liberties: vec![Bitboard::new(); n],
            size: vec![1; n],
        }
    }

    /// Turns `v` into a singleton group with no liberties. Called when a new
    /// stone is placed, before any neighbouring groups are merged into it.
    pub fn reset(&mut self, v: Vertex) {
        self.next[v as usize] = v;
        self.root[v as usize] = v;
        self.liberties[v as usize] = Bitboard::new();
        self.size[v as usize] = 1;
    }

    #[inline]
    pub fn find(&self, v: Vertex) -> Vertex {
        self.root[v as usize]
    }

    pub fn size_of(&self, v: Vertex) -> u32 {
        self.size[self.find(v) as usize]
    }

    pub fn liberties_of(&self, v: Vertex) -> &Bitboard {
        &self.liberties[self.find(v) as usize]
    }

    pub fn num_liberties(&self, v: Vertex) -> u32 {
        self.liberties_of(v).count()
    }

    pub fn is_captured(&self, v: Vertex) -> bool {
        self.num_liberties(v) == 0
    }

    pub fn add_liberty(&mut self, v: Vertex, liberty: Vertex) {
        let root = self.find(v);
        self.liberties[root as usize].add(liberty);
    }

    pub fn remove_liberty(&mut self, v: Vertex, liberty: Vertex) {
        let root = self.find(v);
        self.liberties[root as usize].remove(liberty);
    }

    /// Merges the groups containing `a` and `b`, which must already be of
    /// the same color. No-op if they are already the same group.
    pub fn merge(&mut self, a: Vertex, b: Vertex) {
        let root_a = self.find(a);
        let root_b = self.find(b);

        if root_a == root_b {
            return;
        }

        let (big, small) = if self.size[root_a as usize] >= self.size[root_b as usize] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };

        let mut cursor = small;
        loop {
            self.root[cursor as usize] = big;
            cursor = self.next[cursor as usize];
            if cursor == small {
                break;
            }
        }

        let combined_liberties = {
            let mut lib = self.liberties[big as usize];
            lib.merge(&self.liberties[small as usize]);
            lib
        };
        self.liberties[big as usize] = combined_liberties;
        self.size[big as usize] += self.size[small as usize];

        let next_big = self.next[big as usize];
        let next_small = self.next[small as usize];
        self.next[big as usize] = next_small;
        self.next[small as usize] = next_big;
    }

    pub fn iter_members(&self, v: Vertex) -> GroupIter<'_> {
        GroupIter { table: self, start: v, current: Some(v) }
    }
}

impl Default for GroupTable {
    fn default() -> Self {
        Self::new()
    }
}

pub struct GroupIter<'a> {
    table: &'a GroupTable,
    start: Vertex,
    current: Option<Vertex>,
}

impl<'a> Iterator for GroupIter<'a> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        let v = self.current?;
        let next = self.table.next[v as usize];

        self.current = if next == self.start { None } else { Some(next) };
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_group_has_one_member() {
        let mut t = GroupTable::new();
        t.reset(5);

        assert_eq!(t.iter_members(5).collect::<Vec<_>>(), vec![5]);
        assert_eq!(t.size_of(5), 1);
    }

    #[test]
    fn merge_combines_members_and_liberties() {
        let mut t = GroupTable::new();
        t.reset(1);
        t.reset(2);
        t.add_liberty(1, 10);
        t.add_liberty(2, 11);

        t.merge(1, 2);

        assert_eq!(t.find(1), t.find(2));
        assert_eq!(t.size_of(1), 2);
        assert_eq!(t.num_liberties(1), 2);

        let mut members: Vec<_> = t.iter_members(1).collect();
        members.sort();
        assert_eq!(members, vec![1, 2]);
    }

    #[test]
    fn merge_is_idempotent_on_the_same_group() {
        let mut t = GroupTable::new();
        t.reset(1);
        t.reset(2);
        t.merge(1, 2);
        t.merge(1, 2);

        assert_eq!(t.size_of(1), 2);
    }

    #[test]
    fn remove_liberty_affects_every_member() {
        let mut t = GroupTable::new();
        t.reset(1);
        t.reset(2);
        t.add_liberty(1, 10);
        t.merge(1, 2);

        t.remove_liberty(2, 10);

        assert_eq!(t.num_liberties(1), 0);
        assert!(t.is_captured(1));
    }
}
