//! Skip list engine
//!
//! A probabilistic ordered map providing expected O(log n) insert, search and
//! delete. This type is single-threaded; [`SkipIndex`](super::SkipIndex) adds
//! the locking.

use super::arena::{Arena, Cursor, Entry, EntryId};
use super::level::LevelGenerator;
use super::InsertStatus;
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;

/// Skip list with unique keys
pub struct SkipList<K, V, R = StdRng> {
    arena: Arena<K, V>,
    levels: LevelGenerator<R>,
    /// Highest populated level, 0-indexed
    top_level: usize,
    len: usize,
}

impl<K: Ord, V, R: Rng> SkipList<K, V, R> {
    /// Create an empty skip list with up to `max_level` levels
    pub fn new(max_level: usize, rng: R) -> Self {
        let levels = LevelGenerator::new(rng, max_level);
        Self {
            arena: Arena::new(levels.max_level()),
            levels,
            top_level: 0,
            len: 0,
        }
    }

    /// Insert a key-value pair; an existing key is left untouched
    pub fn insert(&mut self, key: K, value: V) -> InsertStatus {
        let mut update = self.find_update(&key);

        if let Some(next) = self.arena.next(update[0], 0) {
            if self.arena[next].key == key {
                return InsertStatus::AlreadyExists;
            }
        }

        let level = self.levels.next_level();
        if level > self.top_level + 1 {
            for slot in &mut update[self.top_level + 1..level] {
                *slot = Cursor::Head;
            }
            self.top_level = level - 1;
        }

        let id = self.arena.alloc(Entry::new(key, value, level));
        for (i, prev) in update.iter().take(level).enumerate() {
            let next = self.arena.next(*prev, i);
            self.arena.set_next(Cursor::Entry(id), i, next);
            self.arena.set_next(*prev, i, Some(id));
        }

        self.len += 1;
        debug_assert_eq!(self.arena.live(), self.len);
        InsertStatus::Inserted
    }

    /// Get a value by key
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut current = Cursor::Head;
        for i in (0..=self.top_level).rev() {
            current = self.advance(current, i, key);
        }

        let candidate = self.arena.next(current, 0)?;
        let entry = &self.arena[candidate];
        (entry.key == *key).then_some(&entry.value)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key, returning its value if it was present
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let update = self.find_update(key);

        let candidate = match self.arena.next(update[0], 0) {
            Some(id) if self.arena[id].key == *key => id,
            _ => return None,
        };

        for (i, prev) in update.iter().enumerate().take(self.top_level + 1) {
            // Higher levels cannot link an entry that a lower level skips.
            if self.arena.next(*prev, i) != Some(candidate) {
                break;
            }
            let next = self.arena.next(Cursor::Entry(candidate), i);
            self.arena.set_next(*prev, i, next);
        }

        while self.top_level > 0 && self.arena.next(Cursor::Head, self.top_level).is_none() {
            self.top_level -= 1;
        }

        self.len -= 1;
        let entry = self.arena.release(candidate);
        debug_assert_eq!(self.arena.live(), self.len);
        Some(entry.value)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.arena.clear();
        self.top_level = 0;
        self.len = 0;
    }

    /// Per-level predecessors of `key`, one cursor per possible level
    fn find_update(&self, key: &K) -> Vec<Cursor> {
        let mut update = vec![Cursor::Head; self.levels.max_level()];
        let mut current = Cursor::Head;
        for i in (0..=self.top_level).rev() {
            current = self.advance(current, i, key);
            update[i] = current;
        }
        update
    }

    /// Walk `level` from `from` while the next key is below `key`
    fn advance(&self, from: Cursor, level: usize, key: &K) -> Cursor {
        let mut current = from;
        while let Some(next) = self.arena.next(current, level) {
            if self.arena[next].key < *key {
                current = Cursor::Entry(next);
            } else {
                break;
            }
        }
        current
    }
}

impl<K, V, R> SkipList<K, V, R> {
    /// Iterate over all entries in key order
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.level_iter(0)
    }

    /// Keys linked on each populated level, bottom level first
    pub fn level_keys(&self) -> Vec<Vec<&K>> {
        if self.len == 0 {
            return Vec::new();
        }
        (0..=self.top_level)
            .map(|level| self.level_iter(level).map(|(k, _)| k).collect())
            .collect()
    }

    fn level_iter(&self, level: usize) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            level,
            next: self.arena.next(Cursor::Head, level),
        }
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest populated level (0-indexed, 0 when empty)
    pub fn top_level(&self) -> usize {
        self.top_level
    }

    /// Upper bound on levels
    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }
}

/// Iterator over one level chain
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    level: usize,
    next: Option<EntryId>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let entry = &self.arena[id];
        self.next = self.arena.next(Cursor::Entry(id), self.level);
        Some((&entry.key, &entry.value))
    }
}

impl<K: fmt::Display, V: fmt::Display, R> fmt::Display for SkipList<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 {
            return writeln!(f, "Level 0: ");
        }
        for level in 0..=self.top_level {
            write!(f, "Level {level}: ")?;
            for (key, value) in self.level_iter(level) {
                write!(f, "{{{key}: {value}}}; ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<K, V, R> fmt::Debug for SkipList<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("len", &self.len)
            .field("top_level", &self.top_level)
            .field("max_level", &self.levels.max_level())
            .finish()
    }
}
