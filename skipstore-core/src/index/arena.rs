//! Entry storage for the skip list
//!
//! Entries are kept in a slab and addressed by [`EntryId`]. Forward links
//! store ids rather than references, so an entry promoted to several levels
//! is still a single slot with a single owner.

use std::ops::Index;

/// Handle to a live entry slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EntryId(usize);

/// A key-value record and its forward links
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// `forward[i]` is the next entry on level `i`
    forward: Vec<Option<EntryId>>,
}

impl<K, V> Entry<K, V> {
    /// Create an entry participating in levels `0..level`
    pub(crate) fn new(key: K, value: V, level: usize) -> Self {
        Self {
            key,
            value,
            forward: vec![None; level],
        }
    }
}

/// Position in a level chain: the header sentinel or a real entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cursor {
    Head,
    Entry(EntryId),
}

/// Slab of entries plus the header's forward array
#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    head: Vec<Option<EntryId>>,
    slots: Vec<Option<Entry<K, V>>>,
    free: Vec<EntryId>,
}

impl<K, V> Arena<K, V> {
    /// Create an empty arena whose header spans `max_level` levels
    pub(crate) fn new(max_level: usize) -> Self {
        Self {
            head: vec![None; max_level],
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Successor of `at` on `level`
    pub(crate) fn next(&self, at: Cursor, level: usize) -> Option<EntryId> {
        match at {
            Cursor::Head => self.head[level],
            Cursor::Entry(id) => self[id].forward[level],
        }
    }

    /// Point the `level` link of `at` to `to`
    pub(crate) fn set_next(&mut self, at: Cursor, level: usize, to: Option<EntryId>) {
        match at {
            Cursor::Head => self.head[level] = to,
            Cursor::Entry(id) => self.entry_mut(id).forward[level] = to,
        }
    }

    /// Store an entry, reusing a released slot when one exists
    pub(crate) fn alloc(&mut self, entry: Entry<K, V>) -> EntryId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(entry);
                id
            }
            None => {
                self.slots.push(Some(entry));
                EntryId(self.slots.len() - 1)
            }
        }
    }

    /// Take an entry out of the arena. The caller must have unlinked it.
    pub(crate) fn release(&mut self, id: EntryId) -> Entry<K, V> {
        match self.slots[id.0].take() {
            Some(entry) => {
                self.free.push(id);
                entry
            }
            None => unreachable!("entry {} released twice", id.0),
        }
    }

    /// Drop every entry and unlink the header
    pub(crate) fn clear(&mut self) {
        self.head.iter_mut().for_each(|link| *link = None);
        self.slots.clear();
        self.free.clear();
    }

    /// Number of live entries
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn entry_mut(&mut self, id: EntryId) -> &mut Entry<K, V> {
        match self.slots[id.0].as_mut() {
            Some(entry) => entry,
            None => unreachable!("dangling link to entry {}", id.0),
        }
    }
}

impl<K, V> Index<EntryId> for Arena<K, V> {
    type Output = Entry<K, V>;

    fn index(&self, id: EntryId) -> &Self::Output {
        match self.slots[id.0].as_ref() {
            Some(entry) => entry,
            None => unreachable!("dangling link to entry {}", id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_reuses_released_slots() {
        let mut arena: Arena<u32, &str> = Arena::new(4);

        let a = arena.alloc(Entry::new(1, "a", 2));
        let b = arena.alloc(Entry::new(2, "b", 1));
        assert_eq!(arena.live(), 2);

        let removed = arena.release(a);
        assert_eq!(removed.key, 1);
        assert_eq!(arena.live(), 1);

        let c = arena.alloc(Entry::new(3, "c", 1));
        assert_eq!(c, a);
        assert_eq!(arena[b].value, "b");
        assert_eq!(arena[c].value, "c");
    }

    #[test]
    fn test_arena_links() {
        let mut arena: Arena<u32, ()> = Arena::new(2);
        let a = arena.alloc(Entry::new(1, (), 2));
        let b = arena.alloc(Entry::new(2, (), 1));

        arena.set_next(Cursor::Head, 0, Some(a));
        arena.set_next(Cursor::Head, 1, Some(a));
        arena.set_next(Cursor::Entry(a), 0, Some(b));

        assert_eq!(arena.next(Cursor::Head, 1), Some(a));
        assert_eq!(arena.next(Cursor::Entry(a), 0), Some(b));
        assert_eq!(arena.next(Cursor::Entry(a), 1), None);
        assert_eq!(arena.next(Cursor::Entry(b), 0), None);

        arena.clear();
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.next(Cursor::Head, 0), None);
    }
}
