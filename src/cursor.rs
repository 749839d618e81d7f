//! Cursors that keep their place in an [`OrderedMap`] while it changes.
//!
//! Every call to `advance` looks up the successor of the current entry in the
//! map as it is *now*. Nothing is copied up front. An entry appended during a
//! walk is reached before the cursor is exhausted, and an entry removed before
//! the cursor gets to it is never reached.
//!
//! Keep loops that mutate the map they walk on [`CursorMut`]. Rewriting them
//! as a `for` loop over a collected list of keys reintroduces the bug these
//! cursors exist to avoid: entries added during the loop are silently dropped.
//!
//! [`OrderedMap`]: ../struct.OrderedMap.html
//! [`CursorMut`]: struct.CursorMut.html

use crate::{map::OrderedMap, Error, Result};
use std::{borrow::Borrow, hash::Hash};

/// Where a cursor sits within its map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Position {
    /// On a live entry, identified by its arena slot.
    At(usize),
    /// The entry the cursor was on has been removed. Holds the slot `advance`
    /// will move to, if any.
    Vacated(Option<usize>),
    /// Walked past the last entry.
    Exhausted,
}

impl Position {
    fn slot(self) -> Option<usize> {
        match self {
            Position::At(slot) => Some(slot),
            _ => None,
        }
    }

    fn is_exhausted(self) -> bool {
        match self {
            Position::At(_) | Position::Vacated(Some(_)) => false,
            Position::Vacated(None) | Position::Exhausted => true,
        }
    }
}

/// A read-only cursor over an [`OrderedMap`].
///
/// Since it only holds a shared borrow the map can't change while it exists,
/// but each cursor owns its own position, so independent searches over the
/// same map never disturb one another.
///
/// # Examples
/// ```
/// use ordered_cursor::OrderedMap;
///
/// let map = vec![(1, "x"), (5, "y")].into_iter().collect::<OrderedMap<_, _>>();
/// let mut cursor = map.cursor();
///
/// assert_eq!(cursor.current(), Some((&1, &"x")));
/// cursor.advance();
/// assert_eq!(cursor.current_key(), Some(&5));
/// cursor.advance();
/// assert!(cursor.is_exhausted());
///
/// cursor.reset();
/// assert_eq!(cursor.current_key(), Some(&1));
/// ```
///
/// [`OrderedMap`]: ../struct.OrderedMap.html
#[derive(Debug)]
pub struct Cursor<'m, K, V> {
    map: &'m OrderedMap<K, V>,
    position: Position,
}

impl<'m, K, V> Clone for Cursor<'m, K, V> {
    fn clone(&self) -> Self {
        Cursor {
            map: self.map,
            position: self.position,
        }
    }
}

impl<'m, K, V> Cursor<'m, K, V> {
    pub(crate) fn new(map: &'m OrderedMap<K, V>) -> Self {
        Cursor {
            map,
            position: map.start(),
        }
    }

    /// Return the entry under the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<(&'m K, &'m V)> {
        let map = self.map;
        self.position.slot().map(|slot| map.entry(slot))
    }

    /// Return the key under the cursor, or `None` once exhausted.
    pub fn current_key(&self) -> Option<&'m K> {
        self.current().map(|(key, _)| key)
    }

    /// Move to the next entry. Does nothing once exhausted.
    pub fn advance(&mut self) {
        self.position = self.map.step(self.position);
    }

    /// Move back to the first entry of the map.
    pub fn reset(&mut self) {
        self.position = self.map.start();
    }

    /// Returns true if there is no current entry and none can be reached by
    /// advancing.
    pub fn is_exhausted(&self) -> bool {
        self.position.is_exhausted()
    }
}

impl<'m, K: Hash + Eq, V> Cursor<'m, K, V> {
    /// Move the cursor onto the entry for `key`.
    ///
    /// # Errors
    /// Returns `Error::KeyMissing` and leaves the cursor where it was if the
    /// map has no such key.
    pub fn seek<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.map.slot_of(key).ok_or(Error::KeyMissing)?;
        self.position = Position::At(slot);

        Ok(())
    }
}

/// A cursor over an [`OrderedMap`] which may insert and remove entries as it
/// walks.
///
/// The rules are:
///
/// - A new key is appended at the tail, so it will be reached by advancing
///   unless the cursor is already exhausted.
/// - Removing the current entry leaves the cursor between entries;
///   [`current`] returns `None` until [`advance`] moves on to the entry that
///   followed it.
/// - Removing an entry the cursor has not reached yet means it is never
///   reached.
///
/// # Examples
/// ```
/// use ordered_cursor::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
///
/// let mut cursor = map.cursor_mut();
///
/// // Replace "a" with "c" while standing on it.
/// cursor.remove_current();
/// cursor.insert("c", 3);
///
/// cursor.advance();
/// assert_eq!(cursor.current_key(), Some(&"b"));
/// cursor.advance();
/// assert_eq!(cursor.current_key(), Some(&"c"));
/// cursor.advance();
/// assert!(cursor.is_exhausted());
/// ```
///
/// [`OrderedMap`]: ../struct.OrderedMap.html
/// [`current`]: struct.CursorMut.html#method.current
/// [`advance`]: struct.CursorMut.html#method.advance
#[derive(Debug)]
pub struct CursorMut<'m, K, V> {
    map: &'m mut OrderedMap<K, V>,
    position: Position,
}

impl<'m, K, V> CursorMut<'m, K, V> {
    pub(crate) fn new(map: &'m mut OrderedMap<K, V>) -> Self {
        let position = map.start();

        CursorMut { map, position }
    }

    /// Return the entry under the cursor.
    ///
    /// Returns `None` once exhausted, and also after the current entry has
    /// been removed but before the cursor has been advanced.
    pub fn current(&self) -> Option<(&K, &V)> {
        self.position.slot().map(|slot| self.map.entry(slot))
    }

    /// Return the entry under the cursor, with a mutable value.
    pub fn current_mut(&mut self) -> Option<(&K, &mut V)> {
        match self.position.slot() {
            Some(slot) => Some(self.map.entry_mut(slot)),
            None => None,
        }
    }

    /// Return the key under the cursor.
    pub fn current_key(&self) -> Option<&K> {
        self.current().map(|(key, _)| key)
    }

    /// Move to the next entry in the map's present order. Does nothing once
    /// exhausted.
    pub fn advance(&mut self) {
        self.position = self.map.step(self.position);
        trace!("Cursor moved to {:?}", self.position);
    }

    /// Move back to the first entry of the map.
    pub fn reset(&mut self) {
        self.position = self.map.start();
    }

    /// Returns true if there is no current entry and none can be reached by
    /// advancing.
    pub fn is_exhausted(&self) -> bool {
        self.position.is_exhausted()
    }

    /// Return the number of entries in the map.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Return true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// View the underlying map.
    pub fn map(&self) -> &OrderedMap<K, V> {
        &*self.map
    }

    fn detach(&mut self, slot: usize) {
        let next = self.map.next_of(slot);

        self.position = match self.position {
            Position::At(current) if current == slot => Position::Vacated(next),
            Position::Vacated(Some(waiting)) if waiting == slot => Position::Vacated(next),
            position => position,
        };
    }
}

impl<'m, K: Hash + Eq, V> CursorMut<'m, K, V> {
    /// Returns true if the map contains an entry for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Return a reference to the value stored for any key in the map.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    /// Return a mutable reference to the value stored for any key in the map.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get_mut(key)
    }

    /// Remove the entry for `key`, which may be the current one.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.map.slot_of(key)?;

        self.detach(slot);
        let (_, value) = self.map.remove_slot(slot);

        Some(value)
    }

    /// Remove the entry under the cursor, returning it.
    ///
    /// A following [`advance`] moves to the entry which came after it.
    ///
    /// [`advance`]: struct.CursorMut.html#method.advance
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let slot = self.position.slot()?;

        self.detach(slot);

        Some(self.map.remove_slot(slot))
    }

    /// Move the cursor onto the entry for `key`.
    ///
    /// # Errors
    /// Returns `Error::KeyMissing` and leaves the cursor where it was if the
    /// map has no such key.
    pub fn seek<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.map.slot_of(key).ok_or(Error::KeyMissing)?;
        self.position = Position::At(slot);

        Ok(())
    }
}

impl<'m, K: Hash + Eq + Clone, V> CursorMut<'m, K, V> {
    /// Insert a value for the key.
    ///
    /// A new key goes to the end of the map, where the cursor will still reach
    /// it. An existing key keeps its position and has its value replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (slot, previous) = self.map.insert_full(key, value);

        // The vacated tail was waiting on nothing; the new tail is next.
        if previous.is_none() && self.position == Position::Vacated(None) {
            self.position = Position::Vacated(Some(slot));
        }

        previous
    }
}
