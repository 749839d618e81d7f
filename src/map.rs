//! Insertion-ordered map backing every cursor in this crate.

use crate::cursor::{Cursor, CursorMut, Position};
use slab::Slab;
use std::{
    borrow::Borrow,
    cmp::Ordering,
    collections::HashMap,
    fmt,
    hash::Hash,
    iter::FromIterator,
    mem,
};

/// A map which remembers the order its keys were first inserted in.
///
/// Entries live in an arena and are threaded together in a doubly linked
/// list, so removing an entry never disturbs the position of any other entry.
/// A [`HashMap`] from key to arena slot provides constant time lookup.
///
/// Iterating with [`iter`] borrows the map, so the order can't change
/// underneath it. To walk the map while inserting or removing entries, use a
/// [`CursorMut`] from [`cursor_mut`]; it observes the live order on every
/// step.
///
/// # Examples
/// ```
/// use ordered_cursor::OrderedMap;
///
/// let mut modules = OrderedMap::new();
/// modules.insert("node", 0);
/// modules.insert("field", 1);
/// modules.insert("user", 2);
///
/// assert_eq!(modules.remove("field"), Some(1));
/// modules.insert("field", 3);
///
/// let keys = modules.keys().cloned().collect::<Vec<_>>();
/// assert_eq!(keys, vec!["node", "user", "field"]);
/// ```
///
/// [`iter`]: struct.OrderedMap.html#method.iter
/// [`cursor_mut`]: struct.OrderedMap.html#method.cursor_mut
/// [`CursorMut`]: struct.CursorMut.html
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    entries: Slab<Entry<K, V>>,
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<K, V> OrderedMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        OrderedMap {
            entries: Slab::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    /// Create an empty map with room for `capacity` entries before it
    /// reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            entries: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Return the number of entries in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if there are no entries in the map.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the first entry in order.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.head.map(|slot| self.entry(slot))
    }

    /// Return the last entry in order.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tail.map(|slot| self.entry(slot))
    }

    /// Return an iterator over the entries of the map, in order.
    ///
    /// # Examples
    /// ```
    /// use ordered_cursor::OrderedMap;
    ///
    /// let map = vec![(1, "x"), (5, "y"), (9, "z")]
    ///     .into_iter()
    ///     .collect::<OrderedMap<_, _>>();
    ///
    /// let pairs = map.iter().collect::<Vec<_>>();
    /// assert_eq!(pairs, vec![(&1, &"x"), (&5, &"y"), (&9, &"z")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            next: self.head,
            remaining: self.len(),
        }
    }

    /// Return an iterator over the keys of the map, in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Return an iterator over the values of the map, in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Return a read-only cursor positioned on the first entry.
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self)
    }

    /// Return a cursor positioned on the first entry, through which the map
    /// may be modified while it is being walked.
    ///
    /// The cursor holds the only mutable borrow of the map, so there is never
    /// more than one position advancing over a changing map.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V> {
        CursorMut::new(self)
    }

    /// Reorder the entries with a comparator over `(key, value)` pairs.
    ///
    /// The sort is stable and keys stay attached to their values.
    ///
    /// # Examples
    /// ```
    /// use ordered_cursor::OrderedMap;
    ///
    /// let mut operations = OrderedMap::new();
    /// operations.insert("delete", "Delete item");
    /// operations.insert("archive", "archive item");
    /// operations.insert("publish", "Publish item");
    ///
    /// operations.sort_by(|_, a, _, b| a.to_lowercase().cmp(&b.to_lowercase()));
    ///
    /// let keys = operations.keys().cloned().collect::<Vec<_>>();
    /// assert_eq!(keys, vec!["archive", "delete", "publish"]);
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&K, &V, &K, &V) -> Ordering,
    {
        let mut order = self.slots().collect::<Vec<_>>();

        order.sort_by(|&a, &b| {
            let (a, b) = (&self.entries[a], &self.entries[b]);
            compare(&a.key, &a.value, &b.key, &b.value)
        });

        self.relink(&order);
    }

    pub(crate) fn start(&self) -> Position {
        self.head.map_or(Position::Exhausted, Position::At)
    }

    pub(crate) fn step(&self, position: Position) -> Position {
        let next = match position {
            Position::At(slot) => self.entries[slot].next,
            Position::Vacated(next) => next,
            Position::Exhausted => None,
        };

        next.map_or(Position::Exhausted, Position::At)
    }

    pub(crate) fn entry(&self, slot: usize) -> (&K, &V) {
        let entry = &self.entries[slot];
        (&entry.key, &entry.value)
    }

    pub(crate) fn entry_mut(&mut self, slot: usize) -> (&K, &mut V) {
        let entry = &mut self.entries[slot];
        (&entry.key, &mut entry.value)
    }

    pub(crate) fn next_of(&self, slot: usize) -> Option<usize> {
        self.entries[slot].next
    }

    fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.head;

        std::iter::from_fn(move || {
            let slot = next?;
            next = self.entries[slot].next;
            Some(slot)
        })
    }

    fn relink(&mut self, order: &[usize]) {
        self.head = order.first().copied();
        self.tail = order.last().copied();

        for (position, &slot) in order.iter().enumerate() {
            let entry = &mut self.entries[slot];
            entry.prev = position.checked_sub(1).map(|prev| order[prev]);
            entry.next = order.get(position + 1).copied();
        }
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    /// Returns true if the map contains an entry for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Return a reference to the value stored for the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slot_of(key).map(|slot| &self.entries[slot].value)
    }

    /// Return a mutable reference to the value stored for the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.slot_of(key)?;
        Some(&mut self.entries[slot].value)
    }

    /// Remove the entry for the key, returning its value if it was present.
    ///
    /// The relative order of the remaining entries is unchanged.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.slot_of(key)?;
        let (_, value) = self.remove_slot(slot);
        Some(value)
    }

    pub(crate) fn slot_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    pub(crate) fn remove_slot(&mut self, slot: usize) -> (K, V) {
        let entry = self.entries.remove(slot);

        match entry.prev {
            Some(prev) => self.entries[prev].next = entry.next,
            None => self.head = entry.next,
        }

        match entry.next {
            Some(next) => self.entries[next].prev = entry.prev,
            None => self.tail = entry.prev,
        }

        self.index.remove(&entry.key);

        (entry.key, entry.value)
    }
}

impl<K: Hash + Eq + Clone, V> OrderedMap<K, V> {
    /// Insert a value for the key.
    ///
    /// A new key is appended after every existing entry. If the key is already
    /// present its value is replaced, its position is kept, and the old value
    /// is returned.
    ///
    /// # Examples
    /// ```
    /// use ordered_cursor::OrderedMap;
    /// let mut map = OrderedMap::new();
    ///
    /// assert_eq!(map.insert("a", 1), None);
    /// assert_eq!(map.insert("b", 2), None);
    /// assert_eq!(map.insert("a", 3), Some(1));
    ///
    /// assert_eq!(map.first(), Some((&"a", &3)));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_full(key, value).1
    }

    pub(crate) fn insert_full(&mut self, key: K, value: V) -> (usize, Option<V>) {
        if let Some(&slot) = self.index.get(&key) {
            let previous = mem::replace(&mut self.entries[slot].value, value);
            return (slot, Some(previous));
        }

        let slot = self.entries.insert(Entry {
            key: key.clone(),
            value,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail) => self.entries[tail].next = Some(slot),
            None => self.head = Some(slot),
        }

        self.tail = Some(slot);
        self.index.insert(key, slot);

        (slot, None)
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        OrderedMap::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Hash + Eq + Clone, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq + Clone, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of an [`OrderedMap`], in order.
///
/// [`OrderedMap`]: struct.OrderedMap.html
pub struct Iter<'a, K, V> {
    map: &'a OrderedMap<K, V>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.next?;
        let entry = &self.map.entries[slot];

        self.next = entry.next;
        self.remaining -= 1;

        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
