//! Locating a key within an ordered sequence, such as a tree which has been
//! flattened into visit order.

use crate::{cursor::Cursor, map::OrderedMap};
use std::borrow::Borrow;

/// A reusable search over one ordered sequence.
///
/// Every search starts by resetting the cursor to the first entry, so a
/// `Trail` can be asked any number of questions and always answers from the
/// whole sequence.
///
/// An empty sequence and a sequence lacking the target give the same `None`.
/// Check [`is_empty`] first when the difference matters.
///
/// # Examples
/// ```
/// use ordered_cursor::{OrderedMap, Trail};
///
/// let pages = vec![(1, "Intro"), (5, "Setup"), (9, "Usage")]
///     .into_iter()
///     .collect::<OrderedMap<_, _>>();
/// let mut trail = Trail::new(&pages);
///
/// assert_eq!(trail.find(&5), Some(&"Setup"));
/// assert_eq!(trail.predecessor(&5), Some(&"Intro"));
/// assert_eq!(trail.successor(&5), Some(&"Usage"));
///
/// assert_eq!(trail.predecessor(&1), None);
/// assert_eq!(trail.successor(&9), None);
/// assert_eq!(trail.find(&7), None);
/// ```
///
/// [`is_empty`]: struct.Trail.html#method.is_empty
#[derive(Debug)]
pub struct Trail<'m, K, V> {
    cursor: Cursor<'m, K, V>,
}

impl<'m, K, V> Trail<'m, K, V> {
    /// Create a trail over `sequence`.
    pub fn new(sequence: &'m OrderedMap<K, V>) -> Self {
        Trail {
            cursor: sequence.cursor(),
        }
    }

    /// Returns true if the sequence has no entries at all.
    pub fn is_empty(&self) -> bool {
        let mut cursor = self.cursor.clone();
        cursor.reset();
        cursor.is_exhausted()
    }

    /// Return the node stored under `target`.
    pub fn find<Q>(&mut self, target: &Q) -> Option<&'m V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if self.seek(target) {
            self.cursor.current().map(|(_, node)| node)
        } else {
            None
        }
    }

    /// Return the node immediately before the one stored under `target`.
    ///
    /// Returns `None` when `target` is the first node or isn't present.
    pub fn predecessor<Q>(&mut self, target: &Q) -> Option<&'m V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.cursor.reset();

        let mut previous = None;

        while let Some((key, node)) = self.cursor.current() {
            if key.borrow() == target {
                return previous;
            }

            previous = Some(node);
            self.cursor.advance();
        }

        None
    }

    /// Return the node immediately after the one stored under `target`.
    ///
    /// Returns `None` when `target` is the last node or isn't present.
    pub fn successor<Q>(&mut self, target: &Q) -> Option<&'m V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if !self.seek(target) {
            return None;
        }

        self.cursor.advance();
        self.cursor.current().map(|(_, node)| node)
    }

    // Leaves the cursor on the match, or exhausted.
    fn seek<Q>(&mut self, target: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.cursor.reset();

        while let Some(key) = self.cursor.current_key() {
            if key.borrow() == target {
                return true;
            }

            self.cursor.advance();
        }

        false
    }
}

/// Return the node stored under `target` in `sequence`, walking it in order.
///
/// Keys are compared for exact equality only.
pub fn find_in_order<'m, K, V, Q>(sequence: &'m OrderedMap<K, V>, target: &Q) -> Option<&'m V>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    Trail::new(sequence).find(target)
}

/// Return the node just before `target` in `sequence`.
pub fn find_predecessor<'m, K, V, Q>(sequence: &'m OrderedMap<K, V>, target: &Q) -> Option<&'m V>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    Trail::new(sequence).predecessor(target)
}

/// Return the node just after `target` in `sequence`.
pub fn find_successor<'m, K, V, Q>(sequence: &'m OrderedMap<K, V>, target: &Q) -> Option<&'m V>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    Trail::new(sequence).successor(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> OrderedMap<u32, &'static str> {
        vec![(1, "x"), (5, "y"), (9, "z")].into_iter().collect()
    }

    #[test]
    fn single_entry_has_no_neighbours() {
        let map = vec![(3, "only")].into_iter().collect::<OrderedMap<_, _>>();

        assert_eq!(find_in_order(&map, &3), Some(&"only"));
        assert_eq!(find_predecessor(&map, &3), None);
        assert_eq!(find_successor(&map, &3), None);
    }

    #[test]
    fn empty_sequence_finds_nothing() {
        let map: OrderedMap<u32, &str> = OrderedMap::new();
        let mut trail = Trail::new(&map);

        assert!(trail.is_empty());
        assert_eq!(trail.find(&1), None);
        assert_eq!(trail.predecessor(&1), None);
        assert_eq!(trail.successor(&1), None);
    }

    #[test]
    fn last_entry_predecessor() {
        let map = book();

        assert_eq!(find_predecessor(&map, &9), Some(&"y"));
        assert_eq!(find_successor(&map, &1), Some(&"y"));
    }

    #[test]
    fn searches_do_not_depend_on_previous_ones() {
        let map = book();
        let mut trail = Trail::new(&map);

        assert!(!trail.is_empty());
        assert_eq!(trail.successor(&9), None);
        assert_eq!(trail.find(&1), Some(&"x"));
        assert_eq!(trail.predecessor(&5), Some(&"x"));
        assert_eq!(trail.find(&1), Some(&"x"));
    }

    #[test]
    fn borrowed_key_forms() {
        let map = vec![("intro".to_owned(), 1), ("usage".to_owned(), 2)]
            .into_iter()
            .collect::<OrderedMap<_, _>>();

        assert_eq!(find_in_order(&map, "usage"), Some(&2));
        assert_eq!(find_predecessor(&map, "usage"), Some(&1));
    }
}
