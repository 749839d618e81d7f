//! Processing a worklist to completion while the work itself changes it.

use crate::{cursor::CursorMut, map::OrderedMap};
use failure::Fail;
use std::{borrow::Borrow, fmt, hash::Hash};

/// What the drain should do after an action has handled an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainSignal {
    /// Move on to the next entry.
    Continue,
    /// Stop the drain immediately, reporting this reason against the entry
    /// being processed.
    Abort(String),
}

impl DrainSignal {
    /// Shorthand for `DrainSignal::Abort(reason.into())`.
    pub fn abort<R: Into<String>>(reason: R) -> Self {
        DrainSignal::Abort(reason.into())
    }
}

/// Failure returned by [`drain`] when an action asked to abort.
///
/// [`drain`]: fn.drain.html
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aborted<K> {
    key: K,
    reason: String,
}

impl<K> Aborted<K> {
    /// The key whose action requested the abort.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The reason given by the action.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Consume the failure, returning the key and reason.
    pub fn into_parts(self) -> (K, String) {
        (self.key, self.reason)
    }
}

impl<K: fmt::Debug> fmt::Display for Aborted<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Worklist drain aborted at {:?}: {}", self.key, self.reason)
    }
}

impl<K: fmt::Debug + Send + Sync + 'static> Fail for Aborted<K> {}

/// The action's view of the worklist while it is being drained.
///
/// Entries may be added or removed freely, including the one being processed.
/// The drain decides where to go next, so there is no way to move the cursor
/// from here.
pub struct Worklist<'m, K, V> {
    cursor: CursorMut<'m, K, V>,
}

impl<'m, K, V> Worklist<'m, K, V> {
    /// The key being processed, unless the action has removed it.
    pub fn key(&self) -> Option<&K> {
        self.cursor.current_key()
    }

    /// The value of the entry being processed, unless the action has removed
    /// it.
    pub fn value(&self) -> Option<&V> {
        self.cursor.current().map(|(_, value)| value)
    }

    /// Mutable access to the value of the entry being processed.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.cursor.current_mut().map(|(_, value)| value)
    }

    /// Return the number of entries still in the worklist, visited or not.
    pub fn len(&self) -> usize {
        self.cursor.len()
    }

    /// Return true if the worklist has no entries.
    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }
}

impl<'m, K: Hash + Eq, V> Worklist<'m, K, V> {
    /// Returns true if the key is in the worklist.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cursor.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cursor.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cursor.get_mut(key)
    }

    /// Remove an entry. An entry not yet visited will now be skipped.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cursor.remove(key)
    }

    /// Remove the entry being processed, handing it back to the action.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        self.cursor.remove_current()
    }
}

impl<'m, K: Hash + Eq + Clone, V> Worklist<'m, K, V> {
    /// Add an entry. A new key is queued behind everything already in the
    /// worklist and will be processed during this drain.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.cursor.insert(key, value)
    }
}

/// Run `action` over every entry of `worklist`, in order, until none are
/// left.
///
/// The action may grow or shrink the worklist as it goes. Entries it appends
/// are processed later in the same drain, after everything that was queued
/// before them, and entries it removes are never processed. Visited entries
/// stay in the map unless the action removes them.
///
/// # Errors
/// If an action returns `DrainSignal::Abort`, the drain stops at once and the
/// key being processed is returned together with the reason. Nothing is
/// rolled back.
///
/// # Examples
/// ```
/// use ordered_cursor::{drain, DrainSignal, OrderedMap};
/// use std::collections::HashMap;
///
/// let mut requires = HashMap::new();
/// requires.insert("forum", vec!["taxonomy", "comment"]);
/// requires.insert("taxonomy", vec![]);
/// requires.insert("comment", vec!["text"]);
/// requires.insert("text", vec![]);
///
/// let mut enable = OrderedMap::new();
/// enable.insert("forum", ());
///
/// drain(&mut enable, |module, worklist| {
///     let dependencies = match requires.get(module) {
///         Some(dependencies) => dependencies,
///         None => return DrainSignal::abort("missing module"),
///     };
///
///     for &dependency in dependencies {
///         if !worklist.contains_key(dependency) {
///             worklist.insert(dependency, ());
///         }
///     }
///
///     DrainSignal::Continue
/// })
/// .unwrap();
///
/// let order = enable.keys().cloned().collect::<Vec<_>>();
/// assert_eq!(order, vec!["forum", "taxonomy", "comment", "text"]);
/// ```
pub fn drain<'m, K, V, F>(worklist: &'m mut OrderedMap<K, V>, mut action: F) -> Result<(), Aborted<K>>
where
    K: Clone + fmt::Debug,
    F: FnMut(&K, &mut Worklist<'m, K, V>) -> DrainSignal,
{
    debug!("Draining worklist of {} entries", worklist.len());

    let mut worklist = Worklist {
        cursor: CursorMut::new(worklist),
    };
    let mut visited = 0;

    while let Some(key) = worklist.cursor.current_key().cloned() {
        trace!("Processing {:?}", key);

        match action(&key, &mut worklist) {
            DrainSignal::Continue => worklist.cursor.advance(),
            DrainSignal::Abort(reason) => {
                info!("Aborting drain at {:?}: {}", key, reason);

                return Err(Aborted { key, reason });
            }
        }

        visited += 1;
    }

    debug!("Worklist drained after {} entries", visited);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worklist(keys: &[&'static str]) -> OrderedMap<&'static str, u32> {
        keys.iter().map(|&key| (key, 0)).collect()
    }

    #[test]
    fn empty_worklist_never_calls_action() {
        let mut map = worklist(&[]);
        let mut calls = 0;

        drain(&mut map, |_, _| {
            calls += 1;
            DrainSignal::Continue
        })
        .unwrap();

        assert_eq!(calls, 0);
    }

    #[test]
    fn action_sees_its_own_entry() {
        let mut map = worklist(&["a", "b"]);

        drain(&mut map, |key, worklist| {
            assert_eq!(worklist.key(), Some(key));
            *worklist.value_mut().unwrap() += 1;
            DrainSignal::Continue
        })
        .unwrap();

        assert_eq!(map.values().cloned().collect::<Vec<_>>(), vec![1, 1]);
    }

    #[test]
    fn self_removal_then_append_is_visited() {
        let mut map = worklist(&["a"]);
        let mut seen = Vec::new();

        drain(&mut map, |&key, worklist| {
            seen.push(key);
            if key == "a" {
                assert_eq!(worklist.remove_current(), Some(("a", 0)));
                assert_eq!(worklist.value(), None);
                worklist.insert("b", 0);
            }
            DrainSignal::Continue
        })
        .unwrap();

        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn reinserting_visited_key_does_not_revisit() {
        let mut map = worklist(&["a", "b"]);
        let mut seen = Vec::new();

        drain(&mut map, |&key, worklist| {
            seen.push(key);
            if key == "b" {
                worklist.insert("a", 7);
            }
            DrainSignal::Continue
        })
        .unwrap();

        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&7));
    }

    #[test]
    fn aborted_renders_key_and_reason() {
        let aborted = Aborted {
            key: "b",
            reason: "missing-metadata:b".to_owned(),
        };

        assert_eq!(
            aborted.to_string(),
            "Worklist drain aborted at \"b\": missing-metadata:b"
        );
        assert_eq!(aborted.into_parts(), ("b", "missing-metadata:b".to_owned()));
    }
}
