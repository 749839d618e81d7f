//! The purpose of this crate is to walk an ordered collection while that same
//! walk is adding entries to it and removing entries from it.
//!
//! Two jobs need this. The first is draining a worklist where handling one
//! entry can queue new ones, such as enabling a module which pulls in its
//! dependencies, or running shutdown callbacks which register more shutdown
//! callbacks. The second is searching an ordered sequence for a key and
//! stopping exactly on it, or just before or after it, such as finding the
//! previous and next pages of a book outline.
//!
//! ## Why not a `for` loop
//!
//! A `for` loop over the keys of a map either borrows the map, which rules
//! out changing it, or iterates a copy collected up front. With a copy, an
//! entry queued halfway through the loop is never processed, and an entry
//! removed halfway through is processed anyway. Nothing fails; the results
//! are just wrong.
//!
//! The cursors in this crate look at the map as it is on every step. An
//! [`OrderedMap`] remembers insertion order. A [`CursorMut`] walks it and may
//! insert or remove entries as it goes, including the one it is standing on.
//! Because the cursor holds the map's only mutable borrow, there is never
//! more than one position advancing over a changing map.
//!
//! ## Examples
//!
//! ```
//! use ordered_cursor::{drain, find_predecessor, DrainSignal, OrderedMap};
//!
//! let mut worklist = OrderedMap::new();
//! worklist.insert("a", false);
//! worklist.insert("b", false);
//! worklist.insert("c", false);
//!
//! let mut visited = Vec::new();
//!
//! drain(&mut worklist, |&key, worklist| {
//!     visited.push(key);
//!
//!     match key {
//!         "a" => {
//!             worklist.insert("d", false);
//!         }
//!         "b" => {
//!             worklist.remove("c");
//!         }
//!         _ => {}
//!     }
//!
//!     DrainSignal::Continue
//! })
//! .unwrap();
//!
//! assert_eq!(visited, vec!["a", "b", "d"]);
//!
//! let outline = vec![(1, "x"), (5, "y"), (9, "z")]
//!     .into_iter()
//!     .collect::<OrderedMap<_, _>>();
//!
//! assert_eq!(find_predecessor(&outline, &5), Some(&"x"));
//! assert_eq!(find_predecessor(&outline, &1), None);
//! ```

extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate slab;

mod callbacks;
mod cursor;
mod drain;
mod map;
mod search;

pub use crate::{
    callbacks::{Callback, CallbackQueue, Registrar},
    cursor::{Cursor, CursorMut},
    drain::{drain, Aborted, DrainSignal, Worklist},
    map::{Iter, OrderedMap},
    search::{find_in_order, find_predecessor, find_successor, Trail},
};

/// Different types of failures that can occur while positioning a cursor or
/// running queued callbacks.
#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "Key was not found in map")]
    KeyMissing,
    #[fail(display = "Callback {} failed: {}", id, reason)]
    CallbackFailed { id: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
