//! A queue of callbacks run in registration order, where running callbacks
//! may register more.
//!
//! This is the shape of shutdown handling: everything registered before the
//! queue is run executes, and so does anything registered *while* it runs,
//! within the same call to [`CallbackQueue::run`].
//!
//! [`CallbackQueue::run`]: struct.CallbackQueue.html#method.run

use crate::{
    drain::{drain, DrainSignal},
    map::OrderedMap,
    Error, Result,
};
use std::fmt;

/// A queued callback.
pub type Callback = Box<dyn FnOnce(&mut Registrar) -> std::result::Result<(), failure::Error>>;

/// Handed to each running callback so it can queue further callbacks.
#[derive(Default)]
pub struct Registrar {
    next_id: u64,
    added: Vec<(u64, Callback)>,
}

impl Registrar {
    /// Queue a callback behind everything already queued, returning its id.
    pub fn register<F>(&mut self, callback: F) -> u64
    where
        F: FnOnce(&mut Registrar) -> std::result::Result<(), failure::Error> + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.added.push((id, Box::new(callback)));

        id
    }
}

impl fmt::Debug for Registrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar")
            .field("next_id", &self.next_id)
            .field("added", &self.added.len())
            .finish()
    }
}

/// Callbacks waiting to be run.
///
/// # Examples
/// ```
/// use ordered_cursor::CallbackQueue;
/// use std::{cell::RefCell, rc::Rc};
///
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let mut queue = CallbackQueue::new();
///
/// let first = log.clone();
/// queue.register(move |registrar| {
///     first.borrow_mut().push("flush cache");
///
///     let late = first.clone();
///     registrar.register(move |_| {
///         late.borrow_mut().push("close session");
///         Ok(())
///     });
///
///     Ok(())
/// });
///
/// let second = log.clone();
/// queue.register(move |_| {
///     second.borrow_mut().push("write log");
///     Ok(())
/// });
///
/// assert_eq!(queue.run().unwrap(), 3);
/// assert_eq!(*log.borrow(), vec!["flush cache", "write log", "close session"]);
/// assert!(queue.is_empty());
/// ```
#[derive(Default)]
pub struct CallbackQueue {
    callbacks: OrderedMap<u64, Callback>,
    next_id: u64,
}

impl CallbackQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        CallbackQueue::default()
    }

    /// Queue a callback, returning an id which can be passed to [`cancel`].
    ///
    /// [`cancel`]: struct.CallbackQueue.html#method.cancel
    pub fn register<F>(&mut self, callback: F) -> u64
    where
        F: FnOnce(&mut Registrar) -> std::result::Result<(), failure::Error> + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.insert(id, Box::new(callback));

        id
    }

    /// Drop a callback which hasn't run yet, returning true if it was queued.
    pub fn cancel(&mut self, id: u64) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    /// Return the number of callbacks waiting to run.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Return true if no callbacks are waiting.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run every queued callback, including ones registered along the way,
    /// and return how many ran.
    ///
    /// Each callback leaves the queue before it is called, so none runs
    /// twice.
    ///
    /// # Errors
    /// The first callback to fail stops the run with `Error::CallbackFailed`.
    /// Callbacks that had not run yet remain queued.
    pub fn run(&mut self) -> Result<usize> {
        let mut registrar = Registrar {
            next_id: self.next_id,
            added: Vec::new(),
        };
        let mut ran = 0;

        debug!("Running {} queued callbacks", self.callbacks.len());

        let outcome = drain(&mut self.callbacks, |_, worklist| {
            let callback = match worklist.remove_current() {
                Some((_, callback)) => callback,
                None => return DrainSignal::Continue,
            };

            let result = callback(&mut registrar);
            ran += 1;

            for (id, added) in registrar.added.drain(..) {
                trace!("Queued callback {} during run", id);
                worklist.insert(id, added);
            }

            match result {
                Ok(()) => DrainSignal::Continue,
                Err(err) => DrainSignal::abort(err.to_string()),
            }
        });

        self.next_id = registrar.next_id;

        match outcome {
            Ok(()) => Ok(ran),
            Err(aborted) => {
                let (id, reason) = aborted.into_parts();
                info!("Callback {} failed: {}", id, reason);

                Err(Error::CallbackFailed { id, reason })
            }
        }
    }
}

impl fmt::Debug for CallbackQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackQueue")
            .field("pending", &self.callbacks.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use failure::err_msg;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn empty_queue_runs_nothing() {
        let mut queue = CallbackQueue::new();

        assert_eq!(queue.run().unwrap(), 0);
    }

    #[test]
    fn cancelled_callback_never_runs() {
        let hits = Rc::new(RefCell::new(0));
        let mut queue = CallbackQueue::new();

        let counter = hits.clone();
        let id = queue.register(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.run().unwrap(), 0);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn failure_leaves_later_callbacks_queued() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut queue = CallbackQueue::new();

        let first = hits.clone();
        queue.register(move |_| {
            first.borrow_mut().push(0);
            Ok(())
        });
        let failing = queue.register(|_| Err(err_msg("disk full")));
        let last = hits.clone();
        queue.register(move |_| {
            last.borrow_mut().push(2);
            Ok(())
        });

        match queue.run() {
            Err(Error::CallbackFailed { id, reason }) => {
                assert_eq!(id, failing);
                assert_eq!(reason, "disk full");
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        assert_eq!(*hits.borrow(), vec![0]);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.run().unwrap(), 1);
        assert_eq!(*hits.borrow(), vec![0, 2]);
    }

    #[test]
    fn ids_stay_unique_across_runs() {
        let mut queue = CallbackQueue::new();

        queue.register(|registrar| {
            registrar.register(|_| Ok(()));
            Ok(())
        });
        queue.run().unwrap();

        let a = queue.register(|_| Ok(()));
        let b = queue.register(|_| Ok(()));

        assert_eq!((a, b), (2, 3));
    }

    #[test]
    fn nested_registrations_run_in_one_pass() {
        let depth = Rc::new(RefCell::new(0));
        let mut queue = CallbackQueue::new();

        fn chain(depth: Rc<RefCell<u32>>) -> impl FnOnce(&mut Registrar) -> std::result::Result<(), failure::Error> {
            move |registrar| {
                *depth.borrow_mut() += 1;
                if *depth.borrow() < 5 {
                    registrar.register(chain(depth.clone()));
                }
                Ok(())
            }
        }

        queue.register(chain(depth.clone()));

        assert_eq!(queue.run().unwrap(), 5);
        assert_eq!(*depth.borrow(), 5);
    }
}
