//! Single Flight Module
//!
//! Collapses concurrent loads of the same key into one execution.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{trace, warn};

/// Receiving side of an in-flight call; `None` until the load finishes.
type Pending<T> = watch::Receiver<Option<T>>;

type Calls<T> = Arc<Mutex<HashMap<String, Pending<T>>>>;

// == Single Flight ==
/// Per-key call-collapsing coordinator.
///
/// The first caller for a key starts the load; callers arriving while it
/// runs wait for and share its result. The load runs on its own task, so it
/// completes even if every caller waiting on it is dropped. The record is
/// removed as soon as the load finishes, so the next call after that starts
/// a fresh load.
///
/// The map lock only covers record lookup, creation and removal. Loads run
/// outside it, so distinct keys never wait on each other.
pub struct SingleFlight<T> {
    calls: Calls<T>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // == Run ==
    /// Runs `load` for `key` unless a load for the same key is already in
    /// flight, in which case its result is awaited and returned instead.
    ///
    /// Returns the value and whether this caller shared another caller's
    /// load, or `None` if the load panicked.
    pub async fn run<F, Fut>(&self, key: &str, load: F) -> Option<(T, bool)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (pending, shared) = {
            let mut calls = self.calls.lock();
            match calls.get(key) {
                Some(pending) => (pending.clone(), true),
                None => {
                    let (tx, rx) = watch::channel(None);
                    calls.insert(key.to_owned(), rx.clone());
                    let flight = Flight {
                        calls: self.calls.clone(),
                        key: key.to_owned(),
                        tx,
                    };
                    tokio::spawn(flight.complete(load()));
                    (rx, false)
                }
            }
        };

        if shared {
            trace!(key, "joining in-flight load");
        }
        let value = wait(pending).await;
        if value.is_none() {
            warn!(key, "in-flight load panicked");
        }
        value.map(|value| (value, shared))
    }

    /// Number of keys with a load in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

async fn wait<T: Clone>(mut pending: Pending<T>) -> Option<T> {
    let result = pending.wait_for(Option::is_some).await;
    result.ok().and_then(|value| value.clone())
}

// == Flight ==
/// Owned by the task running a load. The call record is removed before the
/// result is published, and again on drop if the load panicked, so the key
/// can always be loaded again.
struct Flight<T> {
    calls: Calls<T>,
    key: String,
    tx: watch::Sender<Option<T>>,
}

impl<T> Flight<T> {
    async fn complete<Fut>(self, load: Fut)
    where
        Fut: Future<Output = T>,
    {
        let value = load.await;
        self.release();
        self.tx.send_replace(Some(value));
    }

    fn release(&self) {
        let mut calls = self.calls.lock();
        if calls
            .get(&self.key)
            .is_some_and(|pending| pending.same_channel(&self.tx.subscribe()))
        {
            calls.remove(&self.key);
        }
    }
}

impl<T> Drop for Flight<T> {
    fn drop(&mut self) {
        self.release();
    }
}
