use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::query::{Query, StoreBacked};
use super::state::{FetchOutcome, FetchState};
use crate::error::HttpError;
use crate::store::{Resource, ResourceId};

/// Asks the user before a destructive call.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirmation already obtained by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confirmed;

impl Confirm for Confirmed {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The prompt was declined; nothing was sent.
    Declined,
}

struct Inner<Q: Query> {
    query: Q,
    state: watch::Sender<FetchState<Q::Output>>,
    generation: AtomicU64,
    key: Mutex<Option<Q::Key>>,
}

/// Fetch lifecycle for one query, applied latest-load-wins.
///
/// Clone-friendly via Arc; clones drive the same state.
pub struct ViewModel<Q: Query> {
    inner: Arc<Inner<Q>>,
}

impl<Q: Query> Clone for ViewModel<Q> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Q: Query> ViewModel<Q> {
    pub fn new(query: Q) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            inner: Arc::new(Inner {
                query,
                state,
                generation: AtomicU64::new(0),
                key: Mutex::new(None),
            }),
        }
    }

    pub fn query(&self) -> &Q {
        &self.inner.query
    }

    /// Current state.
    pub fn state(&self) -> FetchState<Q::Output> {
        self.inner.state.borrow().clone()
    }

    /// Receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<Q::Output>> {
        self.inner.state.subscribe()
    }

    /// The key of the most recent load.
    pub fn key(&self) -> Option<Q::Key> {
        self.inner
            .key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bind to `key` and fetch. Call on mount and on every dependency change.
    ///
    /// Sets `loading` and clears `error` immediately. On success the data is
    /// replaced; on failure the previous data stays and `error` is set. If
    /// another load starts before this one resolves, this result is dropped.
    pub async fn load(&self, key: Q::Key) -> FetchOutcome {
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *self.inner.key.lock().unwrap_or_else(PoisonError::into_inner) = Some(key.clone());
            state.loading = true;
            state.error = None;
        });

        let result = self.inner.query.fetch(key).await;
        if let Err(err) = &result {
            warn!(generation, error = %err, "fetch failed");
        }

        let applied = self.inner.state.send_if_modified(|state| {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            state.loading = false;
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(err) => state.error = Some(err.to_string()),
            }
            true
        });

        if applied {
            FetchOutcome::Applied
        } else {
            debug!(generation, "discarding superseded fetch result");
            FetchOutcome::Superseded
        }
    }

    /// Re-run the last load with the same key.
    pub async fn refetch(&self) -> FetchOutcome {
        match self.key() {
            Some(key) => self.load(key).await,
            None => FetchOutcome::Unbound,
        }
    }

    /// Spawn a task that refetches on every message from `changes`, until
    /// the sender side closes. Abort the handle to unsubscribe early.
    pub fn refresh_on<E>(&self, mut changes: broadcast::Receiver<E>) -> JoinHandle<()>
    where
        E: Clone + Send + 'static,
    {
        let view_model = self.clone();
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        view_model.refetch().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Surface a mutation failure without touching `data`.
    fn report(&self, err: &HttpError) {
        warn!(error = %err, "mutation failed");
        let message = err.to_string();
        self.inner.state.send_modify(|state| state.error = Some(message));
    }
}

impl<Q> ViewModel<Q>
where
    Q: Query + StoreBacked,
{
    /// Create through the store, then refetch.
    pub async fn create(
        &self,
        draft: &<Q::Resource as Resource>::Draft,
    ) -> Result<Q::Resource, HttpError> {
        match self.inner.query.store().create(draft).await {
            Ok(created) => {
                self.refetch().await;
                Ok(created)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Update through the store, then refetch.
    pub async fn update<P>(&self, id: ResourceId, patch: &P) -> Result<Q::Resource, HttpError>
    where
        P: Serialize + Sync + ?Sized,
    {
        match self.inner.query.store().update(id, patch).await {
            Ok(updated) => {
                self.refetch().await;
                Ok(updated)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Delete after `confirm` agrees, then refetch.
    ///
    /// A failed delete leaves `data` as it was and sets `error`.
    pub async fn remove(
        &self,
        id: ResourceId,
        confirm: &impl Confirm,
    ) -> Result<RemoveOutcome, HttpError> {
        let prompt = format!(
            "Delete {} {}? This cannot be undone.",
            <Q::Resource as Resource>::ITEM,
            id
        );
        if !confirm.confirm(&prompt) {
            return Ok(RemoveOutcome::Declined);
        }

        match self.inner.query.store().remove(id).await {
            Ok(()) => {
                self.refetch().await;
                Ok(RemoveOutcome::Removed)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }
}
