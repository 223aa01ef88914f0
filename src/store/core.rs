//! Shared store machinery
//!
//! A [`Store`] owns one state value behind a lock plus its loading / error
//! status. [`Store::run`] is the fetch-and-cache action every concrete store
//! builds on:
//!
//! 1. count the action as in flight, clear the previous error
//! 2. await the request
//! 3. apply the result only if this is still the newest request for the slice
//! 4. on failure record the message and push one error toast
//! 5. release the in-flight count
//!
//! [`Store::mutate`] is the same without step 3: a mutation the backend
//! accepted is always applied, and its failure is always reported.
//!
//! Every mutation bumps the shared [`Revision`] so the UI loop knows to redraw.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::api::ApiError;
use super::toast::Toasts;

/// Monotonic change counter observed by the UI loop
#[derive(Clone)]
pub struct Revision {
    tx: Arc<watch::Sender<u64>>,
}

impl Revision {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn bump(&self) {
        self.tx.send_modify(|v| *v = v.wrapping_add(1));
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::new()
    }
}

/// What every store shares: the toast queue and the revision counter
#[derive(Clone)]
pub struct StoreContext {
    pub toasts: Toasts,
    pub revision: Revision,
}

impl StoreContext {
    pub fn new(toasts: Toasts, revision: Revision) -> Self {
        Self { toasts, revision }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreStatus {
    pub in_flight: usize,
    pub error: Option<String>,
}

impl StoreStatus {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Identifies one issued request for one state slice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    slice: &'static str,
    seq: u64,
}

/// Per-slice request counters; only the newest ticket of a slice may write
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: HashMap<&'static str, u64>,
}

impl RequestSequence {
    pub fn issue(&mut self, slice: &'static str) -> Ticket {
        let seq = self.issued.entry(slice).or_insert(0);
        *seq += 1;
        Ticket { slice, seq: *seq }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        self.issued.get(ticket.slice) == Some(&ticket.seq)
    }

    /// Make every ticket issued so far stale
    pub fn invalidate_all(&mut self) {
        for seq in self.issued.values_mut() {
            *seq += 1;
        }
    }
}

struct Inner<S> {
    state: S,
    status: StoreStatus,
    sequence: RequestSequence,
}

pub struct Store<S> {
    name: &'static str,
    inner: Arc<Mutex<Inner<S>>>,
    ctx: StoreContext,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: self.inner.clone(),
            ctx: self.ctx.clone(),
        }
    }
}

impl<S: Clone + Send + 'static> Store<S> {
    pub fn new(name: &'static str, initial: S, ctx: &StoreContext) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(Inner {
                state: initial,
                status: StoreStatus::default(),
                sequence: RequestSequence::default(),
            })),
            ctx: ctx.clone(),
        }
    }

    pub fn toasts(&self) -> &Toasts {
        &self.ctx.toasts
    }

    pub async fn snapshot(&self) -> S {
        self.inner.lock().await.state.clone()
    }

    pub async fn status(&self) -> StoreStatus {
        self.inner.lock().await.status.clone()
    }

    pub async fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.lock().await.state)
    }

    pub async fn update(&self, f: impl FnOnce(&mut S)) {
        {
            let mut inner = self.inner.lock().await;
            f(&mut inner.state);
        }
        self.ctx.revision.bump();
    }

    /// Replace the whole state and drop any error; in-flight requests are
    /// invalidated so their late responses cannot resurrect old data.
    pub async fn reset(&self, initial: S) {
        {
            let mut inner = self.inner.lock().await;
            inner.state = initial;
            inner.status.error = None;
            inner.sequence.invalidate_all();
        }
        self.ctx.revision.bump();
    }

    /// Fetch-and-cache action.
    ///
    /// Returns the request's own value on success and `None` on failure. The
    /// store itself is only written when `slice` has not seen a newer request
    /// since this one was issued.
    pub async fn run<T, Fut, A>(&self, slice: &'static str, request: Fut, apply: A) -> Option<T>
    where
        T: Clone,
        Fut: Future<Output = Result<T, ApiError>>,
        A: FnOnce(&mut S, T),
    {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.status.in_flight += 1;
            inner.status.error = None;
            inner.sequence.issue(slice)
        };
        self.ctx.revision.bump();

        let outcome = request.await;

        let (result, toast) = {
            let mut inner = self.inner.lock().await;
            inner.status.in_flight = inner.status.in_flight.saturating_sub(1);
            let is_latest = inner.sequence.is_latest(&ticket);

            match outcome {
                Ok(value) => {
                    if is_latest {
                        apply(&mut inner.state, value.clone());
                    } else {
                        tracing::debug!(store = self.name, slice, "Discarding stale response");
                    }
                    (Some(value), None)
                }
                Err(err) => {
                    tracing::error!(store = self.name, slice, error = %err, "Store action failed");
                    if is_latest {
                        let message = err.message();
                        inner.status.error = Some(message.clone());
                        (None, Some(message))
                    } else {
                        tracing::debug!(store = self.name, slice, "Discarding stale failure");
                        (None, None)
                    }
                }
            }
        };

        if let Some(message) = toast {
            self.ctx.toasts.error(message).await;
        }
        self.ctx.revision.bump();
        result
    }

    /// Mutation action. Overlapping mutations never supersede each other.
    pub async fn mutate<T, Fut, A>(&self, action: &'static str, request: Fut, apply: A) -> Option<T>
    where
        Fut: Future<Output = Result<T, ApiError>>,
        A: FnOnce(&mut S, &T),
    {
        {
            let mut inner = self.inner.lock().await;
            inner.status.in_flight += 1;
            inner.status.error = None;
        }
        self.ctx.revision.bump();

        let outcome = request.await;

        let outcome = {
            let mut inner = self.inner.lock().await;
            inner.status.in_flight = inner.status.in_flight.saturating_sub(1);
            match outcome {
                Ok(value) => {
                    apply(&mut inner.state, &value);
                    Ok(value)
                }
                Err(err) => {
                    tracing::error!(store = self.name, action, error = %err, "Store action failed");
                    let message = err.message();
                    inner.status.error = Some(message.clone());
                    Err(message)
                }
            }
        };

        let result = match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                self.ctx.toasts.error(message).await;
                None
            }
        };
        self.ctx.revision.bump();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store() -> Store<Vec<u32>> {
        let revision = Revision::new();
        let ctx = StoreContext::new(Toasts::new(Duration::from_secs(5), revision.clone()), revision);
        Store::new("test", Vec::new(), &ctx)
    }

    #[test]
    fn test_sequence_only_latest_wins() {
        let mut seq = RequestSequence::default();
        let first = seq.issue("songs");
        let other = seq.issue("albums");
        let second = seq.issue("songs");
        assert!(!seq.is_latest(&first));
        assert!(seq.is_latest(&second));
        assert!(seq.is_latest(&other));

        seq.invalidate_all();
        assert!(!seq.is_latest(&second));
        let third = seq.issue("songs");
        assert_ne!(third, second);
        assert!(seq.is_latest(&third));
    }

    #[tokio::test]
    async fn test_success_replaces_slice() {
        let store = store();
        let out = store
            .run("items", async { Ok::<_, ApiError>(vec![1, 2, 3]) }, |s, v| *s = v)
            .await;
        assert_eq!(out, Some(vec![1, 2, 3]));
        assert_eq!(store.snapshot().await, vec![1, 2, 3]);
        assert!(!store.status().await.is_loading());
    }

    #[tokio::test]
    async fn test_failure_records_error_and_toasts_once() {
        let store = store();
        store.update(|s| s.push(7)).await;
        let out = store
            .run(
                "items",
                async { Err::<Vec<u32>, _>(ApiError::from_status(500, r#"{"message":"boom"}"#)) },
                |s, v| *s = v,
            )
            .await;
        assert_eq!(out, None);
        assert_eq!(store.snapshot().await, vec![7]);
        let status = store.status().await;
        assert_eq!(status.error.as_deref(), Some("boom"));
        assert!(!status.is_loading());
        assert_eq!(store.toasts().visible().await.len(), 1);
    }

    #[tokio::test]
    async fn test_new_action_clears_previous_error() {
        let store = store();
        store
            .run("items", async { Err::<Vec<u32>, _>(ApiError::Network("down".into())) }, |s, v| *s = v)
            .await;
        assert!(store.status().await.error.is_some());
        store.run("items", async { Ok::<_, ApiError>(vec![1]) }, |s, v| *s = v).await;
        assert_eq!(store.status().await.error, None);
    }

    #[tokio::test]
    async fn test_reset_invalidates_in_flight_requests() {
        let store = store();
        let slow = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .run(
                        "items",
                        async {
                            tokio::time::sleep(Duration::from_millis(40)).await;
                            Ok::<_, ApiError>(vec![9])
                        },
                        |s, v| *s = v,
                    )
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.reset(Vec::new()).await;
        assert_eq!(slow.await.unwrap(), Some(vec![9]));
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_mutations_all_apply_and_report() {
        let store = store();
        let slow_ok = store.mutate(
            "add",
            async {
                tokio::time::sleep(Duration::from_millis(40)).await;
                Ok::<_, ApiError>(1)
            },
            |s, v| s.push(*v),
        );
        let slow_err = store.mutate(
            "add",
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Err::<u32, _>(ApiError::from_status(409, r#"{"message":"already answered"}"#))
            },
            |s, v| s.push(*v),
        );
        let fast_ok = store.mutate("add", async { Ok::<_, ApiError>(2) }, |s, v| s.push(*v));

        let (a, b, c) = tokio::join!(slow_ok, slow_err, fast_ok);
        assert_eq!((a, b, c), (Some(1), None, Some(2)));
        assert_eq!(store.snapshot().await, vec![2, 1]);
        assert_eq!(store.toasts().visible().await.len(), 1);
        assert!(!store.status().await.is_loading());
    }

    #[tokio::test]
    async fn test_revision_moves_on_every_change() {
        let store = store();
        let mut rx = store.ctx.revision.subscribe();
        store.update(|s| s.push(1)).await;
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        assert!(!rx.has_changed().unwrap());
    }
}
