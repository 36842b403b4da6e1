//! Request-state tracking for a single async read
//!
//! [`UseFetch`] wraps a zero-argument producer (anything that returns a
//! future of `Result<T, E>`) and keeps a `{data, loading, error}` snapshot
//! of its most recent outcome that callers can read synchronously.
//!
//! ```no_run
//! # async fn demo() {
//! use cinefetch::fetch::{FetchError, UseFetch};
//!
//! let handle = UseFetch::new(|| async { Ok::<_, FetchError>(42) }, true);
//! assert!(handle.loading());
//! handle.settled().await;
//! assert_eq!(handle.data(), Some(42));
//! # }
//! ```
//!
//! Overlapping calls are not cancelled. Whichever call settles last decides
//! the final `data`/`error` (last-settled-wins), and the first call to
//! settle clears `loading` even if another one is still in flight.
//! `reset()` forgets every call still in flight.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

// =============================================================================
// Errors
// =============================================================================

/// Failure recorded in [`FetchState::error`]
///
/// Producers may fail with any error type that converts into this one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or transport failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// The remote resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad arguments, or the producer panicked
    #[error("Invalid request: {0}")]
    Misuse(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(err: anyhow::Error) -> Self {
        FetchError::Transport(format!("{:#}", err))
    }
}

impl From<String> for FetchError {
    fn from(msg: String) -> Self {
        FetchError::Transport(msg)
    }
}

impl From<&str> for FetchError {
    fn from(msg: &str) -> Self {
        FetchError::Transport(msg.to_string())
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Where a fetch currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Never started, or reset
    Idle,
    /// A producer call is in flight
    Loading,
    /// The last settled call succeeded
    Success,
    /// The last settled call failed
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "loading"),
            Phase::Success => write!(f, "success"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

/// Observable state of a [`UseFetch`] handle
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.data.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

type Producer<T> = dyn Fn() -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync;

/// State shared between the handle and its in-flight settle futures
///
/// `disposed` and `first_live_call` are only trusted while `state` is
/// locked; every mutation re-checks them under that lock.
struct Shared<T> {
    state: Mutex<FetchState<T>>,
    disposed: AtomicBool,
    settled: Notify,
    next_call: AtomicU64,
    /// Calls numbered below this were started before the last `reset()`
    first_live_call: AtomicU64,
}

impl<T> Shared<T> {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn settle(&self, call: u64, outcome: Result<T, FetchError>) {
        {
            let mut state = self.state.lock();

            if self.is_disposed() {
                tracing::debug!(call, "fetch settled after dispose, result discarded");
                return;
            }
            if call < self.first_live_call.load(Ordering::Acquire) {
                tracing::debug!(call, "fetch settled after reset, result discarded");
                return;
            }

            match outcome {
                Ok(value) => {
                    tracing::debug!(call, "fetch succeeded");
                    state.data = Some(value);
                    state.error = None;
                }
                Err(err) => {
                    tracing::debug!(call, error = %err, "fetch failed");
                    state.error = Some(err);
                }
            }
            state.loading = false;
        }

        self.settled.notify_waiters();
    }
}

/// Owner of one async read and its `{data, loading, error}` snapshot
///
/// Dropping the handle disposes it: calls still in flight complete without
/// touching the state.
pub struct UseFetch<T> {
    shared: Arc<Shared<T>>,
    producer: Box<Producer<T>>,
}

impl<T: Send + 'static> UseFetch<T> {
    /// Wrap `producer`. With `auto_fetch` the producer is invoked before this
    /// returns and the call is driven on the current tokio runtime.
    ///
    /// Auto-fetching requires a running tokio runtime.
    pub fn new<F, Fut, E>(producer: F, auto_fetch: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<FetchError> + 'static,
    {
        let producer: Box<Producer<T>> = Box::new(move || {
            producer()
                .map(|res| res.map_err(Into::<FetchError>::into))
                .boxed()
        });

        let handle = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(FetchState::default()),
                disposed: AtomicBool::new(false),
                settled: Notify::new(),
                next_call: AtomicU64::new(0),
                first_live_call: AtomicU64::new(0),
            }),
            producer,
        };

        if auto_fetch {
            handle.spawn_fetch();
        }

        handle
    }

    /// Start a producer call.
    ///
    /// The state flips to loading and the producer is invoked before this
    /// returns; the returned future only waits for the outcome and records
    /// it. Dropping the future without polling it leaves `loading` set.
    pub fn fetch(&self) -> impl Future<Output = ()> + Send + 'static {
        let shared = Arc::clone(&self.shared);

        let call = {
            let mut state = shared.state.lock();
            let call = shared.next_call.fetch_add(1, Ordering::AcqRel);
            if !shared.is_disposed() {
                state.loading = true;
                state.error = None;
            }
            call
        };

        tracing::trace!(call, "fetch started");

        let pending = std::panic::catch_unwind(AssertUnwindSafe(|| (self.producer)()));

        async move {
            let outcome = match pending {
                Ok(fut) => match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(res) => res,
                    Err(payload) => Err(panic_error(payload)),
                },
                Err(payload) => Err(panic_error(payload)),
            };
            shared.settle(call, outcome);
        }
    }

    /// Same as [`fetch`](Self::fetch).
    pub fn refetch(&self) -> impl Future<Output = ()> + Send + 'static {
        self.fetch()
    }

    /// Start a producer call and drive it on the tokio runtime.
    pub fn spawn_fetch(&self) -> JoinHandle<()> {
        tokio::spawn(self.fetch())
    }
}

impl<T> UseFetch<T> {
    /// Back to idle: no data, no error, not loading.
    ///
    /// Calls already in flight are forgotten; their results are discarded.
    pub fn reset(&self) {
        {
            let mut state = self.shared.state.lock();
            if self.shared.is_disposed() {
                return;
            }
            let next = self.shared.next_call.load(Ordering::Acquire);
            self.shared.first_live_call.store(next, Ordering::Release);
            *state = FetchState::default();
        }
        self.shared.settled.notify_waiters();
    }

    pub fn loading(&self) -> bool {
        self.shared.state.lock().loading
    }

    pub fn error(&self) -> Option<FetchError> {
        self.shared.state.lock().error.clone()
    }

    pub fn phase(&self) -> Phase {
        self.shared.state.lock().phase()
    }

    /// Borrow the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&FetchState<T>) -> R) -> R {
        f(&self.shared.state.lock())
    }

    /// Stop accepting results. Calls still in flight finish but are ignored.
    ///
    /// Only flips a flag, so it is safe to call from inside
    /// [`with_state`](Self::with_state); a settle blocked on the state lock
    /// sees the flag once it gets the lock.
    pub fn dispose(&self) {
        if !self.shared.disposed.swap(true, Ordering::AcqRel) {
            tracing::trace!("fetch handle disposed");
            self.shared.settled.notify_waiters();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    /// Wait until nothing is loading, or the handle is disposed.
    pub async fn settled(&self) {
        loop {
            let notified = self.shared.settled.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.shared.is_disposed() || !self.loading() {
                return;
            }
            notified.await;
        }
    }
}

impl<T: Clone> UseFetch<T> {
    pub fn data(&self) -> Option<T> {
        self.shared.state.lock().data.clone()
    }

    pub fn snapshot(&self) -> FetchState<T> {
        self.shared.state.lock().clone()
    }
}

impl<T> Drop for UseFetch<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T> fmt::Debug for UseFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseFetch")
            .field("phase", &self.phase())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Turn a panic payload into a [`FetchError::Misuse`]
fn panic_error(payload: Box<dyn Any + Send>) -> FetchError {
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "producer panicked".to_string());
    FetchError::Misuse(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready, task};

    fn counting_producer(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn() -> futures::future::Ready<Result<u32, FetchError>> + Send + Sync + 'static {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) as u32;
            futures::future::ready(Ok(n + 1))
        }
    }

    #[test]
    fn test_phase_from_state() {
        let mut state = FetchState::<u32>::default();
        assert_eq!(state.phase(), Phase::Idle);

        state.loading = true;
        assert_eq!(state.phase(), Phase::Loading);

        state.loading = false;
        state.data = Some(1);
        assert_eq!(state.phase(), Phase::Success);

        state.error = Some(FetchError::Transport("boom".into()));
        assert_eq!(state.phase(), Phase::Failed);
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(
            FetchError::Transport("timeout".into()).to_string(),
            "Request failed: timeout"
        );
        assert_eq!(
            FetchError::NotFound("movie 1".into()).to_string(),
            "Not found: movie 1"
        );
        assert!(FetchError::NotFound("x".into()).is_not_found());
        assert!(!FetchError::Misuse("x".into()).is_not_found());
    }

    #[test]
    fn test_fetch_flips_loading_before_poll() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = UseFetch::new(counting_producer(calls.clone()), false);

        let fut = handle.fetch();
        assert!(handle.loading());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let mut fut = task::spawn(fut);
        assert_ready!(fut.poll());
        assert!(!handle.loading());
        assert_eq!(handle.data(), Some(1));
    }

    #[test]
    fn test_fetch_pending_until_producer_resolves() {
        let (tx, rx) = futures::channel::oneshot::channel::<u32>();
        let rx = Arc::new(Mutex::new(Some(rx)));
        let handle = UseFetch::new(
            move || {
                let rx = rx.lock().take();
                async move {
                    match rx {
                        Some(rx) => rx.await.map_err(|_| FetchError::from("sender dropped")),
                        None => Err(FetchError::from("already taken")),
                    }
                }
            },
            false,
        );

        let mut fut = task::spawn(handle.fetch());
        assert_pending!(fut.poll());
        assert_eq!(handle.phase(), Phase::Loading);

        tx.send(7).unwrap();
        assert!(fut.is_woken());
        assert_ready!(fut.poll());
        assert_eq!(handle.data(), Some(7));
        assert_eq!(handle.phase(), Phase::Success);
    }

    #[test]
    fn test_reset_clears_everything() {
        let handle = UseFetch::new(|| async { Ok::<_, FetchError>("x") }, false);
        let mut fut = task::spawn(handle.fetch());
        assert_ready!(fut.poll());
        assert_eq!(handle.data(), Some("x"));

        handle.reset();
        assert_eq!(handle.snapshot(), FetchState::default());
        assert_eq!(handle.phase(), Phase::Idle);
    }

    #[test]
    fn test_panicking_producer_call_is_captured() {
        let handle: UseFetch<u32> = UseFetch::new(
            || -> futures::future::Ready<Result<u32, FetchError>> { panic!("bad id") },
            false,
        );

        let mut fut = task::spawn(handle.fetch());
        assert_ready!(fut.poll());

        assert!(!handle.loading());
        assert_eq!(handle.error(), Some(FetchError::Misuse("bad id".into())));
    }

    #[test]
    fn test_drop_disposes() {
        let handle = UseFetch::new(|| async { Ok::<_, FetchError>(1u8) }, false);
        let fut = handle.fetch();
        drop(handle);

        // Settling after the owner is gone must not panic.
        let mut fut = task::spawn(fut);
        assert_ready!(fut.poll());
    }

    #[tokio::test]
    async fn test_settled_returns_on_dispose() {
        let handle = UseFetch::new(
            || async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok::<_, FetchError>(())
            },
            false,
        );
        let _pending = handle.spawn_fetch();
        assert!(handle.loading());

        handle.dispose();
        handle.settled().await;
        assert!(handle.is_disposed());
    }
}
