use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::fmt::{self, Debug, Display};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{Instrument, error, warn};

/// Terminal outcome of a production: the value, or `None` for absence.
pub type Outcome<T> = Option<Arc<T>>;

/// `None` while pending, `Some(outcome)` once resolved.
type Slot<T> = Option<Outcome<T>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Pending,
    Resolved,
    Absent,
}

/// Shared handle on a single asynchronous production.
///
/// The production is spawned on the tokio runtime as soon as the handle is
/// built and always runs to its end, no matter how many handles are dropped
/// or whether the cache still references it. Every clone observes the same
/// outcome, which never changes once set.
///
/// Production errors and panics resolve the handle to absence; they are
/// logged and never reach observers.
pub struct ResourceHandle<T> {
    slot: Arc<watch::Receiver<Slot<T>>>,
}

impl<T> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Send + Sync + 'static> ResourceHandle<T> {
    /// Starts `production` immediately, inside the current span.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn new<F, E>(production: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);

        tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(production).catch_unwind().await {
                Ok(Ok(value)) => Some(Arc::new(value)),
                Ok(Err(e)) => {
                    warn!(error = %e, "production failed, resolving to absent");
                    None
                }
                Err(_) => {
                    error!("production panicked, resolving to absent");
                    None
                }
            };
            tx.send_replace(Some(outcome));
        }
        .in_current_span());

        Self { slot: Arc::new(rx) }
    }

    /// Builds a handle that is already resolved, without spawning anything.
    pub fn resolved(outcome: Outcome<T>) -> Self {
        let (_tx, rx) = watch::channel(Some(outcome));
        Self { slot: Arc::new(rx) }
    }

    /// Waits for the outcome. Calling this after resolution returns the
    /// known outcome immediately.
    pub async fn outcome(&self) -> Outcome<T> {
        let mut rx = (*self.slot).clone();
        match rx.wait_for(Option::is_some).await {
            Ok(slot) => (*slot).clone().flatten(),
            Err(_) => {
                error!("production went away without reporting, resolving to absent");
                None
            }
        }
    }

    /// Registers `callback` to run with the outcome.
    ///
    /// If the handle is already resolved the callback runs before this
    /// returns, otherwise it runs on a spawned task once the production ends.
    pub fn on_complete<C>(&self, callback: C)
    where
        C: FnOnce(Outcome<T>) + Send + 'static,
    {
        if let Some(outcome) = self.peek() {
            callback(outcome);
            return;
        }
        let handle = self.clone();
        tokio::spawn(async move { callback(handle.outcome().await) });
    }
}

impl<T> ResourceHandle<T> {
    /// The outcome if it is already known.
    pub fn peek(&self) -> Option<Outcome<T>> {
        if let Some(outcome) = self.slot.borrow().clone() {
            return Some(outcome);
        }
        // The task may report and drop its sender between the read above and
        // this check, so a closed channel only means absence if a second read
        // still finds nothing.
        if self.slot.has_changed().is_err() {
            return Some(self.slot.borrow().clone().flatten());
        }
        None
    }

    pub fn state(&self) -> HandleState {
        match self.peek() {
            None => HandleState::Pending,
            Some(Some(_)) => HandleState::Resolved,
            Some(None) => HandleState::Absent,
        }
    }

    /// Whether both handles observe the same production.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.slot, &other.slot)
    }
}

impl<T: Send + Sync + 'static> IntoFuture for ResourceHandle<T> {
    type IntoFuture = BoxFuture<'static, Outcome<T>>;
    type Output = Outcome<T>;

    fn into_future(self) -> Self::IntoFuture {
        async move { self.outcome().await }.boxed()
    }
}

impl<T> Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::{Notify, oneshot};

    #[tokio::test]
    async fn test_observers_share_outcome() {
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        let handle = ResourceHandle::new(async move {
            wait.notified().await;
            Ok::<_, &str>(String::from("picture"))
        });
        assert_eq!(handle.state(), HandleState::Pending);
        assert!(handle.peek().is_none());

        let observers: Vec<_> = (0..4)
            .map(|_| tokio::spawn(handle.clone().into_future()))
            .collect();
        gate.notify_one();

        let first = handle.outcome().await.unwrap();
        for observer in observers {
            let seen = observer.await.unwrap().unwrap();
            assert!(Arc::ptr_eq(&first, &seen));
        }
        assert_eq!(handle.state(), HandleState::Resolved);
    }

    #[tokio::test]
    async fn test_production_runs_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let handle = ResourceHandle::new(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, &str>(1)
        });

        for _ in 0..3 {
            assert_eq!(handle.outcome().await.as_deref(), Some(&1));
        }
        assert_eq!(handle.clone().await.as_deref(), Some(&1));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_resolves_absent() {
        let handle = ResourceHandle::<u32>::new(async { Err("404") });
        assert!(handle.outcome().await.is_none());
        assert_eq!(handle.state(), HandleState::Absent);
        assert_eq!(handle.peek(), Some(None));
    }

    #[tokio::test]
    async fn test_panic_resolves_absent() {
        let handle = ResourceHandle::<u32>::new(async {
            if true {
                panic!("decoder exploded");
            }
            Ok::<_, &str>(1)
        });
        assert!(handle.outcome().await.is_none());
        assert_eq!(handle.state(), HandleState::Absent);
    }

    #[tokio::test]
    async fn test_runs_after_handles_dropped() {
        let (tx, rx) = oneshot::channel();
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        let handle = ResourceHandle::new(async move {
            wait.notified().await;
            let _ = tx.send(());
            Ok::<_, &str>(())
        });
        drop(handle);
        gate.notify_one();
        rx.await.expect("production should finish without observers");
    }

    #[tokio::test]
    async fn test_on_complete_after_resolution_is_immediate() {
        let handle = ResourceHandle::resolved(Some(Arc::new(5)));
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        handle.on_complete(move |outcome| {
            assert_eq!(outcome.as_deref(), Some(&5));
            flag.store(true, Ordering::SeqCst);
        });
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_on_complete_while_pending() {
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        let handle = ResourceHandle::new(async move {
            wait.notified().await;
            Ok::<_, &str>(9)
        });

        let (tx, rx) = oneshot::channel();
        handle.on_complete(move |outcome| {
            let _ = tx.send(outcome);
        });
        gate.notify_one();
        assert_eq!(rx.await.unwrap().as_deref(), Some(&9));
    }

    #[tokio::test]
    async fn test_ptr_eq() {
        let a = ResourceHandle::resolved(Some(Arc::new(1)));
        let b = ResourceHandle::resolved(Some(Arc::new(1)));
        assert!(ResourceHandle::ptr_eq(&a, &a.clone()));
        assert!(!ResourceHandle::ptr_eq(&a, &b));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_peek_never_reports_success_as_absent() {
        for i in 0..10_000u32 {
            let handle = ResourceHandle::new(async move { Ok::<_, &str>(i) });
            let seen = loop {
                if let Some(outcome) = handle.peek() {
                    break outcome;
                }
                tokio::task::yield_now().await;
            };
            assert_eq!(seen.as_deref(), Some(&i), "iteration {i}");
            assert_eq!(handle.state(), HandleState::Resolved);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_on_complete_sees_value_across_threads() {
        for i in 0..1_000u32 {
            let handle = ResourceHandle::new(async move { Ok::<_, &str>(i) });
            let (tx, rx) = oneshot::channel();
            handle.on_complete(move |outcome| {
                let _ = tx.send(outcome);
            });
            assert_eq!(rx.await.unwrap().as_deref(), Some(&i), "iteration {i}");
        }
    }
}
