//! Runtime-specific features.

use std::{future::Future, time::Duration};

use tokio::sync::{Semaphore, SemaphorePermit};

/// Enumeration for picking a runtime implementation.
///
/// The pool needs a runtime for waiting on idle resources with a timeout.
/// [`SyncManager`](crate::SyncManager) uses it to move blocking constructor
/// and destructor calls off the async executor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Runtime {
    #[cfg(feature = "rt_tokio_1")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rt_tokio_1")))]
    /// [`tokio` 1.0](tokio) runtime.
    Tokio1,

    #[cfg(feature = "rt_async-std_1")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rt_async-std_1")))]
    /// [`async-std` 1.0](async_std) runtime.
    AsyncStd1,
}

/// Outcome of waiting for a resource to become idle.
pub(crate) enum IdleWait<'a> {
    /// A permit for exactly one idle resource.
    Ready(SemaphorePermit<'a>),
    /// The pool was closed while waiting.
    Closed,
    /// Nothing was released within the wait budget.
    Elapsed,
}

impl Runtime {
    /// Waits at most `wait` for `idle` to hand out a permit.
    pub(crate) async fn wait_for_idle<'a>(
        &self,
        idle: &'a Semaphore,
        wait: Duration,
    ) -> IdleWait<'a> {
        match self.deadline(wait, idle.acquire()).await {
            Some(Ok(permit)) => IdleWait::Ready(permit),
            Some(Err(_)) => IdleWait::Closed,
            None => IdleWait::Elapsed,
        }
    }

    #[allow(unused_variables)]
    async fn deadline<F: Future>(&self, wait: Duration, future: F) -> Option<F::Output> {
        match self {
            #[cfg(feature = "rt_tokio_1")]
            Self::Tokio1 => tokio::time::timeout(wait, future).await.ok(),
            #[cfg(feature = "rt_async-std_1")]
            Self::AsyncStd1 => async_std::future::timeout(wait, future).await.ok(),
            #[allow(unreachable_patterns)]
            _ => unreachable!(),
        }
    }

    /// Runs a blocking constructor or destructor on the runtime's blocking
    /// thread pool. A panic inside `f` is resumed on the calling task.
    #[allow(unused_variables)]
    pub(crate) async fn run_blocking<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        match self {
            #[cfg(feature = "rt_tokio_1")]
            Self::Tokio1 => match tokio::task::spawn_blocking(f).await {
                Ok(result) => result,
                Err(e) => std::panic::resume_unwind(e.into_panic()),
            },
            #[cfg(feature = "rt_async-std_1")]
            Self::AsyncStd1 => async_std::task::spawn_blocking(f).await,
            #[allow(unreachable_patterns)]
            _ => unreachable!(),
        }
    }
}
