//! The resource pool.
//!
//! A [`Pool`] hands out resources created by a [`Manager`]. Callers give
//! them back with [`Pool::release()`] or evict them with
//! [`Pool::report_outcome()`]. The pool does not remember which resources it
//! handed out: whatever is released is pooled if there is room and destroyed
//! otherwise.
//!
//! # Example
//!
//! ```rust
//! use std::{
//!     sync::atomic::{AtomicUsize, Ordering},
//!     time::Duration,
//! };
//!
//! use async_trait::async_trait;
//! use resourcepool::{pool, Runtime};
//!
//! struct Counter {
//!     next: AtomicUsize,
//! }
//!
//! #[async_trait]
//! impl pool::Manager for Counter {
//!     type Type = usize;
//!     type Error = ();
//!
//!     async fn create(&self) -> Result<usize, ()> {
//!         Ok(self.next.fetch_add(1, Ordering::Relaxed))
//!     }
//!     async fn destroy(&self, _: usize) -> Result<(), ()> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = pool::Pool::builder(Counter { next: AtomicUsize::new(0) })
//!         .capacity(2)
//!         .acquire_timeout(Duration::from_millis(100))
//!         .runtime(Runtime::Tokio1)
//!         .build()
//!         .unwrap();
//!
//!     let id = pool.acquire().await.unwrap();
//!     let result: Result<(), &str> = Err("broken pipe");
//!     // The resource misbehaved, so it is destroyed instead of pooled.
//!     let id = pool.report_outcome(id, result.err()).await;
//!     assert!(id.is_none());
//!     pool.release(id, false).await;
//!     assert_eq!(pool.count(), 0);
//! }
//! ```

mod builder;
mod config;
mod errors;
pub mod hooks;
mod reservation;

use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::{Semaphore, TryAcquireError};

use crate::{runtime::IdleWait, Runtime};

use self::reservation::Reservation;
pub use self::{
    builder::{BuildError, PoolBuilder},
    config::{wait_from_millis, PoolConfig, DEFAULT_ACQUIRE_TIMEOUT, NEGATIVE_WAIT_FALLBACK},
    errors::PoolError,
    hooks::HookError,
};

/// Manager responsible for creating and destroying resources.
#[async_trait]
pub trait Manager: Sync + Send {
    /// Type of resources that this [`Manager`] creates and destroys.
    type Type: Send;
    /// Error that this [`Manager`] can return when creating and/or
    /// destroying resources.
    type Error: fmt::Debug + Send;

    /// Creates a new instance of [`Manager::Type`].
    ///
    /// This may be called concurrently from several tasks.
    async fn create(&self) -> Result<Self::Type, Self::Error>;

    /// Releases the underlying handle of a resource.
    ///
    /// This is best effort: the resource may already be unusable. Errors are
    /// logged and passed to the `destroy_error` hooks but never returned to
    /// the caller of the pool.
    async fn destroy(&self, obj: Self::Type) -> Result<(), Self::Error>;
}

/// The current pool status.
#[derive(Clone, Copy, Debug)]
pub struct Status {
    /// The configured capacity of the idle store.
    pub capacity: usize,
    /// Resources currently alive, checked out or idle.
    ///
    /// This can exceed `capacity` while resources created after a wait
    /// timeout are checked out.
    ///
    /// The count trusts callers to only release what they acquired. Every
    /// destroyed resource lowers it, so releasing a resource this pool never
    /// handed out into a full idle store leaves it one too low from then on.
    /// It never drops below zero.
    pub allocated: usize,
    /// Resources currently idle.
    pub idle: usize,
}

/// Generic resource pool.
///
/// This struct can be cloned and transferred across thread boundaries and uses
/// reference counting for its internal state.
pub struct Pool<M: Manager> {
    inner: Arc<PoolInner<M>>,
}

// Implemented manually to avoid unnecessary trait bound on the struct.
impl<M> fmt::Debug for Pool<M>
where
    M: fmt::Debug + Manager,
    M::Type: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("inner", &self.inner).finish()
    }
}

impl<M: Manager> Clone for Pool<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: Manager> Pool<M> {
    /// Instantiates a builder for a new [`Pool`].
    ///
    /// This is the only way to create a [`Pool`] instance.
    pub fn builder(manager: M) -> PoolBuilder<M> {
        PoolBuilder::new(manager)
    }

    pub(crate) fn from_builder(builder: PoolBuilder<M>) -> Self {
        let capacity = builder.config.capacity;
        Self {
            inner: Arc::new(PoolInner {
                manager: builder.manager,
                slots: Mutex::new(Slots {
                    vec: VecDeque::with_capacity(capacity),
                    allocated: 0,
                    closed: false,
                }),
                semaphore: Semaphore::new(0),
                config: builder.config,
                runtime: builder.runtime,
                hooks: builder.hooks,
            }),
        }
    }

    /// Retrieves an idle resource or creates a new one, waiting at most the
    /// configured [`PoolConfig::acquire_timeout`] for one to become idle.
    ///
    /// # Errors
    ///
    /// See [`PoolError`] for details.
    pub async fn acquire(&self) -> Result<M::Type, PoolError<M::Error>> {
        self.timeout_acquire(None).await
    }

    /// Like [`Pool::acquire()`] but takes the wait budget in milliseconds.
    ///
    /// Negative values are replaced by [`NEGATIVE_WAIT_FALLBACK`].
    ///
    /// # Errors
    ///
    /// See [`PoolError`] for details.
    pub async fn acquire_millis(&self, wait: i64) -> Result<M::Type, PoolError<M::Error>> {
        self.timeout_acquire(Some(wait_from_millis(wait))).await
    }

    /// Retrieves a resource using a different wait budget than the
    /// configured one. [`None`] means the configured budget.
    ///
    /// An idle resource is returned right away. If there is none and fewer
    /// than `capacity` resources are alive a new one is created without
    /// waiting. Otherwise this waits up to `wait` for a resource to be
    /// released and creates a new one when the time is up.
    ///
    /// # Errors
    ///
    /// See [`PoolError`] for details.
    pub async fn timeout_acquire(
        &self,
        wait: Option<Duration>,
    ) -> Result<M::Type, PoolError<M::Error>> {
        if self.inner.config.capacity == 0 {
            if self.is_closed() {
                return Err(PoolError::Closed);
            }
            return self.create(Reservation::beyond_capacity(&self.inner)).await;
        }

        match self.inner.semaphore.try_acquire() {
            Ok(permit) => {
                permit.forget();
                debug!("reusing idle resource");
                return self.inner.pop_idle().ok_or(PoolError::Closed);
            }
            Err(TryAcquireError::Closed) => return Err(PoolError::Closed),
            Err(TryAcquireError::NoPermits) => {}
        }

        if let Some(reservation) = Reservation::below_capacity(&self.inner) {
            return self.create(reservation).await;
        }

        let wait = wait.unwrap_or(self.inner.config.acquire_timeout);
        if !wait.is_zero() {
            let runtime = self.inner.runtime.ok_or(PoolError::NoRuntimeSpecified)?;
            match runtime.wait_for_idle(&self.inner.semaphore, wait).await {
                IdleWait::Ready(permit) => {
                    permit.forget();
                    debug!("reusing released resource");
                    return self.inner.pop_idle().ok_or(PoolError::Closed);
                }
                IdleWait::Closed => return Err(PoolError::Closed),
                IdleWait::Elapsed => debug!("no resource became idle within {:?}", wait),
            }
        }
        self.create(Reservation::beyond_capacity(&self.inner)).await
    }

    /// Creates a new resource for the slot held by `reservation`.
    async fn create(
        &self,
        reservation: Reservation<'_, M>,
    ) -> Result<M::Type, PoolError<M::Error>> {
        let mut obj = self.inner.manager.create().await?;
        let hooked = self.inner.hooks.apply_post_create(&mut obj).await;
        if let Err(e) = hooked {
            self.inner.discard(obj).await;
            return Err(PoolError::PostCreateHook(e));
        }

        reservation.commit();
        debug!("created new resource");
        Ok(obj)
    }

    /// Returns a resource to the pool.
    ///
    /// Passing [`None`] does nothing. The resource is destroyed instead of
    /// pooled if `destroy` is set, the idle store is full or the pool is
    /// closed. Resources this pool never handed out are accepted as well.
    ///
    /// With a capacity of `0` there is no idle store, so every released
    /// resource goes straight to [`Manager::destroy()`].
    pub async fn release(&self, obj: Option<M::Type>, destroy: bool) {
        let obj = match obj {
            Some(obj) => obj,
            None => return,
        };
        if destroy {
            debug!("destroying released resource on request");
            self.inner.destroy(obj).await;
            return;
        }
        if let Err(obj) = self.inner.push_idle(obj) {
            debug!("idle store is full or closed, destroying released resource");
            self.inner.destroy(obj).await;
        }
    }

    /// Destroys the resource if `error` is set, otherwise hands it back.
    ///
    /// Call this after using a resource with the error the use produced.
    /// A resource that caused an error is presumed broken and never returns
    /// to the idle store. The result can be passed on to
    /// [`Pool::release()`] directly.
    pub async fn report_outcome<X>(&self, obj: M::Type, error: Option<X>) -> Option<M::Type>
    where
        X: fmt::Display,
    {
        match error {
            None => Some(obj),
            Some(e) => {
                warn!("evicting resource after error: {}", e);
                self.inner.destroy(obj).await;
                None
            }
        }
    }

    /// Destroys all idle resources but keeps the pool open.
    ///
    /// Checked out resources are left alone and may be released afterwards
    /// as usual. Later acquires create new resources. Returns the number of
    /// resources destroyed.
    pub async fn shrink(&self) -> usize {
        let drained = self.inner.drain_idle();
        debug!("shrinking pool, destroying {} idle resources", drained.len());
        let count = drained.len();
        for obj in drained {
            self.inner.discard(obj).await;
        }
        count
    }

    /// Closes this [`Pool`] and destroys all idle resources.
    ///
    /// Tasks waiting in [`Pool::acquire()`] and all later calls return
    /// [`PoolError::Closed`]. Checked out resources are left alone; releasing
    /// them later destroys them. Closing an already closed pool does nothing.
    pub async fn close(&self) {
        let drained = {
            let mut slots = self.inner.slots.lock().unwrap();
            if slots.closed {
                return;
            }
            slots.closed = true;
            self.inner.semaphore.close();
            let drained: Vec<M::Type> = slots.vec.drain(..).collect();
            slots.allocated = slots.allocated.saturating_sub(drained.len());
            drained
        };
        debug!("closing pool, destroying {} idle resources", drained.len());
        for obj in drained {
            self.inner.discard(obj).await;
        }
    }

    /// Indicates whether this [`Pool`] has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.semaphore.is_closed()
    }

    /// Number of idle resources.
    pub fn count(&self) -> usize {
        self.inner.slots.lock().unwrap().vec.len()
    }

    /// Retrieves [`Status`] of this [`Pool`].
    #[must_use]
    pub fn status(&self) -> Status {
        let slots = self.inner.slots.lock().unwrap();
        Status {
            capacity: self.inner.config.capacity,
            allocated: slots.allocated,
            idle: slots.vec.len(),
        }
    }

    /// Returns [`Manager`] of this [`Pool`].
    #[must_use]
    pub fn manager(&self) -> &M {
        &self.inner.manager
    }
}

struct PoolInner<M: Manager> {
    manager: M,
    slots: Mutex<Slots<M::Type>>,
    /// Has one permit per idle resource in `slots.vec`. Permits are added
    /// after pushing and taken before popping, so holding a permit means
    /// there is a resource to pop unless the pool was closed in between.
    semaphore: Semaphore,
    config: PoolConfig,
    runtime: Option<Runtime>,
    hooks: hooks::Hooks<M>,
}

#[derive(Debug)]
struct Slots<T> {
    vec: VecDeque<T>,
    allocated: usize,
    closed: bool,
}

// Implemented manually to avoid unnecessary trait bound on the struct.
impl<M> fmt::Debug for PoolInner<M>
where
    M: fmt::Debug + Manager,
    M::Type: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolInner")
            .field("manager", &self.manager)
            .field("slots", &self.slots)
            .field("semaphore", &self.semaphore)
            .field("config", &self.config)
            .field("runtime", &self.runtime)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl<M: Manager> PoolInner<M> {
    fn unreserve(&self) {
        let mut slots = self.slots.lock().unwrap();
        slots.allocated = slots.allocated.saturating_sub(1);
    }

    fn pop_idle(&self) -> Option<M::Type> {
        self.slots.lock().unwrap().vec.pop_front()
    }

    /// Puts a resource into the idle store. Never waits; if the store is
    /// full or closed the resource is handed back.
    fn push_idle(&self, obj: M::Type) -> Result<(), M::Type> {
        {
            let mut slots = self.slots.lock().unwrap();
            if slots.closed || slots.vec.len() >= self.config.capacity {
                return Err(obj);
            }
            slots.vec.push_back(obj);
        }
        self.semaphore.add_permits(1);
        Ok(())
    }

    /// Takes every idle resource out of the store together with its permit
    /// and stops counting them as allocated.
    ///
    /// A permit that was already taken by an acquiring task leaves its
    /// resource in place for that task to pop.
    fn drain_idle(&self) -> Vec<M::Type> {
        let mut slots = self.slots.lock().unwrap();
        let mut drained = Vec::with_capacity(slots.vec.len());
        while !slots.vec.is_empty() {
            match self.semaphore.try_acquire() {
                Ok(permit) => permit.forget(),
                Err(_) => break,
            }
            match slots.vec.pop_back() {
                Some(obj) => drained.push(obj),
                None => break,
            }
        }
        slots.allocated = slots.allocated.saturating_sub(drained.len());
        drained
    }

    /// Destroys a resource that was counted as allocated.
    async fn destroy(&self, obj: M::Type) {
        self.unreserve();
        self.discard(obj).await;
    }

    /// Runs the destructor without touching the allocated count.
    async fn discard(&self, obj: M::Type) {
        if let Err(e) = self.manager.destroy(obj).await {
            warn!("destroying resource failed: {:?}", e);
            self.hooks.apply_destroy_error(&e);
        }
    }
}
