//! [`Manager`] for blocking constructor and destructor functions.
//!
//! Most client libraries connect and disconnect with plain blocking calls.
//! [`SyncManager`] turns a pair of such functions into a [`Manager`]. The
//! constructor receives the address hint the manager was built with.
//!
//! # Example
//!
//! ```rust
//! use std::{convert::Infallible, time::Duration};
//!
//! use resourcepool::{Pool, Runtime, SyncManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = SyncManager::new(
//!         "localhost:6379",
//!         |addr: &str| Ok::<_, Infallible>(format!("client for {}", addr)),
//!         |_client: String| Ok(()),
//!     )
//!     .runtime(Runtime::Tokio1);
//!     let pool = Pool::builder(manager)
//!         .capacity(4)
//!         .acquire_timeout(Duration::from_millis(50))
//!         .runtime(Runtime::Tokio1)
//!         .build()
//!         .unwrap();
//!     let client = pool.acquire().await.unwrap();
//!     assert_eq!(client, "client for localhost:6379");
//! }
//! ```

use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::{pool::Manager, Runtime};

type CreateFn<T, E> = dyn Fn(&str) -> Result<T, E> + Send + Sync;
type DestroyFn<T, E> = dyn Fn(T) -> Result<(), E> + Send + Sync;

/// [`Manager`] built from a blocking constructor and destructor.
///
/// With a [`Runtime`] both functions run on the runtime's blocking thread
/// pool.
///
/// Without one they run inline on the task that acquires or releases. That
/// blocks the executor thread for as long as connecting or disconnecting
/// takes and stalls every other task scheduled on it. Only leave the runtime
/// out if the functions never block, e.g. in tests.
pub struct SyncManager<T, E> {
    addr: Arc<str>,
    create: Arc<CreateFn<T, E>>,
    destroy: Arc<DestroyFn<T, E>>,
    runtime: Option<Runtime>,
}

// Implemented manually since the functions are not `Debug`.
impl<T, E> fmt::Debug for SyncManager<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncManager")
            .field("addr", &self.addr)
            .field("runtime", &self.runtime)
            .finish()
    }
}

impl<T, E> SyncManager<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Creates a manager which calls `create` with `addr` for every new
    /// resource and `destroy` for every resource that is discarded.
    ///
    /// `create` may be called from several threads at the same time.
    pub fn new<C, D>(addr: impl Into<String>, create: C, destroy: D) -> Self
    where
        C: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        D: Fn(T) -> Result<(), E> + Send + Sync + 'static,
    {
        Self {
            addr: Arc::from(addr.into()),
            create: Arc::new(create),
            destroy: Arc::new(destroy),
            runtime: None,
        }
    }

    /// Run the functions on the blocking thread pool of `value`.
    pub fn runtime(mut self, value: Runtime) -> Self {
        self.runtime = Some(value);
        self
    }

    /// The address hint passed to the constructor.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        match self.runtime {
            Some(runtime) => runtime.run_blocking(f).await,
            None => f(),
        }
    }
}

#[async_trait]
impl<T, E> Manager for SyncManager<T, E>
where
    T: Send + 'static,
    E: fmt::Debug + Send + 'static,
{
    type Type = T;
    type Error = E;

    async fn create(&self) -> Result<T, E> {
        let create = self.create.clone();
        let addr = self.addr.clone();
        self.run(move || create(&addr)).await
    }

    async fn destroy(&self, obj: T) -> Result<(), E> {
        let destroy = self.destroy.clone();
        self.run(move || destroy(obj)).await
    }
}
