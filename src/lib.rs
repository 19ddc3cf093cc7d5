//! Resourcepool is a bounded pool of expensive-to-create client handles
//! (database connections, message broker connections, RPC stubs) that are
//! shared between concurrent tasks.
//!
//! Resources are created and destroyed by a [`Manager`]. The pool keeps up to
//! `capacity` idle resources around for reuse. When no idle resource is
//! available it waits for one up to a configurable budget and then falls back
//! to creating a new one, so acquisition always makes progress.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use resourcepool::{Manager, Pool, Runtime};
//!
//! #[derive(Debug)]
//! enum Error { Fail }
//!
//! struct Computer {}
//!
//! impl Computer {
//!     async fn get_answer(&self) -> i32 {
//!         42
//!     }
//! }
//!
//! struct ComputerManager {}
//!
//! #[async_trait]
//! impl Manager for ComputerManager {
//!     type Type = Computer;
//!     type Error = Error;
//!
//!     async fn create(&self) -> Result<Computer, Error> {
//!         Ok(Computer {})
//!     }
//!     async fn destroy(&self, _: Computer) -> Result<(), Error> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = Pool::builder(ComputerManager {})
//!         .capacity(16)
//!         .runtime(Runtime::Tokio1)
//!         .build()
//!         .unwrap();
//!     let computer = pool.acquire().await.unwrap();
//!     assert_eq!(computer.get_answer().await, 42);
//!     pool.release(Some(computer), false).await;
//!     assert_eq!(pool.count(), 1);
//! }
//! ```
//!
//! # Capacity is a soft limit
//!
//! `capacity` bounds the number of *idle* resources and decides whether a
//! new resource is created right away instead of waiting. It is not a hard
//! limit on concurrently checked out resources: when the wait budget runs
//! out a resource is created anyway. Surplus resources are destroyed when
//! they are released into a full idle store.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links
)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod pool;
mod runtime;
pub mod sync;

pub use async_trait::async_trait;

pub use self::{
    pool::{
        BuildError, HookError, Manager, Pool, PoolBuilder, PoolConfig, PoolError, Status,
    },
    runtime::Runtime,
    sync::SyncManager,
};
