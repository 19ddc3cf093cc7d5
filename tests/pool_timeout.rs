#![cfg(any(feature = "rt_tokio_1", feature = "rt_async-std_1"))]

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use async_trait::async_trait;

use resourcepool::{
    pool::{PoolConfig, NEGATIVE_WAIT_FALLBACK},
    BuildError, Manager, Pool, PoolError, Runtime,
};

#[derive(Default)]
struct Counter {
    created: AtomicUsize,
    destroyed: AtomicUsize,
}

#[async_trait]
impl Manager for Counter {
    type Type = usize;
    type Error = ();

    async fn create(&self) -> Result<usize, ()> {
        Ok(self.created.fetch_add(1, Ordering::Relaxed))
    }

    async fn destroy(&self, _: usize) -> Result<(), ()> {
        let _ = self.destroyed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[test]
fn build_requires_runtime() {
    let result = Pool::builder(Counter::default())
        .config(PoolConfig::new(4))
        .build();
    assert!(matches!(result, Err(BuildError::NoRuntimeSpecified)));

    let result = Pool::builder(Counter::default())
        .capacity(4)
        .acquire_timeout(Duration::ZERO)
        .build();
    assert!(result.is_ok());
}

#[tokio::test]
async fn no_runtime() {
    let pool = Pool::builder(Counter::default())
        .capacity(1)
        .acquire_timeout(Duration::ZERO)
        .build()
        .unwrap();
    let _t0 = pool.acquire().await.unwrap();
    assert!(matches!(
        pool.timeout_acquire(Some(Duration::from_millis(1))).await,
        Err(PoolError::NoRuntimeSpecified)
    ));
    // a zero wait never needs a runtime
    let t1 = pool.timeout_acquire(None).await.unwrap();
    assert_eq!(t1, 1);
    assert_eq!(pool.status().allocated, 2);
}

async fn test_fallback_create(runtime: Runtime) {
    let pool = Pool::builder(Counter::default())
        .capacity(1)
        .acquire_timeout(Duration::from_millis(10))
        .runtime(runtime)
        .build()
        .unwrap();

    let t0 = pool.acquire().await.unwrap();
    let t1 = pool.acquire().await.unwrap();
    assert_ne!(t0, t1);
    let status = pool.status();
    assert_eq!(status.allocated, 2);
    assert_eq!(status.idle, 0);

    pool.release(Some(t0), false).await;
    pool.release(Some(t1), false).await;
    let status = pool.status();
    assert_eq!(status.idle, 1);
    assert_eq!(status.allocated, 1);
    assert_eq!(pool.manager().destroyed.load(Ordering::Relaxed), 1);
}

async fn test_negative_wait(runtime: Runtime) {
    let pool = Pool::builder(Counter::default())
        .capacity(1)
        .acquire_timeout(Duration::from_secs(60))
        .runtime(runtime)
        .build()
        .unwrap();

    let _t0 = pool.acquire().await.unwrap();
    let start = Instant::now();
    let t1 = pool.acquire_millis(-1).await.unwrap();
    assert!(start.elapsed() >= NEGATIVE_WAIT_FALLBACK);
    assert!(start.elapsed() < Duration::from_secs(60));
    assert_eq!(t1, 1);
}

async fn test_zero_wait(runtime: Runtime) {
    let pool = Pool::builder(Counter::default())
        .capacity(1)
        .acquire_timeout(Duration::from_secs(60))
        .runtime(runtime)
        .build()
        .unwrap();

    let _t0 = pool.acquire().await.unwrap();
    let start = Instant::now();
    let t1 = pool.acquire_millis(0).await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(60));
    assert_eq!(t1, 1);
}

#[cfg(feature = "rt_tokio_1")]
#[tokio::test]
async fn rt_tokio_1() {
    test_fallback_create(Runtime::Tokio1).await;
    test_negative_wait(Runtime::Tokio1).await;
    test_zero_wait(Runtime::Tokio1).await;
}

#[cfg(feature = "rt_async-std_1")]
#[async_std::test]
async fn rt_async_std_1() {
    test_fallback_create(Runtime::AsyncStd1).await;
    test_negative_wait(Runtime::AsyncStd1).await;
    test_zero_wait(Runtime::AsyncStd1).await;
}

#[cfg(feature = "rt_tokio_1")]
#[tokio::test]
async fn release_wakes_waiter() {
    let pool = Pool::builder(Counter::default())
        .capacity(1)
        .acquire_timeout(Duration::from_secs(5))
        .runtime(Runtime::Tokio1)
        .build()
        .unwrap();

    let t0 = pool.acquire().await.unwrap();
    let waiter = {
        let pool = pool.clone();
        tokio::spawn(async move { pool.acquire().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    pool.release(Some(t0), false).await;

    assert_eq!(waiter.await.unwrap().unwrap(), t0);
    assert_eq!(pool.manager().created.load(Ordering::Relaxed), 1);
}

#[cfg(feature = "rt_tokio_1")]
#[tokio::test]
async fn close_wakes_waiter() {
    let pool = Pool::builder(Counter::default())
        .capacity(1)
        .acquire_timeout(Duration::from_secs(5))
        .runtime(Runtime::Tokio1)
        .build()
        .unwrap();

    let _t0 = pool.acquire().await.unwrap();
    let waiter = {
        let pool = pool.clone();
        tokio::spawn(async move { pool.acquire().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    pool.close().await;

    assert!(matches!(waiter.await.unwrap(), Err(PoolError::Closed)));
}

#[cfg(feature = "rt_tokio_1")]
#[tokio::test]
async fn dropped_acquire_keeps_count() {
    let pool = Pool::builder(Counter::default())
        .capacity(1)
        .acquire_timeout(Duration::from_secs(5))
        .runtime(Runtime::Tokio1)
        .build()
        .unwrap();

    let _t0 = pool.acquire().await.unwrap();
    let result = tokio::time::timeout(Duration::from_millis(10), pool.acquire()).await;
    assert!(result.is_err());
    assert_eq!(pool.status().allocated, 1);
}
