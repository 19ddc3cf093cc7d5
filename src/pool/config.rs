use std::time::Duration;

/// Default time [`Pool::acquire()`](super::Pool::acquire) waits for an idle
/// resource before it creates a new one.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Wait budget used in place of a negative millisecond value.
///
/// A negative wait is neither "forever" nor "not at all". It is replaced by
/// this short wait so callers never spin on a pool that is busy.
pub const NEGATIVE_WAIT_FALLBACK: Duration = Duration::from_millis(10);

/// Pool configuration
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PoolConfig {
    /// Maximum number of idle resources kept in the pool.
    ///
    /// A capacity of `0` disables pooling: every acquire creates a new
    /// resource and every release destroys it.
    pub capacity: usize,
    /// Default time to wait for an idle resource before creating a new one
    #[cfg_attr(feature = "serde", serde(default = "default_acquire_timeout"))]
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    /// Create pool config with the default acquire timeout
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Create pool config from a capacity and a wait budget in milliseconds.
    ///
    /// Negative values are normalized, see [`wait_from_millis()`].
    pub fn from_millis(capacity: usize, acquire_timeout_millis: i64) -> Self {
        Self {
            capacity,
            acquire_timeout: wait_from_millis(acquire_timeout_millis),
        }
    }
}

impl Default for PoolConfig {
    /// Create pool with default config. The `capacity` is set to
    /// `cpu_count * 4` ignoring any logical CPUs (Hyper-Threading).
    fn default() -> Self {
        Self::new(num_cpus::get_physical() * 4)
    }
}

#[cfg(feature = "serde")]
fn default_acquire_timeout() -> Duration {
    DEFAULT_ACQUIRE_TIMEOUT
}

/// Convert a wait budget in milliseconds into a [`Duration`].
///
/// Negative values map to [`NEGATIVE_WAIT_FALLBACK`].
pub fn wait_from_millis(millis: i64) -> Duration {
    match u64::try_from(millis) {
        Ok(millis) => Duration::from_millis(millis),
        Err(_) => NEGATIVE_WAIT_FALLBACK,
    }
}
