use std::{fmt, time::Duration};

use crate::Runtime;

use super::{
    hooks::{self, Hooks},
    Manager, Pool, PoolConfig,
};

/// This error is returned when [`PoolBuilder::build()`] fails
/// to build the pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// Waiting for idle resources requires a runtime
    NoRuntimeSpecified,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuntimeSpecified => write!(
                f,
                "An error occured while building the pool: \
                 a non-zero acquire timeout requires a runtime"
            ),
        }
    }
}

impl std::error::Error for BuildError {}

/// Builder for pools
///
/// Instances of this are created by calling the [`Pool::builder()`]
/// method.
pub struct PoolBuilder<M: Manager> {
    pub(crate) manager: M,
    pub(crate) config: PoolConfig,
    pub(crate) runtime: Option<Runtime>,
    pub(crate) hooks: Hooks<M>,
}

// Implemented manually to avoid unnecessary trait bound on `M::Type`.
impl<M> fmt::Debug for PoolBuilder<M>
where
    M: fmt::Debug + Manager,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("manager", &self.manager)
            .field("config", &self.config)
            .field("runtime", &self.runtime)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl<M: Manager> PoolBuilder<M> {
    pub(crate) fn new(manager: M) -> Self {
        Self {
            manager,
            config: PoolConfig::default(),
            runtime: None,
            hooks: Hooks::default(),
        }
    }

    /// Build the pool object
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoRuntimeSpecified`] if pooling is enabled and
    /// the acquire timeout is non-zero but no [`Runtime`] was given.
    pub fn build(self) -> Result<Pool<M>, BuildError> {
        if self.config.capacity > 0
            && !self.config.acquire_timeout.is_zero()
            && self.runtime.is_none()
        {
            return Err(BuildError::NoRuntimeSpecified);
        }
        Ok(Pool::from_builder(self))
    }

    /// Set the pool configuration
    pub fn config(mut self, value: PoolConfig) -> Self {
        self.config = value;
        self
    }

    /// Set the [`PoolConfig::capacity`]
    pub fn capacity(mut self, value: usize) -> Self {
        self.config.capacity = value;
        self
    }

    /// Set the [`PoolConfig::acquire_timeout`]
    pub fn acquire_timeout(mut self, value: Duration) -> Self {
        self.config.acquire_timeout = value;
        self
    }

    /// Attach a post_create hook. It is called right after a resource has
    /// been created. If it fails the resource is destroyed again.
    pub fn post_create(mut self, hook: impl hooks::PostCreate<M> + 'static) -> Self {
        self.hooks.post_create.push(Box::new(hook));
        self
    }

    /// Attach an observer which receives every error returned by
    /// [`Manager::destroy()`].
    pub fn destroy_error(mut self, hook: impl Fn(&M::Error) + Sync + Send + 'static) -> Self {
        self.hooks.destroy_error.push(Box::new(hook));
        self
    }

    /// Set the [`Runtime`]
    ///
    /// The runtime is needed to wait for idle resources with a timeout.
    /// Pools with a capacity of `0` or a zero acquire timeout never wait and
    /// can do without one.
    pub fn runtime(mut self, value: Runtime) -> Self {
        self.runtime = Some(value);
        self
    }
}
