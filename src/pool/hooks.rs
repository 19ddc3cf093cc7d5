//! Hooks allowing to run code after creating a resource and to observe
//! destructor failures.

use std::fmt;

use async_trait::async_trait;

use super::Manager;

/// Error a [`PostCreate`] hook returns to reject a newly created resource.
///
/// The rejected resource is destroyed and the error is returned by
/// [`Pool::acquire()`](super::Pool::acquire) as
/// [`PoolError::PostCreateHook`](super::PoolError::PostCreateHook).
#[derive(Debug)]
pub enum HookError<E> {
    /// Hook failed for some other reason.
    Message(String),

    /// Hook failed for some other reason.
    StaticMessage(&'static str),

    /// Error caused by the backend.
    Backend(E),
}

impl<E: fmt::Display> fmt::Display for HookError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(msg) => write!(f, "{}", msg),
            Self::StaticMessage(msg) => write!(f, "{}", msg),
            Self::Backend(e) => write!(f, "{}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for HookError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Message(_) | Self::StaticMessage(_) => None,
            Self::Backend(e) => Some(e),
        }
    }
}

/// Abstraction of `post_create` hooks.
#[async_trait]
pub trait PostCreate<M: Manager>: Sync + Send {
    /// The hook method which is called right after the constructor returned
    /// a new resource and before it is handed out.
    async fn post_create(&self, obj: &mut M::Type) -> Result<(), HookError<M::Error>>;
}

impl<M: Manager> fmt::Debug for dyn PostCreate<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", self)
    }
}

/// Observer for errors returned by [`Manager::destroy()`].
///
/// Destructor errors are never returned to the caller, this is the only
/// place where they show up besides the log.
pub type DestroyErrorHook<M> = Box<dyn Fn(&<M as Manager>::Error) + Sync + Send>;

/// Collection of all the hooks that can be configured for a [`Pool`].
///
/// [`Pool`]: super::Pool
pub struct Hooks<M: Manager> {
    pub(crate) post_create: Vec<Box<dyn PostCreate<M>>>,
    pub(crate) destroy_error: Vec<DestroyErrorHook<M>>,
}

impl<M: Manager> Hooks<M> {
    pub(crate) async fn apply_post_create(
        &self,
        obj: &mut M::Type,
    ) -> Result<(), HookError<M::Error>> {
        for hook in &self.post_create {
            hook.post_create(obj).await?;
        }
        Ok(())
    }

    pub(crate) fn apply_destroy_error(&self, error: &M::Error) {
        for hook in &self.destroy_error {
            hook(error);
        }
    }
}

// Implemented manually to avoid unnecessary trait bound on `M` type parameter.
impl<M: Manager> fmt::Debug for Hooks<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("post_create", &self.post_create)
            .field("destroy_error", &self.destroy_error.len())
            .finish()
    }
}

// Implemented manually to avoid unnecessary trait bound on `M` type parameter.
impl<M: Manager> Default for Hooks<M> {
    fn default() -> Self {
        Self {
            post_create: Vec::new(),
            destroy_error: Vec::new(),
        }
    }
}
