use std::fmt;

use super::hooks::HookError;

/// Error structure for [`Pool::acquire()`](super::Pool::acquire).
///
/// Running out of capacity is not an error: when the wait budget expires a
/// new resource is created instead.
#[derive(Debug)]
pub enum PoolError<E> {
    /// The constructor reported an error
    Backend(E),
    /// The pool has been closed
    Closed,
    /// Waiting for an idle resource requires a [`Runtime`](crate::Runtime)
    NoRuntimeSpecified,
    /// A post_create hook rejected the newly created resource
    PostCreateHook(HookError<E>),
}

impl<E> From<E> for PoolError<E> {
    fn from(e: E) -> Self {
        Self::Backend(e)
    }
}

impl<E> fmt::Display for PoolError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(e) => write!(f, "An error occured while creating a new resource: {}", e),
            Self::Closed => write!(f, "The pool has been closed."),
            Self::NoRuntimeSpecified => write!(f, "No runtime specified."),
            Self::PostCreateHook(e) => write!(f, "post_create hook failed: {}", e),
        }
    }
}

impl<E> std::error::Error for PoolError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(e) => Some(e),
            Self::PostCreateHook(e) => Some(e),
            Self::Closed | Self::NoRuntimeSpecified => None,
        }
    }
}
