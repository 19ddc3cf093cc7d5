use super::{Manager, PoolInner};

/// An `allocated` slot held for a resource that is still being created.
///
/// Dropping it gives the slot back, which covers a failing constructor, a
/// rejecting `post_create` hook and an acquiring future that is dropped
/// mid-way. [`Reservation::commit()`] keeps the slot for the new resource.
#[must_use]
pub(super) struct Reservation<'a, M: Manager> {
    pool: &'a PoolInner<M>,
}

impl<'a, M: Manager> Reservation<'a, M> {
    /// Takes a slot if fewer than `capacity` resources are alive.
    pub(super) fn below_capacity(pool: &'a PoolInner<M>) -> Option<Self> {
        let mut slots = pool.slots.lock().unwrap();
        if slots.allocated < pool.config.capacity {
            slots.allocated += 1;
            Some(Self { pool })
        } else {
            None
        }
    }

    /// Takes a slot even if that pushes `allocated` past the capacity.
    pub(super) fn beyond_capacity(pool: &'a PoolInner<M>) -> Self {
        pool.slots.lock().unwrap().allocated += 1;
        Self { pool }
    }

    /// The resource exists now and keeps the slot.
    pub(super) fn commit(self) {
        std::mem::forget(self);
    }
}

impl<M: Manager> Drop for Reservation<'_, M> {
    fn drop(&mut self) {
        self.pool.unreserve();
    }
}
