//! Layout of the shared lock region and execution-unit identifiers.

use std::fmt;
use std::num::NonZeroI32;
use std::sync::atomic::Ordering::Relaxed;

/// Number of `i32` slots a lock occupies in the shared region.
///
/// Independent locks can be laid out over one region at disjoint ranges, each
/// `SLOT_COUNT` slots wide.
pub const SLOT_COUNT: usize = 5;

/// Slot holding the lock state, either [`LOCKED`] or [`UNLOCKED`].
pub(crate) const SLOT_LOCKED: usize = 0;
/// Slot holding the owner identifier, or [`NO_OWNER`].
pub(crate) const SLOT_OWNER: usize = 1;
/// Slot holding the wake-one pulse.
pub(crate) const SLOT_NOTIFIED: usize = 2;
/// Slot holding the wake-all pulse.
pub(crate) const SLOT_NOTIFIED_ALL: usize = 3;
/// Slot counting units inside the wait loop.
pub(crate) const SLOT_WAITERS: usize = 4;

pub(crate) const LOCKED: i32 = 0;
pub(crate) const UNLOCKED: i32 = 1;

/// Raw slot value meaning "no unit owns the lock".
///
/// Zero-initialized shared memory therefore starts with a valid owner slot,
/// which is why [`UnitId`] is built on [`NonZeroI32`].
pub(crate) const NO_OWNER: i32 = 0;

/// Identifier of one execution unit, comparable for equality and stable for
/// the unit's lifetime.
///
/// The raw value lives in a shared `i32` slot whose zero value is the "no
/// owner" sentinel, so identifiers are never zero.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct UnitId(NonZeroI32);

/// Source of process-local identifiers handed out by [`UnitId::current`].
static NEXT_UNIT_ID: std::sync::atomic::AtomicI32 = std::sync::atomic::AtomicI32::new(1);

thread_local! {
    static CURRENT_UNIT_ID: UnitId = {
        let raw = NEXT_UNIT_ID.fetch_add(1, Relaxed);
        // The sentinel is skipped if the counter ever wraps around zero.
        NonZeroI32::new(raw).map_or(UnitId(NonZeroI32::MIN), UnitId)
    };
}

impl UnitId {
    /// Creates an identifier from a raw value.
    ///
    /// Returns `None` if `raw` is zero, the "no owner" sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::UnitId;
    ///
    /// assert!(UnitId::new(42).is_some());
    /// assert!(UnitId::new(0).is_none());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new(raw: i32) -> Option<UnitId> {
        match NonZeroI32::new(raw) {
            Some(raw) => Some(UnitId(raw)),
            None => None,
        }
    }

    /// Returns the raw identifier value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0.get()
    }

    /// Returns the identifier of the calling thread.
    ///
    /// Identifiers are assigned from a process-local counter the first time a
    /// thread asks for one and stay stable for the thread's lifetime. Units
    /// in different processes attached to the same region must agree on
    /// identifiers through their own channel instead of relying on this.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::UnitId;
    ///
    /// assert_eq!(UnitId::current(), UnitId::current());
    /// ```
    #[inline]
    #[must_use]
    pub fn current() -> UnitId {
        CURRENT_UNIT_ID.with(|id| *id)
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnitId").field(&self.0.get()).finish()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.get())
    }
}
