//! Errors returned by [`SharedLock`](crate::SharedLock) operations.

use thiserror::Error;

use crate::slots::UnitId;

/// The calling unit does not hold the lock.
///
/// Returned by [`wait`](crate::SharedLock::wait),
/// [`notify`](crate::SharedLock::notify) and
/// [`notify_all`](crate::SharedLock::notify_all) when the caller's identifier
/// does not match the owner slot. This is a calling-sequence violation, not a
/// transient condition: the fix is to `acquire` first, not to retry.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("unit {caller} does not hold the lock")]
pub struct OwnershipError {
    /// Identifier of the unit that attempted the operation.
    pub caller: UnitId,
}
