//! [`SharedLock`] is a spin-based locking primitive over a shared memory region.

#![deny(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
#[cfg(not(feature = "loom"))]
use std::sync::atomic::AtomicI32;
use std::sync::atomic::Ordering::{self, SeqCst};

#[cfg(feature = "loom")]
use loom::sync::atomic::AtomicI32;

use crate::config::{Config, DefaultConfig};
use crate::error::OwnershipError;
use crate::slots::{
    LOCKED, NO_OWNER, SLOT_COUNT, SLOT_LOCKED, SLOT_NOTIFIED, SLOT_NOTIFIED_ALL, SLOT_OWNER,
    SLOT_WAITERS, UNLOCKED, UnitId,
};

/// [`SharedLock`] is a spin-based locking primitive over a shared memory region.
///
/// A mutual-exclusion lock with an attached single-slot condition variable,
/// built on [`SLOT_COUNT`] atomic `i32` slots borrowed from the caller. Every
/// participating execution unit constructs its own handle over the *same*
/// slots; all coordination happens through atomic operations on them. The
/// handle only provides low-level locking and releasing methods, hence forcing
/// the user to manage the scope of acquired locks and resources to protect.
///
/// Every slot transition uses sequentially-consistent ordering so that all
/// attached units observe state changes in a single total order; the spin
/// loops rely on this to terminate.
pub struct SharedLock<'s, C: Config = DefaultConfig> {
    /// The lock slots, borrowed from the shared region.
    slots: &'s [AtomicI32],
    /// Identifier of the execution unit this handle belongs to.
    id: UnitId,
    config: PhantomData<C>,
}

impl<'s, C: Config> SharedLock<'s, C> {
    /// Constructs the first handle over a region, initializing the lock.
    ///
    /// Stores `UNLOCKED` into the state slot; the remaining slots keep their
    /// zero-initialized defaults (no owner, no pending pulses, no waiters).
    /// Exactly one unit must do this, before any other unit operates on the
    /// region — re-initializing a region that other units are already using
    /// corrupts the lock state for everyone. Every other unit must use
    /// [`Self::attach`].
    ///
    /// # Panics
    ///
    /// Panics if the region is shorter than [`SLOT_COUNT`] slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::{SharedLock, UnitId};
    /// use std::sync::atomic::AtomicI32;
    /// use std::sync::atomic::Ordering::Relaxed;
    ///
    /// let region: Vec<AtomicI32> = (0..shmutex::SLOT_COUNT).map(|_| AtomicI32::new(0)).collect();
    ///
    /// let lock: SharedLock = SharedLock::initialize(&region, UnitId::new(1).unwrap());
    /// assert!(!lock.is_locked(Relaxed));
    /// ```
    #[inline]
    #[must_use]
    pub fn initialize(region: &'s [AtomicI32], id: UnitId) -> Self {
        let lock = Self::attach(region, id);
        lock.slots[SLOT_LOCKED].store(UNLOCKED, SeqCst);
        lock
    }

    /// Constructs a handle over an already-initialized region.
    ///
    /// Writes nothing to the region. `id` must be unique among all attached
    /// units and stable for this unit's lifetime. The region must outlive
    /// every handle attached to it, which the borrow enforces within one
    /// process; across processes it is the caller's mapping discipline.
    ///
    /// # Panics
    ///
    /// Panics if the region is shorter than [`SLOT_COUNT`] slots.
    #[inline]
    #[must_use]
    pub fn attach(region: &'s [AtomicI32], id: UnitId) -> Self {
        assert!(
            region.len() >= SLOT_COUNT,
            "lock region needs at least {SLOT_COUNT} slots, got {}",
            region.len()
        );
        Self {
            slots: &region[..SLOT_COUNT],
            id,
            config: PhantomData,
        }
    }

    /// Returns the identifier this handle was constructed with.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Acquires the lock, spinning while it is held elsewhere.
    ///
    /// Atomically exchanges the state slot to `LOCKED` until the previous
    /// value read back was `UNLOCKED`, then stores the caller's identifier
    /// into the owner slot. There is no timeout and no cancellation; if the
    /// current holder never releases, this spins forever.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::{SharedLock, UnitId};
    /// use std::sync::atomic::AtomicI32;
    /// use std::sync::atomic::Ordering::Relaxed;
    ///
    /// let region: Vec<AtomicI32> = (0..shmutex::SLOT_COUNT).map(|_| AtomicI32::new(0)).collect();
    /// let id = UnitId::new(1).unwrap();
    ///
    /// let lock: SharedLock = SharedLock::initialize(&region, id);
    /// lock.acquire();
    ///
    /// assert!(lock.is_locked(Relaxed));
    /// assert_eq!(lock.owner(Relaxed), Some(id));
    /// ```
    #[inline]
    pub fn acquire(&self) {
        let mut spin_count = 0;
        while self.slots[SLOT_LOCKED].swap(LOCKED, SeqCst) != UNLOCKED {
            C::backoff(spin_count);
            spin_count += 1;
        }
        self.slots[SLOT_OWNER].store(self.id.get(), SeqCst);
    }

    /// Tries to acquire the lock without spinning.
    ///
    /// Returns `false` if the lock was held elsewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::{SharedLock, UnitId};
    /// use std::sync::atomic::AtomicI32;
    ///
    /// let region: Vec<AtomicI32> = (0..shmutex::SLOT_COUNT).map(|_| AtomicI32::new(0)).collect();
    ///
    /// let lock: SharedLock = SharedLock::initialize(&region, UnitId::new(1).unwrap());
    ///
    /// assert!(lock.try_acquire());
    /// assert!(!lock.try_acquire());
    /// ```
    #[inline]
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        if self.slots[SLOT_LOCKED].swap(LOCKED, SeqCst) == UNLOCKED {
            self.slots[SLOT_OWNER].store(self.id.get(), SeqCst);
            true
        } else {
            false
        }
    }

    /// Releases the lock.
    ///
    /// Clears the owner slot, then stores `UNLOCKED` into the state slot.
    /// The caller must currently hold the lock; this is not verified.
    /// Releasing a lock held by another unit, or not held at all, corrupts
    /// the shared state for every attached unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::{SharedLock, UnitId};
    /// use std::sync::atomic::AtomicI32;
    /// use std::sync::atomic::Ordering::Relaxed;
    ///
    /// let region: Vec<AtomicI32> = (0..shmutex::SLOT_COUNT).map(|_| AtomicI32::new(0)).collect();
    ///
    /// let lock: SharedLock = SharedLock::initialize(&region, UnitId::new(1).unwrap());
    /// lock.acquire();
    /// lock.release();
    ///
    /// assert!(!lock.is_locked(Relaxed));
    /// assert_eq!(lock.owner(Relaxed), None);
    /// ```
    #[inline]
    pub fn release(&self) {
        self.slots[SLOT_OWNER].store(NO_OWNER, SeqCst);
        self.slots[SLOT_LOCKED].store(UNLOCKED, SeqCst);
    }

    /// Releases the lock and spins until another unit pulses a notification,
    /// then re-acquires the lock.
    ///
    /// The sequence is: release, increment the waiter count, spin until the
    /// wake-one or wake-all pulse is visible, decrement the waiter count,
    /// re-acquire (blocking if contended), clear the wake-one pulse. The
    /// wake-all pulse is cleared by the [`Self::notify_all`] caller instead.
    /// Returns with the lock held, mirroring the state at entry.
    ///
    /// A pulse already pending at entry satisfies the spin immediately, so
    /// `notify` followed by `wait` on the same unit does not block.
    ///
    /// # Errors
    ///
    /// Returns [`OwnershipError`] without touching any slot if the caller
    /// does not hold the lock.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::{SharedLock, UnitId};
    /// use std::sync::atomic::AtomicI32;
    ///
    /// let region: Vec<AtomicI32> = (0..shmutex::SLOT_COUNT).map(|_| AtomicI32::new(0)).collect();
    ///
    /// let lock: SharedLock = SharedLock::initialize(&region, UnitId::new(1).unwrap());
    ///
    /// assert!(lock.wait().is_err());
    ///
    /// lock.acquire();
    /// lock.notify().unwrap();
    /// lock.wait().unwrap();
    /// lock.release();
    /// ```
    #[inline]
    pub fn wait(&self) -> Result<(), OwnershipError> {
        self.check_owner()?;
        self.release();
        self.slots[SLOT_WAITERS].fetch_add(1, SeqCst);
        let mut spin_count = 0;
        while self.slots[SLOT_NOTIFIED].load(SeqCst) == 0
            && self.slots[SLOT_NOTIFIED_ALL].load(SeqCst) == 0
        {
            C::backoff(spin_count);
            spin_count += 1;
        }
        self.slots[SLOT_WAITERS].fetch_sub(1, SeqCst);
        self.acquire();
        self.slots[SLOT_NOTIFIED].store(0, SeqCst);
        Ok(())
    }

    /// Pulses the wake-one notification.
    ///
    /// Sets the wake-one pulse and returns immediately, whether or not any
    /// waiter exists. Pulses coalesce: a second `notify` before a waiter
    /// consumes the first has no additional effect, so at most one pending
    /// wake is ever represented.
    ///
    /// # Errors
    ///
    /// Returns [`OwnershipError`] without touching any slot if the caller
    /// does not hold the lock.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::{SharedLock, UnitId};
    /// use std::sync::atomic::AtomicI32;
    /// use std::sync::atomic::Ordering::Relaxed;
    ///
    /// let region: Vec<AtomicI32> = (0..shmutex::SLOT_COUNT).map(|_| AtomicI32::new(0)).collect();
    ///
    /// let lock: SharedLock = SharedLock::initialize(&region, UnitId::new(1).unwrap());
    /// lock.acquire();
    /// lock.notify().unwrap();
    ///
    /// assert!(lock.is_notified(Relaxed));
    /// ```
    #[inline]
    pub fn notify(&self) -> Result<(), OwnershipError> {
        self.check_owner()?;
        self.slots[SLOT_NOTIFIED].store(1, SeqCst);
        Ok(())
    }

    /// Pulses the wake-all notification and spins until every current waiter
    /// has left the notification-polling phase.
    ///
    /// Sets the wake-all pulse, spins until the waiter count returns to zero,
    /// then clears the pulse. The caller keeps holding the lock throughout,
    /// so waiters that observed the pulse still block re-acquiring inside
    /// their own [`Self::wait`] until this caller releases. A zero waiter
    /// count therefore does not mean the waiters have returned from `wait`.
    ///
    /// # Errors
    ///
    /// Returns [`OwnershipError`] without touching any slot if the caller
    /// does not hold the lock.
    #[inline]
    pub fn notify_all(&self) -> Result<(), OwnershipError> {
        self.check_owner()?;
        self.slots[SLOT_NOTIFIED_ALL].store(1, SeqCst);
        let mut spin_count = 0;
        while self.slots[SLOT_WAITERS].load(SeqCst) != 0 {
            C::backoff(spin_count);
            spin_count += 1;
        }
        self.slots[SLOT_NOTIFIED_ALL].store(0, SeqCst);
        Ok(())
    }

    /// Returns `true` if the lock is currently held by any unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use shmutex::{SharedLock, UnitId};
    /// use std::sync::atomic::AtomicI32;
    /// use std::sync::atomic::Ordering::Relaxed;
    ///
    /// let region: Vec<AtomicI32> = (0..shmutex::SLOT_COUNT).map(|_| AtomicI32::new(0)).collect();
    ///
    /// let lock: SharedLock = SharedLock::initialize(&region, UnitId::new(1).unwrap());
    /// assert!(!lock.is_locked(Relaxed));
    ///
    /// lock.acquire();
    /// assert!(lock.is_locked(Relaxed));
    /// ```
    #[inline]
    #[must_use]
    pub fn is_locked(&self, mo: Ordering) -> bool {
        self.slots[SLOT_LOCKED].load(mo) == LOCKED
    }

    /// Returns the identifier in the owner slot, or `None` if it holds the
    /// sentinel.
    ///
    /// The value is only trustworthy while the lock is held; after a release
    /// and before the next acquire a stale identifier may be observed.
    #[inline]
    #[must_use]
    pub fn owner(&self, mo: Ordering) -> Option<UnitId> {
        UnitId::new(self.slots[SLOT_OWNER].load(mo))
    }

    /// Returns the number of units currently inside the wait loop.
    #[inline]
    #[must_use]
    pub fn waiter_count(&self, mo: Ordering) -> i32 {
        self.slots[SLOT_WAITERS].load(mo)
    }

    /// Returns `true` if a wake-one pulse is pending.
    #[inline]
    #[must_use]
    pub fn is_notified(&self, mo: Ordering) -> bool {
        self.slots[SLOT_NOTIFIED].load(mo) != 0
    }

    /// Checks that the calling unit holds the lock.
    fn check_owner(&self) -> Result<(), OwnershipError> {
        if self.slots[SLOT_OWNER].load(SeqCst) == self.id.get() {
            Ok(())
        } else {
            Err(OwnershipError { caller: self.id })
        }
    }
}

impl<C: Config> fmt::Debug for SharedLock<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedLock")
            .field("id", &self.id)
            .field("locked", &self.is_locked(SeqCst))
            .field("owner", &self.owner(SeqCst))
            .field("notified", &self.is_notified(SeqCst))
            .field("waiter_count", &self.waiter_count(SeqCst))
            .finish()
    }
}
