//! [`Config`] defines spin and backoff behavior for synchronization primitives.

use std::fmt;
use std::hint::spin_loop;

#[cfg(not(feature = "loom"))]
use std::thread::yield_now;

#[cfg(feature = "loom")]
use loom::thread::yield_now;

/// [`Config`] defines spin and backoff behavior for synchronization primitives.
pub trait Config: fmt::Debug + Default {
    /// Defines the number of retries spent busy-spinning before the backoff
    /// starts yielding the thread.
    #[inline]
    #[must_use]
    fn spin_count() -> usize {
        4096
    }

    /// Called once per failed retry with the number of retries so far.
    ///
    /// The default emits a CPU spin hint for the first [`Self::spin_count`]
    /// retries, then yields the thread on every retry.
    #[inline]
    fn backoff(spin_count: usize) {
        if cfg!(feature = "loom") || spin_count >= Self::spin_count() {
            yield_now();
        } else {
            spin_loop();
        }
    }
}

/// Default configuration for synchronization primitives.
#[derive(Debug, Default)]
pub struct DefaultConfig;

impl Config for DefaultConfig {}
