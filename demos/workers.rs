//! Worker threads coordinating over one shared lock region.
//!
//! A coordinator initializes the region, a handful of workers attach to it,
//! acquire the lock and wait; once every worker is parked in the wait loop
//! the coordinator wakes them all at once.
//!
//! ```sh
//! RUST_LOG=info cargo run --example workers
//! ```

use log::info;
use shmutex::{SLOT_COUNT, SharedLock, UnitId};
use std::sync::atomic::AtomicI32;
use std::sync::atomic::Ordering::SeqCst;
use std::thread;

const NUM_WORKERS: i32 = 4;

fn main() {
    env_logger::init();

    let region: Vec<AtomicI32> = (0..SLOT_COUNT).map(|_| AtomicI32::new(0)).collect();
    let coordinator: SharedLock = SharedLock::initialize(&region, UnitId::current());

    thread::scope(|s| {
        for _ in 0..NUM_WORKERS {
            s.spawn(|| {
                let id = UnitId::current();
                let lock: SharedLock = SharedLock::attach(&region, id);
                lock.acquire();
                info!("worker {id} parked");
                lock.wait().expect("the lock is held");
                info!("worker {id} resumed");
                lock.release();
            });
        }

        while coordinator.waiter_count(SeqCst) < NUM_WORKERS {
            thread::yield_now();
        }
        coordinator.acquire();
        info!("waking {NUM_WORKERS} workers");
        coordinator.notify_all().expect("the lock is held");
        coordinator.release();
    });

    info!("all workers done: {coordinator:?}");
}
