#[cfg(feature = "loom")]
#[cfg(test)]
mod lock_model {
    use crate::{SLOT_COUNT, SharedLock, UnitId};

    use loom::sync::atomic::AtomicI32;
    use loom::thread::spawn;
    use std::sync::Arc;
    use std::sync::atomic::Ordering::SeqCst;

    fn region() -> Arc<Vec<AtomicI32>> {
        Arc::new((0..SLOT_COUNT).map(|_| AtomicI32::new(0)).collect())
    }

    #[test]
    fn handoff() {
        loom::model(|| {
            let region = region();
            let lock: SharedLock = SharedLock::initialize(&region, UnitId::new(1).unwrap());
            lock.acquire();

            let region_clone = region.clone();
            let thread = spawn(move || {
                let id = UnitId::new(2).unwrap();
                let lock: SharedLock = SharedLock::attach(&region_clone, id);
                lock.acquire();
                assert_eq!(lock.owner(SeqCst), Some(id));
                lock.release();
            });

            lock.release();
            assert!(thread.join().is_ok());
        });
    }

    #[test]
    fn exclusion() {
        loom::model(|| {
            let region = region();
            let lock: SharedLock = SharedLock::initialize(&region, UnitId::new(1).unwrap());

            let region_clone = region.clone();
            let thread = spawn(move || {
                let id = UnitId::new(2).unwrap();
                let lock: SharedLock = SharedLock::attach(&region_clone, id);
                if lock.try_acquire() {
                    assert_eq!(lock.owner(SeqCst), Some(id));
                    lock.release();
                }
            });

            lock.acquire();
            assert_eq!(lock.owner(SeqCst), Some(UnitId::new(1).unwrap()));
            lock.release();
            assert!(thread.join().is_ok());
        });
    }
}
