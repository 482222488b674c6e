use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::fields::NaturalKey;

/// One async mutex per natural key.
///
/// Slots nobody holds or waits for are dropped on the next acquisition.
#[derive(Debug, Default)]
pub struct KeyLocks {
    slots: Mutex<HashMap<NaturalKey, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other holder has `key`, then hold it until the guard drops.
    pub async fn lock(&self, key: &NaturalKey) -> OwnedMutexGuard<()> {
        let slot = {
            // The map is consistent after any panic, so a poisoned lock is usable.
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(key.clone()).or_default())
        };
        slot.lock_owned().await
    }

    /// Number of keys currently held or waited for.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| Arc::strong_count(slot) > 1)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
