use super::ResultStore;
use mortgage_types::LoanCalculation;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Process-local result store.
///
/// The id counter and the entries share one readers-writer lock: `store`
/// takes it exclusively, `get_all` shares it with other readers. Ids start at
/// 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    last_id: u64,
    entries: HashMap<u64, LoanCalculation>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// A panic while holding the lock cannot leave a half-written entry: the id and
// the insert happen after every fallible step, so a poisoned lock is reused.
impl ResultStore for InMemoryResultStore {
    fn store(&self, calculation: &mut LoanCalculation) -> u64 {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        inner.last_id += 1;
        let id = inner.last_id;
        calculation.assign_id(id);
        inner.entries.insert(id, calculation.clone());

        debug!(id, total = inner.entries.len(), "Calculation stored");
        id
    }

    fn get_all(&self) -> Vec<LoanCalculation> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).entries.len()
    }
}
