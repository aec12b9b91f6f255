use mortgage_types::LoanCalculation;

pub mod in_memory_store;

pub use in_memory_store::InMemoryResultStore;

/// Keeps every accepted calculation and hands out their identifiers.
///
/// Implementations must be safe to call from concurrent requests: each
/// `store` receives a distinct id and no entry is lost or overwritten.
pub trait ResultStore: Send + Sync + std::fmt::Debug {
    /// Assigns the next id to `calculation`, keeps a copy, and returns the id.
    fn store(&self, calculation: &mut LoanCalculation) -> u64;

    /// Every stored calculation, in no particular order.
    fn get_all(&self) -> Vec<LoanCalculation>;

    /// Number of stored calculations.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
