use crate::error::Result;
use crate::model::Product;

/// Abstract interface for raw collection I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `ProductRepository` handles the "what" (lookup, mutation, id rules).
///
/// Implementations are shared across request handlers, hence `Send + Sync`.
pub trait StorageBackend: Send + Sync {
    /// Load the whole persisted collection.
    /// Fails if the underlying storage cannot be read or does not decode.
    fn read(&self) -> Result<Vec<Product>>;

    /// Replace the persisted collection with `products`.
    /// A successful call fully replaces the prior contents.
    fn write(&self, products: &[Product]) -> Result<()>;
}
