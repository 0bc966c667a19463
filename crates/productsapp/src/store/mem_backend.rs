use super::backend::StorageBackend;
use crate::error::{ProductsError, Result};
use crate::model::Product;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory storage backend for testing.
///
/// Holds the collection as raw JSON bytes so tests can compare persisted
/// state byte for byte. A failure can be injected; while set, both `read`
/// and `write` return it. A write-only failure leaves reads working.
/// `read_called` and `write_called` record whether each was attempted.
///
/// Uses `Mutex` rather than `RefCell` because backends are shared with the
/// HTTP layer.
#[derive(Default)]
pub struct MemBackend {
    data: Mutex<Vec<u8>>,
    failure: Mutex<Option<String>>,
    write_failure: Mutex<Option<String>>,
    read_called: AtomicBool,
    write_called: AtomicBool,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with `products`.
    pub fn with_products(products: &[Product]) -> Result<Self> {
        let backend = Self::new();
        backend.set_data(serde_json::to_vec(products)?);
        Ok(backend)
    }

    /// Make every subsequent read and write fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *locked(&self.failure) = Some(message.into());
    }

    /// Make subsequent writes fail with `message`; reads keep working.
    pub fn fail_writes_with(&self, message: impl Into<String>) {
        *locked(&self.write_failure) = Some(message.into());
    }

    pub fn clear_failure(&self) {
        *locked(&self.failure) = None;
        *locked(&self.write_failure) = None;
    }

    pub fn read_called(&self) -> bool {
        self.read_called.load(Ordering::SeqCst)
    }

    pub fn write_called(&self) -> bool {
        self.write_called.load(Ordering::SeqCst)
    }

    /// The raw persisted bytes.
    pub fn data(&self) -> Vec<u8> {
        locked(&self.data).clone()
    }

    pub fn set_data(&self, bytes: Vec<u8>) {
        *locked(&self.data) = bytes;
    }

    fn check_failure(&self, slot: &Mutex<Option<String>>) -> Result<()> {
        match locked(slot).as_ref() {
            Some(message) => Err(ProductsError::Store(message.clone())),
            None => Ok(()),
        }
    }
}

impl StorageBackend for MemBackend {
    fn read(&self) -> Result<Vec<Product>> {
        self.read_called.store(true, Ordering::SeqCst);
        self.check_failure(&self.failure)?;

        let data = locked(&self.data);
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    fn write(&self, products: &[Product]) -> Result<()> {
        self.write_called.store(true, Ordering::SeqCst);
        self.check_failure(&self.failure)?;
        self.check_failure(&self.write_failure)?;
        let bytes = serde_json::to_vec(products)?;
        *locked(&self.data) = bytes;
        Ok(())
    }
}
