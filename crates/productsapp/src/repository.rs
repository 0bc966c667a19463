//! # Product Repository
//!
//! Translates collection-level operations into read/write pairs against a
//! [`StorageBackend`]. Every mutation follows the same protocol:
//!
//! ```text
//! read full collection -> locate target -> mutate in memory -> write full collection
//! ```
//!
//! There is no partial update at the storage level. Lookup is a linear scan
//! where the first matching id wins.
//!
//! ## Failure Semantics
//!
//! - A failed read aborts before anything is written and the read error is
//!   returned as is.
//! - A missing id returns [`ProductsError::NotFound`] and nothing is written.
//! - A failed write is returned as is; the backend keeps its prior contents.
//!
//! ## Locking
//!
//! Each mutation holds the repository guard from before the read until after
//! the write, so two requests in the same process cannot interleave their
//! read-modify-write cycles. Nothing coordinates separate processes sharing
//! the same file.
//!
//! ## Last Id
//!
//! [`Repository::last_id`] is the id of the *positionally last* record, not
//! the largest id. The collection is append-ordered, so the two only differ
//! after the last record has been hard-deleted.

use crate::error::{ProductsError, Result};
use crate::model::{Product, ProductDraft};
use crate::store::StorageBackend;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Collection operations the service layer depends on.
pub trait Repository: Send + Sync {
    fn get_all(&self) -> Result<Vec<Product>>;

    /// Id of the last stored record, or 0 for an empty collection.
    fn last_id(&self) -> Result<u64>;

    /// Append a record with a caller-assigned id.
    fn store(&self, id: u64, draft: ProductDraft) -> Result<Product>;

    /// Replace every mutable field of the record with `id`.
    fn update(&self, id: u64, draft: ProductDraft) -> Result<Product>;

    fn update_name_and_price(&self, id: u64, name: String, price: f64) -> Result<Product>;

    /// Soft delete: marks the record inactive and returns the whole collection.
    fn delete(&self, id: u64) -> Result<Vec<Product>>;

    /// Removes the record and returns what remains.
    fn hard_delete(&self, id: u64) -> Result<Vec<Product>>;
}

pub struct ProductRepository<B: StorageBackend> {
    backend: B,
    guard: Mutex<()>,
}

impl<B: StorageBackend> ProductRepository<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            guard: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one read-modify-write cycle under the guard.
    /// `apply` runs against the loaded collection; the collection is written
    /// back only if it succeeds.
    fn mutate<T>(&self, apply: impl FnOnce(&mut Vec<Product>) -> Result<T>) -> Result<T> {
        let _guard = self.lock();
        let mut products = self.backend.read()?;
        let out = apply(&mut products)?;
        self.backend.write(&products)?;
        Ok(out)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded state lives in the backend, so a poisoned guard is still usable.
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn position(products: &[Product], id: u64) -> Result<usize> {
    products.iter().position(|p| p.id == id).ok_or_else(|| {
        warn!(id, "product not found");
        ProductsError::NotFound(id)
    })
}

impl<B: StorageBackend> Repository for ProductRepository<B> {
    fn get_all(&self) -> Result<Vec<Product>> {
        let products = self.backend.read()?;
        debug!(count = products.len(), "loaded products");
        Ok(products)
    }

    fn last_id(&self) -> Result<u64> {
        let products = self.backend.read()?;
        Ok(products.last().map(|p| p.id).unwrap_or(0))
    }

    fn store(&self, id: u64, draft: ProductDraft) -> Result<Product> {
        self.mutate(|products| {
            let product = draft.into_product(id);
            products.push(product.clone());
            debug!(id, "stored product");
            Ok(product)
        })
    }

    fn update(&self, id: u64, draft: ProductDraft) -> Result<Product> {
        self.mutate(|products| {
            let index = position(products, id)?;
            products[index].apply(draft);
            debug!(id, "updated product");
            Ok(products[index].clone())
        })
    }

    fn update_name_and_price(&self, id: u64, name: String, price: f64) -> Result<Product> {
        self.mutate(|products| {
            let index = position(products, id)?;
            let product = &mut products[index];
            product.name = name;
            product.price = price;
            debug!(id, "updated product name and price");
            Ok(product.clone())
        })
    }

    fn delete(&self, id: u64) -> Result<Vec<Product>> {
        self.mutate(|products| {
            let index = position(products, id)?;
            products[index].active = false;
            debug!(id, "deactivated product");
            Ok(products.clone())
        })
    }

    fn hard_delete(&self, id: u64) -> Result<Vec<Product>> {
        self.mutate(|products| {
            let index = position(products, id)?;
            products.remove(index);
            debug!(id, remaining = products.len(), "removed product");
            Ok(products.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemBackend;

    fn prod1() -> Product {
        Product {
            id: 1,
            name: "prod1".into(),
            color: "celeste".into(),
            price: 44.44,
            stock: 222,
            code: "KJS4".into(),
            published: true,
            creation_date: "13-12-2021".into(),
            active: true,
        }
    }

    fn prod2() -> Product {
        Product {
            id: 2,
            name: "prod2".into(),
            color: "azul".into(),
            price: 14.14,
            stock: 672,
            code: "7UF4".into(),
            published: false,
            creation_date: "13-12-2021".into(),
            active: true,
        }
    }

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "After Update".into(),
            color: "celeste".into(),
            price: 2.0,
            stock: 2,
            code: "2".into(),
            published: true,
            creation_date: "2".into(),
            active: true,
        }
    }

    fn repo_with(products: &[Product]) -> ProductRepository<MemBackend> {
        ProductRepository::with_backend(MemBackend::with_products(products).unwrap())
    }

    #[test]
    fn get_all_returns_persisted_collection() {
        let repo = repo_with(&[prod1(), prod2()]);
        assert_eq!(repo.get_all().unwrap(), vec![prod1(), prod2()]);
        assert!(repo.backend().read_called());
    }

    #[test]
    fn get_all_on_empty_store_is_empty() {
        let repo = ProductRepository::with_backend(MemBackend::new());
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn get_all_propagates_read_error() {
        let repo = repo_with(&[]);
        repo.backend().fail_with("error for GetAll");
        let err = repo.get_all().unwrap_err();
        assert_eq!(err.to_string(), "Store error: error for GetAll");
        assert!(repo.backend().read_called());
    }

    #[test]
    fn last_id_is_positional() {
        let repo = repo_with(&[prod1(), prod2()]);
        assert_eq!(repo.last_id().unwrap(), 2);

        let reversed = repo_with(&[prod2(), prod1()]);
        assert_eq!(reversed.last_id().unwrap(), 1);
    }

    #[test]
    fn last_id_of_empty_collection_is_zero() {
        let repo = repo_with(&[]);
        assert_eq!(repo.last_id().unwrap(), 0);
    }

    #[test]
    fn store_appends_and_persists() {
        let repo = repo_with(&[prod1()]);
        let stored = repo.store(2, draft()).unwrap();

        assert_eq!(stored.id, 2);
        assert_eq!(stored.name, "After Update");
        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], prod1());
        assert_eq!(all[1], stored);
    }

    #[test]
    fn store_propagates_read_error() {
        let repo = repo_with(&[]);
        repo.backend().fail_with("error for Store");
        let err = repo.store(1, draft()).unwrap_err();
        assert_eq!(err.to_string(), "Store error: error for Store");
    }

    #[test]
    fn update_replaces_fields_and_keeps_id() {
        let repo = repo_with(&[prod1(), prod2()]);
        let updated = repo.update(1, draft()).unwrap();

        assert_eq!(updated, draft().into_product(1));
        let all = repo.get_all().unwrap();
        assert_eq!(all[0], draft().into_product(1));
        assert_eq!(all[1], prod2());
    }

    #[test]
    fn update_missing_id_is_not_found_and_writes_nothing() {
        let repo = repo_with(&[prod1()]);
        let before = repo.backend().data();

        let err = repo.update(2, draft()).unwrap_err();

        assert!(matches!(err, ProductsError::NotFound(2)));
        assert_eq!(err.to_string(), "product of id 2 not found");
        assert_eq!(repo.backend().data(), before);
    }

    #[test]
    fn update_propagates_read_error() {
        let repo = repo_with(&[prod1()]);
        repo.backend().fail_with("error for Update");
        let err = repo.update(1, draft()).unwrap_err();
        assert_eq!(err.to_string(), "Store error: error for Update");
    }

    #[test]
    fn update_name_and_price_changes_only_those_fields() {
        let mut before = prod2();
        before.id = 1;
        before.name = "Before Change".into();
        let repo = repo_with(&[before.clone()]);

        let result = repo
            .update_name_and_price(1, "After Update".into(), 100.10)
            .unwrap();

        let mut expected = before;
        expected.name = "After Update".into();
        expected.price = 100.10;
        assert_eq!(result, expected);
        assert_eq!(repo.get_all().unwrap(), vec![expected]);
    }

    #[test]
    fn update_name_and_price_missing_id_is_not_found() {
        let repo = repo_with(&[prod1()]);
        let before = repo.backend().data();

        let err = repo
            .update_name_and_price(2, "After Update".into(), 100.10)
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(repo.backend().data(), before);
        assert!(repo.backend().read_called());
    }

    #[test]
    fn delete_is_soft() {
        let repo = repo_with(&[prod1(), prod2()]);
        let all = repo.delete(1).unwrap();

        let mut expected = prod1();
        expected.active = false;
        assert_eq!(all, vec![expected.clone(), prod2()]);
        assert_eq!(repo.get_all().unwrap(), vec![expected, prod2()]);
    }

    #[test]
    fn delete_missing_id_is_not_found() {
        let repo = repo_with(&[prod1()]);
        assert!(matches!(repo.delete(9), Err(ProductsError::NotFound(9))));
        assert_eq!(repo.get_all().unwrap(), vec![prod1()]);
    }

    #[test]
    fn delete_propagates_read_error() {
        let repo = repo_with(&[prod1()]);
        repo.backend().fail_with("error for Delete");
        assert!(matches!(repo.delete(1), Err(ProductsError::Store(_))));
    }

    #[test]
    fn hard_delete_removes_exactly_one() {
        let repo = repo_with(&[prod1(), prod2()]);
        let remaining = repo.hard_delete(1).unwrap();

        assert_eq!(remaining, vec![prod2()]);
        assert_eq!(repo.get_all().unwrap(), vec![prod2()]);
    }

    #[test]
    fn hard_delete_missing_id_is_not_found() {
        let repo = repo_with(&[prod1()]);
        let before = repo.backend().data();
        assert!(repo.hard_delete(2).unwrap_err().is_not_found());
        assert_eq!(repo.backend().data(), before);
    }

    #[test]
    fn write_errors_propagate_and_leave_data_unchanged() {
        let repo = repo_with(&[prod1(), prod2()]);
        let before = repo.backend().data();
        repo.backend().fail_writes_with("error for Write");

        let errors = [
            repo.store(3, draft()).unwrap_err(),
            repo.update(1, draft()).unwrap_err(),
            repo.update_name_and_price(1, "x".into(), 1.0).unwrap_err(),
            repo.delete(1).unwrap_err(),
            repo.hard_delete(1).unwrap_err(),
        ];

        for err in errors {
            assert!(matches!(&err, ProductsError::Store(m) if m == "error for Write"));
        }
        assert!(repo.backend().write_called());
        assert_eq!(repo.backend().data(), before);
    }

    #[test]
    fn failed_read_never_writes() {
        let repo = repo_with(&[prod1()]);
        repo.backend().fail_with("error for Read");

        assert!(repo.store(2, draft()).is_err());
        assert!(repo.update(1, draft()).is_err());
        assert!(repo.update_name_and_price(1, "x".into(), 1.0).is_err());
        assert!(repo.delete(1).is_err());
        assert!(repo.hard_delete(1).is_err());

        assert!(repo.backend().read_called());
        assert!(!repo.backend().write_called());
    }

    #[test]
    fn not_found_never_writes() {
        let repo = repo_with(&[prod1()]);

        assert!(repo.update(7, draft()).is_err());
        assert!(repo.delete(7).is_err());
        assert!(repo.hard_delete(7).is_err());

        assert!(!repo.backend().write_called());
    }

    #[test]
    fn hard_delete_of_last_record_rewinds_last_id() {
        let repo = repo_with(&[prod1(), prod2()]);
        repo.hard_delete(2).unwrap();
        assert_eq!(repo.last_id().unwrap(), 1);
    }
}
