//! # Product Service
//!
//! Sequences id assignment for new products and otherwise hands every call
//! straight to the [`Repository`]. New ids are `last_id() + 1`; the creation
//! guard is held across that lookup and the append so two concurrent creations
//! cannot be given the same id.

use crate::error::{ProductsError, Result};
use crate::model::{Product, ProductDraft};
use crate::repository::Repository;
use std::sync::{Mutex, PoisonError};
use tracing::info;

pub struct ProductService<R: Repository> {
    repository: R,
    creation: Mutex<()>,
}

impl<R: Repository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            creation: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn get_all(&self) -> Result<Vec<Product>> {
        self.repository.get_all()
    }

    pub fn store(&self, draft: ProductDraft) -> Result<Product> {
        let _guard = self
            .creation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let new_id = self
            .repository
            .last_id()?
            .checked_add(1)
            .ok_or_else(|| ProductsError::Store("id space exhausted".to_string()))?;
        let product = self.repository.store(new_id, draft)?;
        info!(id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub fn update(&self, id: u64, draft: ProductDraft) -> Result<Product> {
        self.repository.update(id, draft)
    }

    pub fn update_name_and_price(&self, id: u64, name: String, price: f64) -> Result<Product> {
        self.repository.update_name_and_price(id, name, price)
    }

    pub fn delete(&self, id: u64) -> Result<Vec<Product>> {
        let products = self.repository.delete(id)?;
        info!(id, "product deactivated");
        Ok(products)
    }

    pub fn hard_delete(&self, id: u64) -> Result<Vec<Product>> {
        let products = self.repository.hard_delete(id)?;
        info!(id, "product removed");
        Ok(products)
    }
}
