//! # Domain Model
//!
//! The catalogue holds a single entity, [`Product`]. Products are persisted as
//! one JSON array, so the serialized field names here are the on-disk format:
//!
//! ```text
//! [
//!   {
//!     "id": 1,
//!     "name": "p1",
//!     "color": "red",
//!     "price": 10.0,
//!     "stock": 5,
//!     "code": "C1",
//!     "published": true,
//!     "creationDate": "2024-01-01",
//!     "active": true
//!   }
//! ]
//! ```
//!
//! `creationDate` is free-form text; nothing parses it as a calendar date.
//! `active` is the soft-delete flag: inactive products stay in the collection
//! and are listed like any other.
//!
//! [`ProductDraft`] carries the eight mutable fields. Creation and full
//! updates take a draft rather than a long positional argument list.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub price: f64,
    pub stock: u32,
    pub code: String,
    pub published: bool,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    pub active: bool,
}

/// Everything about a product except its identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub color: String,
    pub price: f64,
    pub stock: u32,
    pub code: String,
    pub published: bool,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    pub active: bool,
}

impl ProductDraft {
    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            name: self.name,
            color: self.color,
            price: self.price,
            stock: self.stock,
            code: self.code,
            published: self.published,
            creation_date: self.creation_date,
            active: self.active,
        }
    }
}

impl Product {
    /// Overwrites every mutable field, keeping `id`.
    pub fn apply(&mut self, draft: ProductDraft) {
        let id = self.id;
        *self = draft.into_product(id);
    }
}
