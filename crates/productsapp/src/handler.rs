//! # Request Handling
//!
//! Framework-agnostic request/response handling for the product endpoints.
//! The HTTP server (axum, in the `products` binary) only moves bytes in and out;
//! everything between the raw request and the service call happens here:
//!
//! - **Token check**: when a token is configured, the `token` header must match.
//! - **Binding**: path ids are parsed, JSON bodies decoded into [`ProductRequest`].
//! - **Validation**: required fields are checked before the service is called.
//! - **Status mapping**: results become a [`Response`] envelope carrying the
//!   status code.
//!
//! | Outcome | Status |
//! |---------|--------|
//! | success | 200 |
//! | bad id, bad body, missing field | 400 |
//! | token mismatch | 401 |
//! | `NotFound` | 404 |
//! | any other service error | 400 |

use crate::error::{ProductsError, Result};
use crate::model::{Product, ProductDraft};
use crate::repository::Repository;
use crate::service::ProductService;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_NOT_FOUND: u16 = 404;

/// Request body for creation and updates. Missing fields bind to their zero
/// value and are rejected by validation, not by decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRequest {
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

impl ProductRequest {
    pub fn from_json(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Checks every field a full product needs.
    pub fn validate(&self) -> Result<()> {
        require(!self.name.is_empty(), "a product name must be provided")?;
        require(!self.color.is_empty(), "a product color must be provided")?;
        require(self.price > 0.0, "a product price must be provided")?;
        require(self.stock != 0, "a product stock must be provided")?;
        require(!self.code.is_empty(), "a product code must be provided")?;
        require(
            !self.creation_date.is_empty(),
            "a product creation date must be provided",
        )
    }

    pub fn validate_name_and_price(&self) -> Result<()> {
        require(!self.name.is_empty(), "a product name must be provided")?;
        require(self.price > 0.0, "a product price must be provided")
    }

    pub fn into_draft(self) -> ProductDraft {
        ProductDraft {
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

fn require(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ProductsError::Validation(message.to_string()))
    }
}

/// Response envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Response<T> {
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: STATUS_OK,
            data: Some(data),
            error: None,
        }
    }

    pub fn from_error(err: &ProductsError) -> Self {
        Self {
            code: status_of(err),
            data: None,
            error: Some(err.to_string()),
        }
    }

    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => {
                debug!(error = %err, "request failed");
                Self::from_error(&err)
            }
        }
    }
}

pub fn status_of(err: &ProductsError) -> u16 {
    match err {
        ProductsError::NotFound(_) => STATUS_NOT_FOUND,
        ProductsError::Unauthorized(_) => STATUS_UNAUTHORIZED,
        _ => STATUS_BAD_REQUEST,
    }
}

pub fn parse_id(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ProductsError::Validation("invalid ID".to_string()))
}

pub struct ProductHandler<R: Repository> {
    service: ProductService<R>,
    token: Option<String>,
}

impl<R: Repository> ProductHandler<R> {
    pub fn new(service: ProductService<R>, token: Option<String>) -> Self {
        Self { service, token }
    }

    pub fn service(&self) -> &ProductService<R> {
        &self.service
    }

    /// With no configured token every caller is allowed.
    pub fn validate_token(&self, provided: Option<&str>) -> Result<()> {
        match &self.token {
            Some(expected) if provided != Some(expected.as_str()) => {
                Err(ProductsError::Unauthorized(
                    "you do not have permission to perform the requested operation".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn get_all(&self) -> Response<Vec<Product>> {
        Response::from_result(self.service.get_all())
    }

    pub fn store(&self, body: &[u8]) -> Response<Product> {
        Response::from_result(self.try_store(body))
    }

    pub fn update(&self, raw_id: &str, body: &[u8]) -> Response<Product> {
        Response::from_result(self.try_update(raw_id, body))
    }

    pub fn update_name_and_price(&self, raw_id: &str, body: &[u8]) -> Response<Product> {
        Response::from_result(self.try_update_name_and_price(raw_id, body))
    }

    pub fn delete(&self, raw_id: &str) -> Response<Vec<Product>> {
        Response::from_result(parse_id(raw_id).and_then(|id| self.service.delete(id)))
    }

    pub fn hard_delete(&self, raw_id: &str) -> Response<Vec<Product>> {
        Response::from_result(parse_id(raw_id).and_then(|id| self.service.hard_delete(id)))
    }

    fn try_store(&self, body: &[u8]) -> Result<Product> {
        let request = ProductRequest::from_json(body)?;
        request.validate()?;
        self.service.store(request.into_draft())
    }

    fn try_update(&self, raw_id: &str, body: &[u8]) -> Result<Product> {
        let id = parse_id(raw_id)?;
        let request = ProductRequest::from_json(body)?;
        request.validate()?;
        self.service.update(id, request.into_draft())
    }

    fn try_update_name_and_price(&self, raw_id: &str, body: &[u8]) -> Result<Product> {
        let id = parse_id(raw_id)?;
        let request = ProductRequest::from_json(body)?;
        request.validate_name_and_price()?;
        self.service
            .update_name_and_price(id, request.name, request.price)
    }
}
