//! # productsapp
//!
//! A product catalogue persisted to a single JSON file, with the layers a small
//! HTTP service needs: storage, repository, service and request handling. The
//! library is UI agnostic; the `products` binary puts an HTTP server in front of it.
//!
//! ## Layering
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Handler (handler.rs)                                │
//! │  - token check, id/body binding, field validation    │
//! │  - error -> status mapping, response envelope        │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  Service (service.rs)                                │
//! │  - assigns new ids (last id + 1)                     │
//! │  - passes everything else through                    │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  Repository (repository.rs)                          │
//! │  - read -> locate -> mutate -> write, under a guard  │
//! │  - NotFound for unknown ids                          │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  Storage backend (store/)                            │
//! │  - FsBackend: JSON file, atomic replace              │
//! │  - MemBackend: in-memory, failure injection          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Each layer owns the one below it; nothing is global. [`open`] wires the
//! production stack from a [`config::ServiceConfig`].

pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::handler::ProductHandler;
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::store::FsBackend;

pub type FileHandler = ProductHandler<ProductRepository<FsBackend>>;

/// Build the file-backed handler stack, creating the data file first when
/// `create_if_missing` is set.
pub fn open(config: &ServiceConfig) -> Result<FileHandler> {
    let backend = FsBackend::new(config.data_file.clone());
    if config.create_if_missing && backend.init()? {
        tracing::info!(path = %config.data_file.display(), "initialized empty product file");
    }
    let repository = ProductRepository::with_backend(backend);
    let service = ProductService::new(repository);
    Ok(ProductHandler::new(service, config.token.clone()))
}
