//! # Storage Layer
//!
//! The catalogue is persisted as a single JSON document. The [`StorageBackend`]
//! trait is the raw I/O seam: it reads the whole collection and writes the
//! whole collection, nothing finer grained. Lookup, mutation and id rules live
//! one level up, in [`crate::repository`].
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: Production backend. One pretty-printed JSON
//!   array in a file. Writes go to a temp file in the same directory and are
//!   renamed over the target, so a failed write never leaves a half-written file.
//! - [`mem_backend::MemBackend`]: For testing logic without filesystem I/O.
//!   Supports injected failures and records whether a read happened.
//!
//! ## Empty and Missing Files
//!
//! - A zero-length (or whitespace-only) file reads as the empty collection.
//! - A missing file is an I/O error. [`fs_backend::FsBackend::init`] creates
//!   the file with `[]` and is run by the server at start-up.
//!
//! ## Storage Layout
//!
//! ```text
//! products.json          # [ {"id": 1, ...}, {"id": 2, ...} ]
//! .products.json-*.tmp   # transient, only during a write
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
