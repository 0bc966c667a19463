//! # Configuration
//!
//! Service configuration is managed by [`confique`], which handles layered
//! loading from TOML files and environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Command-line flags**: applied by the binary after loading.
//! 2. **Environment variables**: `PRODUCTS_PORT`, `PRODUCTS_DATA_FILE`, `TOKEN`, etc.
//! 3. **Explicit file**: the path given with `--config`.
//! 4. **User config**: `products.toml` in the OS config directory (via `directories`).
//! 5. **Compiled defaults**: built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Env | Description |
//! |-----|---------|-----|-------------|
//! | `host` | `127.0.0.1` | `PRODUCTS_HOST` | Bind address |
//! | `port` | `8080` | `PRODUCTS_PORT` | Bind port |
//! | `data_file` | `products.json` | `PRODUCTS_DATA_FILE` | JSON collection file |
//! | `create_if_missing` | `true` | `PRODUCTS_CREATE_IF_MISSING` | Create `[]` at start-up |
//! | `token` | unset | `TOKEN` | Required `token` header; unset disables the check |
//! | `log_level` | `info` | `PRODUCTS_LOG_LEVEL` | Overridden by `RUST_LOG` |
//! | `log_format` | `pretty` | `PRODUCTS_LOG_FORMAT` | `pretty` or `json` |

use crate::error::{ProductsError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "products.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    #[config(default = "127.0.0.1", env = "PRODUCTS_HOST")]
    pub host: String,

    #[config(default = 8080, env = "PRODUCTS_PORT")]
    pub port: u16,

    /// File holding the product collection.
    #[config(default = "products.json", env = "PRODUCTS_DATA_FILE")]
    pub data_file: PathBuf,

    /// Create the data file with an empty collection when it does not exist.
    #[config(default = true, env = "PRODUCTS_CREATE_IF_MISSING")]
    pub create_if_missing: bool,

    /// Shared secret expected in the `token` request header.
    #[config(env = "TOKEN")]
    pub token: Option<String>,

    #[config(default = "info", env = "PRODUCTS_LOG_LEVEL")]
    pub log_level: String,

    /// `pretty` or `json`.
    #[config(default = "pretty", env = "PRODUCTS_LOG_FORMAT")]
    pub log_format: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_file: PathBuf::from("products.json"),
            create_if_missing: true,
            token: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load from the environment, the explicit file (which must exist), then the
    /// user config file when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(explicit, user_config_path())
    }

    /// Same layering as [`ServiceConfig::load`] with the user config file
    /// given by the caller; `None` skips that layer.
    pub fn load_from(explicit: Option<&Path>, user_file: Option<PathBuf>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ProductsError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.file(path);
        }
        if let Some(path) = user_file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `products.toml` inside the OS-specific config directory.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "products").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
