use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProductsError {
    #[error("product of id {0} not found")]
    NotFound(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ProductsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProductsError::NotFound(_))
    }
}

impl From<confique::Error> for ProductsError {
    fn from(err: confique::Error) -> Self {
        ProductsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProductsError>;
