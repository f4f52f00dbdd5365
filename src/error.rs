//! Error types for rowdiff operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RowdiffError>;

#[derive(Error, Debug)]
pub enum RowdiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no ident column configured for table '{name}' (use --ident-col)")]
    UnknownTable { name: String },

    #[error("no such table: {name}")]
    TableNotFound { name: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    #[error("Data shape error: {message}")]
    DataShape { message: String },

    #[error("Asymmetric match: {message}")]
    AsymmetricMatch { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl RowdiffError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: msg.into(),
        }
    }

    pub fn data_shape(msg: impl Into<String>) -> Self {
        Self::DataShape {
            message: msg.into(),
        }
    }

    pub fn asymmetric(msg: impl Into<String>) -> Self {
        Self::AsymmetricMatch {
            message: msg.into(),
        }
    }
}
