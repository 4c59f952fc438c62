//! Error type shared by the store, the search engine, and configuration loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid locus {0:?}: expected chr:pos:ref:alt")]
    InvalidLocus(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("stored value could not be decoded: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
