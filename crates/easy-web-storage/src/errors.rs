use std::io;
use thiserror::Error;

use crate::area::AreaKind;

#[derive(Error, Debug)]
pub enum AreaError {
    #[error("Storage area is unavailable: {0}")]
    Unavailable(String),
    #[error("Storage quota exceeded while writing `{key}`")]
    QuotaExceeded { key: String },
    #[error("Storage area IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Storage area host error: {0}")]
    Host(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unsupported storage area `{0}`")]
    UnsupportedArea(String),
    #[error("Storage area `{kind}` could not be resolved: {source}")]
    AreaUnavailable { kind: AreaKind, source: AreaError },
    #[error("Value at `{key}` is not valid JSON: {source}")]
    Decode { key: String, source: serde_json::Error },
    #[error("Value for `{key}` could not be encoded: {source}")]
    Encode { key: String, source: serde_json::Error },
    #[error("Storage area failed on `{key}`: {source}")]
    Area { key: String, source: AreaError },
    #[error("Store has no storage area")]
    Inert,
}

pub type Result<T> = std::result::Result<T, StoreError>;
