use crate::tree::TreeError;
use thiserror::Error;
use wikitree_scanner::ScanError;

#[derive(Error, Debug)]
pub enum WikitreeError {
    #[error("Expansion failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Malformed keyword list: {0}")]
    Tree(#[from] TreeError),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WikitreeError>;
