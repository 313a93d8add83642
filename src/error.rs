//! Error types for template resolution.
//!
//! Almost nothing in the engine is fatal: missing paths, malformed call
//! clauses and type mismatches all degrade to "no match". The variants here
//! cover the cases a caller has to act on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HoistError {
    /// Address/rule indirection nested deeper than the configured limit,
    /// almost always a cycle in the template or context graph.
    #[error("resolution depth limit of {limit} exceeded while resolving '{address}'")]
    DepthExceeded { limit: usize, address: String },

    /// The template was not a JSON object.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// The context store was not a JSON object of namespaces.
    #[error("invalid context store: {0}")]
    InvalidContext(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HoistError>;
