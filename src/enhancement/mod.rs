pub mod client;
pub mod health;
pub mod mock;
pub mod orchestrator;
pub mod parse;
pub mod queries;
pub mod types;

use thiserror::Error;

/// Failure of a single retrieval call. Never surfaced to analysis callers;
/// the orchestrator records the slot as empty instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Retrieval service connection failed: {0}")]
    Connection(String),

    #[error("Retrieval query timed out after {0}ms")]
    Timeout(u64),

    #[error("Retrieval service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Retrieval cancelled")]
    Cancelled,
}
