//! pf-io: case-directory storage for snapshots, bases and output fields.

pub mod store;
pub mod types;

pub use store::CaseStore;
pub use types::*;

pub type IoResult<T> = Result<T, IoError>;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
