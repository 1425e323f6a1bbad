use thiserror::Error;

pub type PfResult<T> = Result<T, PfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Length mismatch: {what} (expected={expected}, found={found})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
