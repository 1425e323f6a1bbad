//! Error types for integration.

use thiserror::Error;

/// Errors encountered while advancing an ODE system.
#[derive(Error, Debug)]
pub enum OdeError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("State length mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Singular system: {what}")]
    Singular { what: &'static str },

    #[error("Non-finite state at x = {x}")]
    NonFinite { x: f64 },

    #[error("System error: {0}")]
    System(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl OdeError {
    /// Wrap an error raised by an `OdeSystem` implementation.
    pub fn system<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        OdeError::System(Box::new(err))
    }

    /// Recover the system's own error type, if this wraps one.
    pub fn downcast_system<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            OdeError::System(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

pub type OdeResult<T> = Result<T, OdeError>;
