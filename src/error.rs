use thiserror::Error;

/// Errors raised by the enhancement-factor pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EfError {
    /// Spectra or parameters violate their documented constraints.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A denominator of the EF formula evaluated to zero.
    #[error("division by zero: {0} is zero")]
    DivisionByZero(&'static str),
}

impl EfError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EfError::InvalidInput(msg.into())
    }
}
