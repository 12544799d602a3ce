use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the style, legend and coordinate helpers.
///
/// All variants are raised synchronously at the call that detects them;
/// nothing is retried or wrapped internally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown style '{0}'")]
    NotFound(String),

    #[error("style stack is empty")]
    EmptyStack,

    #[error("invalid style definition: {0}")]
    DuplicateOrInvalid(String),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}
