use thiserror::Error;

/// Errors raised by the game model and the algorithms built on top of it.
///
/// Structural violations are surfaced immediately and never repaired. LP
/// infeasibility is not an error; the consistency checker reports it as a
/// plain `bool`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A handle refers to an entity which has been deleted, or was never set.
    #[error("Null reference: {0} handle is stale or unset")]
    NullReference(&'static str),

    /// Objects from two different games (or the wrong owner) were combined.
    #[error("Mismatch: {0}")]
    Mismatch(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The status collaborator asked the running computation to stop.
    #[error("Computation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn mismatch<S: Into<String>>(message: S) -> Error {
        Error::Mismatch(message.into())
    }

    pub(crate) fn invalid<S: Into<String>>(message: S) -> Error {
        Error::InvalidArgument(message.into())
    }
}
