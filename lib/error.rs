//! Error types shared by every constructor and superoperator builder.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type QResult<T> = Result<T, QError>;

/// Failure modes for quantum-object construction and manipulation.
///
/// Errors are raised at the point of detection and never retried; a failing
/// call returns no partial object.
#[derive(Debug, Error)]
pub enum QError {
    /// The input is not the kind of object required (e.g. a superoperator or
    /// a vector where a plain operator is expected).
    #[error("type error: {0}")]
    Type(String),

    /// Dimensions or matrix shapes are inconsistent.
    #[error("shape error: {0}")]
    Shape(String),

    /// An unrecognized method name was requested.
    #[error("invalid method '{0}': expected 'dense' or 'sparse'")]
    Method(String),

    /// A dense factorization failed.
    #[error("linear algebra error: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),

    /// Settings could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Settings parsed, but hold an unusable value.
    #[error("invalid setting: {0}")]
    Setting(String),

    /// Settings could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl QError {
    pub(crate) fn type_err<S: Into<String>>(msg: S) -> Self {
        Self::Type(msg.into())
    }

    pub(crate) fn shape_err<S: Into<String>>(msg: S) -> Self {
        Self::Shape(msg.into())
    }
}
