//! Error handling for influence limiting operations

use std::fmt;

use thiserror::Error;

use crate::host::HostError;

/// Result type alias for influence limiting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while limiting influences
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Nothing is selected
    #[error("Selection is empty.")]
    EmptySelection,

    /// The selection mixes meshes and vertices, or holds something else
    #[error("Invalid selection: {message}")]
    InvalidSelection {
        /// What was wrong with the selection
        message: String,
    },

    /// The target mesh has no skin deformer bound to it
    #[error("No skin deformer attached to mesh {mesh}.")]
    MissingDeformer {
        /// The mesh without a deformer
        mesh: String,
    },

    /// Invalid parameter, such as a cap below 1
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Which argument was rejected and why
        message: String,
    },

    /// A vertex expression could not be parsed
    #[error("Cannot parse '{expression}': {message}")]
    ParseError {
        /// The expression as selected
        expression: String,
        /// Why it was rejected
        message: String,
    },

    /// A file could not be opened or written
    #[error("IO error: {message}")]
    IoError {
        /// The underlying I/O failure
        message: String,
    },

    /// The host rejected a query or mutation
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// The failure kind of an [`Error`], without its details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::EmptySelection`]
    EmptySelection,
    /// See [`Error::InvalidSelection`]
    InvalidSelection,
    /// See [`Error::MissingDeformer`]
    MissingDeformer,
    /// See [`Error::InvalidArgument`]
    InvalidArgument,
    /// See [`Error::ParseError`]
    ParseError,
    /// See [`Error::IoError`]
    IoError,
    /// See [`Error::Host`]
    Host,
}

impl ErrorKind {
    /// Short name shown to the user
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptySelection => "Empty selection",
            Self::InvalidSelection => "Invalid selection",
            Self::MissingDeformer => "Missing skin deformer",
            Self::InvalidArgument => "Invalid argument",
            Self::ParseError => "Parse error",
            Self::IoError => "IO error",
            Self::Host => "Host error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a new invalid selection error
    pub fn invalid_selection<S: Into<String>>(message: S) -> Self {
        Self::InvalidSelection {
            message: message.into(),
        }
    }

    /// Create a new missing deformer error
    pub fn missing_deformer<S: Into<String>>(mesh: S) -> Self {
        Self::MissingDeformer { mesh: mesh.into() }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse_error<E: Into<String>, M: Into<String>>(expression: E, message: M) -> Self {
        Self::ParseError {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io_error<S: Into<String>>(message: S) -> Self {
        Self::IoError {
            message: message.into(),
        }
    }

    /// The failure kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySelection => ErrorKind::EmptySelection,
            Self::InvalidSelection { .. } => ErrorKind::InvalidSelection,
            Self::MissingDeformer { .. } => ErrorKind::MissingDeformer,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::ParseError { .. } => ErrorKind::ParseError,
            Self::IoError { .. } => ErrorKind::IoError,
            Self::Host(_) => ErrorKind::Host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = Error::missing_deformer("body_geo");
        assert!(matches!(error, Error::MissingDeformer { .. }));
        assert_eq!(
            error.to_string(),
            "No skin deformer attached to mesh body_geo."
        );
        assert_eq!(error.kind(), ErrorKind::MissingDeformer);
    }

    #[test]
    fn test_parse_error_names_expression() {
        let error = Error::parse_error("body.vtx[7:3]", "range start is after its end");
        assert_eq!(
            error.to_string(),
            "Cannot parse 'body.vtx[7:3]': range start is after its end"
        );
        assert_eq!(error.kind().as_str(), "Parse error");
    }

    #[test]
    fn test_host_error_conversion() {
        let error: Error = HostError::other("deformer locked").into();
        assert_eq!(error.kind(), ErrorKind::Host);
        assert_eq!(error.to_string(), "Host error: deformer locked");
    }

    #[test]
    fn test_io_error_kind() {
        let error = Error::io_error("cannot open log file run.log");
        assert_eq!(error.kind(), ErrorKind::IoError);
        assert_eq!(error.to_string(), "IO error: cannot open log file run.log");
    }
}
