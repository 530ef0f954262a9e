//! Common error type definitions.

use strum::{AsRefStr, Display, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source of structured errors so any `std::error::Error` can be
/// attached while keeping the error `Send + Sync`.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur in tessera operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input failed structural validation.
    InvalidInput,
    /// Input carried a variant tag outside the closed variant set.
    UnknownVariant,
    /// Serialization/deserialization error.
    Serialization,
    /// Configuration value could not be interpreted.
    Configuration,
}

/// A structured error type for tessera operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new unknown variant error.
    pub fn unknown_variant() -> Self {
        Self::new(ErrorKind::UnknownVariant)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization()
            .with_message(error.to_string())
            .with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_with_message() {
        let error = Error::unknown_variant().with_message("tag 'audio'");
        assert_eq!(error.to_string(), "unknown_variant: tag 'audio'");
        assert_eq!(error.kind_str(), "unknown_variant");
    }

    #[test]
    fn test_error_display_without_message() {
        let error = Error::configuration();
        assert_eq!(error.to_string(), "configuration");
        assert!(error.source.is_none());
    }

    #[test]
    fn test_error_from_serde() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let error = Error::from(source);
        assert_eq!(error.kind(), ErrorKind::Serialization);
        assert!(std::error::Error::source(&error).is_some());
    }
}
