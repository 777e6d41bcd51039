use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `DashError` and maps other errors so they can be
/// converted to a `DashError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum DashError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    /// The requested option key is not among the recognized set.
    KeyNotFound(String),
    /// The requested plotting style is not registered.
    InvalidStyle(String),
    /// The requested render backend cannot be activated here.
    BackendUnavailable(String),
    DashError(String),
}

impl From<io::Error> for DashError {
    fn from(error: io::Error) -> Self {
        DashError::IoError(error)
    }
}

impl From<serde_json::Error> for DashError {
    fn from(error: serde_json::Error) -> Self {
        DashError::JsonError(error)
    }
}

impl From<String> for DashError {
    fn from(error: String) -> Self {
        DashError::DashError(error)
    }
}

impl From<&str> for DashError {
    fn from(error: &str) -> Self {
        DashError::DashError(error.to_string())
    }
}

impl std::error::Error for DashError {}

impl Display for DashError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DashError::IoError(error) => write!(f, "IO error: {error}"),
            DashError::JsonError(error) => write!(f, "JSON error: {error}"),
            DashError::KeyNotFound(msg)
            | DashError::InvalidStyle(msg)
            | DashError::BackendUnavailable(msg)
            | DashError::DashError(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_conversions() {
        let e: DashError = "something went wrong".into();
        assert!(matches!(e, DashError::DashError(_)));
        assert_eq!(e.to_string(), "something went wrong");
    }

    #[test]
    fn io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "missing");
        let e: DashError = io_error.into();
        assert!(matches!(e, DashError::IoError(_)));
    }
}
