use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur while setting up request sanitization.
///
/// Sanitizing a request never fails; these errors only surface while loading
/// configuration or assembling a [`RawRequest`](crate::web::RawRequest).
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation
    Config(ConfigError),
    /// A header name or value could not be represented in an HTTP header map
    InvalidHeader(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration error: {}", e),
            Error::InvalidHeader(name) => write!(f, "invalid header '{}'", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::InvalidHeader(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}
