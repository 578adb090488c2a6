//! Error types and handling for the EstateAI query pipeline

use thiserror::Error;

/// Main error type for the EstateAI library.
///
/// Nothing here is fatal to the process: every variant is scoped to a single
/// query resolution. Extraction and geocoding failures are terminal for the
/// current query and surface as client-facing "not found" envelopes; upstream
/// failures on place-search and open-data calls degrade to empty result lists
/// at the router.
#[derive(Error, Debug)]
pub enum EstateAiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// No address found in the query after the full fallback chain
    #[error("Address extraction failed: {message}")]
    Extraction { message: String },

    /// The geocoding collaborator returned no match for an address
    #[error("Geocoding failed: {message}")]
    Geocoding { message: String },

    /// Network failure or 5xx from an external collaborator
    #[error("Upstream service unavailable: {message}")]
    Upstream { message: String },

    /// Malformed payload from an external collaborator
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl EstateAiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new extraction error
    pub fn extraction<S: Into<String>>(message: S) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    /// Create a new geocoding error
    pub fn geocoding<S: Into<String>>(message: S) -> Self {
        Self::Geocoding {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            EstateAiError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            EstateAiError::Extraction { .. } => {
                "No address could be found in the query.".to_string()
            }
            EstateAiError::Geocoding { .. } => {
                "The address could not be resolved to a location.".to_string()
            }
            EstateAiError::Upstream { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            EstateAiError::Parse { message } => {
                format!("Unexpected response from an external service: {message}")
            }
            EstateAiError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = EstateAiError::config("missing API key");
        assert!(matches!(config_err, EstateAiError::Config { .. }));

        let extraction_err = EstateAiError::extraction("empty completion");
        assert!(matches!(extraction_err, EstateAiError::Extraction { .. }));

        let upstream_err = EstateAiError::upstream("connection refused");
        assert!(matches!(upstream_err, EstateAiError::Upstream { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = EstateAiError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let upstream_err = EstateAiError::upstream("test");
        assert!(upstream_err.user_message().contains("Unable to connect"));

        let geocoding_err = EstateAiError::geocoding("nothing matched");
        assert!(geocoding_err.user_message().contains("could not be resolved"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let estate_err: EstateAiError = io_err.into();
        assert!(matches!(estate_err, EstateAiError::Io { .. }));
    }
}
