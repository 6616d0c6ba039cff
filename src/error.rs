//! Error types for passctl

use thiserror::Error;

/// Result type alias for passctl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Authentication failures handled by redirecting to login.
///
/// Both variants are raised only after the login redirect has fired.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No valid access token. Run `passctl signin` to log in.")]
    UndecodableToken,

    #[error("Failed to refresh access token. Run `passctl signin` to log in again.")]
    CannotRefresh,
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Status {
        status_code: u16,
        content: serde_json::Value,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ApiError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        ApiError::InvalidHeader(err.to_string())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Secure token store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token store I/O error: {0}")]
    Io(String),

    #[error("Corrupted token store: {0}")]
    Corrupted(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StoreError::Corrupted(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_point_to_signin() {
        assert!(AuthError::UndecodableToken.to_string().contains("passctl signin"));
        assert!(AuthError::CannotRefresh.to_string().contains("passctl signin"));
    }

    #[test]
    fn test_api_status_error_displays_message() {
        let err = ApiError::Status {
            status_code: 400,
            content: serde_json::json!({"code": "INVALID"}),
            message: "Request to https://x/native/v1/me failed, code: 400".to_string(),
        };
        assert!(err.to_string().contains("code: 400"));
    }

    #[test]
    fn test_api_error_network() {
        let err = ApiError::Network("Connection refused".to_string());
        assert!(err.to_string().contains("Connection refused"));
    }

    #[test]
    fn test_config_error_parse() {
        let err = ConfigError::ParseError("unexpected key".to_string());
        assert!(err.to_string().contains("unexpected key"));
    }

    #[test]
    fn test_error_from_auth_error() {
        let err: Error = AuthError::CannotRefresh.into();

        match err {
            Error::Auth(AuthError::CannotRefresh) => (),
            _ => panic!("Expected Error::Auth(AuthError::CannotRefresh)"),
        }
    }

    #[test]
    fn test_store_error_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: [yaml: content")
            .unwrap_err();
        let store_err: StoreError = yaml_err.into();

        match store_err {
            StoreError::Corrupted(_) => (),
            _ => panic!("Expected StoreError::Corrupted"),
        }
    }
}
