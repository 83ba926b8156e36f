use thiserror::Error;

/// Failures surfaced by the gateway, the inference endpoint and the session.
///
/// The type is `Clone` so caches can keep the last failure around as visible
/// state while still handing a copy to whoever asked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Invalid response from server")]
    InvalidResponse,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Error::ServerError(status.as_u16());
        }
        if err.is_decode() {
            return Error::InvalidResponse;
        }
        Error::NetworkFailure(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(_: serde_json::Error) -> Self {
        Error::InvalidResponse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::ServerError(500).to_string(), "Server error: 500");
        assert_eq!(Error::InvalidResponse.to_string(), "Invalid response from server");
        assert_eq!(Error::NotAuthenticated.to_string(), "Not authenticated");
    }

    #[test]
    fn test_json_errors_are_invalid_responses() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert_eq!(Error::from(err), Error::InvalidResponse);
    }
}
