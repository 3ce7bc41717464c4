//! Provider error types.

use std::fmt;
use std::time::Duration;

use crate::domain::TransportMode;

/// Errors from an external collaborator (routing, stop lookup, weather, traffic).
#[derive(Debug)]
pub enum ProviderError {
    /// HTTP request failed (network error, connection reset, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code or error payload
    ApiError { status: u16, message: String },

    /// The call did not complete within the allotted time
    Timeout(Duration),

    /// No path exists for this mode between the requested points
    RouteUnavailable { mode: TransportMode, reason: String },

    /// Feature not configured or not available
    NotConfigured(String),
}

impl ProviderError {
    /// Shorthand for a `RouteUnavailable` error.
    pub fn unavailable(mode: TransportMode, reason: impl Into<String>) -> Self {
        ProviderError::RouteUnavailable {
            mode,
            reason: reason.into(),
        }
    }

    /// Returns true if the provider reported that no path exists.
    pub fn is_route_unavailable(&self) -> bool {
        matches!(self, ProviderError::RouteUnavailable { .. })
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(e) => write!(f, "HTTP error: {e}"),
            ProviderError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            ProviderError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            ProviderError::Timeout(after) => {
                write!(f, "provider call timed out after {}s", after.as_secs_f64())
            }
            ProviderError::RouteUnavailable { mode, reason } => {
                write!(f, "no {mode} route: {reason}")
            }
            ProviderError::NotConfigured(msg) => write!(f, "not configured: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProviderError::ApiError {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = ProviderError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("<html>"));

        let err = ProviderError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "provider call timed out after 10s");

        let err = ProviderError::unavailable(TransportMode::Subway, "no rail profile");
        assert_eq!(err.to_string(), "no subway route: no rail profile");
    }

    #[test]
    fn route_unavailable_is_distinguished() {
        assert!(ProviderError::unavailable(TransportMode::Bus, "x").is_route_unavailable());
        assert!(!ProviderError::Timeout(Duration::from_secs(1)).is_route_unavailable());
    }
}
