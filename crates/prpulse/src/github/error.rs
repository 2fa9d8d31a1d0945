//! GitHub API error types.

use thiserror::Error;

use crate::platform::{PlatformError, short_error_message};

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GitHubError {
    /// Classify an octocrab error by HTTP status.
    pub(crate) fn from_request(err: octocrab::Error, route: &str) -> Self {
        match status_code(&err) {
            Some(401) => Self::AuthRequired,
            Some(404) => Self::NotFound(route.to_string()),
            Some(403 | 429) => Self::RateLimited(short_error_message(&err)),
            _ => Self::Api(err),
        }
    }
}

/// HTTP status of a failed GitHub response, if the error carries one.
fn status_code(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

impl From<GitHubError> for PlatformError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Api(octocrab::Error::Json { source, .. }) => {
                PlatformError::invalid_payload(source.to_string())
            }
            GitHubError::Api(e) => PlatformError::api(short_error_message(&e)),
            GitHubError::RateLimited(message) => PlatformError::RateLimited { message },
            GitHubError::AuthRequired => PlatformError::AuthRequired,
            GitHubError::NotFound(resource) => PlatformError::not_found(resource),
            GitHubError::Internal(message) => PlatformError::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_platform_not_found() {
        let err: PlatformError = GitHubError::NotFound("/repos/acme/gone".to_string()).into();
        assert!(matches!(err, PlatformError::NotFound { ref resource } if resource == "/repos/acme/gone"));
    }

    #[test]
    fn test_rate_limited_maps_to_platform_rate_limited() {
        let err: PlatformError = GitHubError::RateLimited("slow down".to_string()).into();
        assert!(matches!(err, PlatformError::RateLimited { ref message } if message == "slow down"));
    }

    #[test]
    fn test_auth_required_maps_through() {
        let err: PlatformError = GitHubError::AuthRequired.into();
        assert!(matches!(err, PlatformError::AuthRequired));
    }

    #[test]
    fn test_internal_message_kept() {
        let err: PlatformError = GitHubError::Internal("bad state".to_string()).into();
        assert!(err.to_string().contains("bad state"));
    }
}
