use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the Leonardo REST API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request (400): {body}")]
    InvalidRequest { body: String },

    #[error("Authentication error (401): {body}")]
    Authentication { body: String },

    #[error("Permission error (403): {body}")]
    Permission { body: String },

    #[error("Not found (404): {body}")]
    NotFound { body: String },

    #[error("Rate limit exceeded (429): {body}")]
    RateLimit { body: String },

    #[error("Provider error ({status}): {body}")]
    Server { status: StatusCode, body: String },

    /// Catch-all for unexpected status codes
    #[error("Unexpected status {status}: {body}")]
    Unexpected { status: StatusCode, body: String },
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();

        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest { body },
            StatusCode::UNAUTHORIZED => Self::Authentication { body },
            StatusCode::FORBIDDEN => Self::Permission { body },
            StatusCode::NOT_FOUND => Self::NotFound { body },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit { body },
            s if s.is_server_error() => Self::Server { status: s, body },
            s => Self::Unexpected { status: s, body },
        }
    }
}
