// Error types for the dashboard data layer.
// Classifies GitHub API failures by status so callers can branch without parsing messages.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("{message}")]
    NotFound {
        message: String,
        documentation_url: Option<String>,
    },

    #[error("{message}")]
    RateLimitedOrForbidden {
        message: String,
        documentation_url: Option<String>,
        reset_at: Option<DateTime<Utc>>,
    },

    #[error("HTTP {status}: {message}")]
    RequestFailed {
        status: u16,
        message: String,
        documentation_url: Option<String>,
    },

    #[error("{message}")]
    InvalidInput { message: String },

    #[error("GitHub API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse error classification exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    RateLimitedOrForbidden,
    RequestFailed,
    InvalidInput,
}

impl DashError {
    /// Remote (or synthetic, for invalid input) HTTP status code, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DashError::NotFound { .. } => Some(404),
            DashError::RateLimitedOrForbidden { .. } => Some(403),
            DashError::RequestFailed { status, .. } => Some(*status),
            DashError::InvalidInput { .. } => Some(400),
            DashError::Http(e) => e.status().map(|s| s.as_u16()),
            DashError::Json(_) | DashError::Io(_) | DashError::Other(_) => None,
        }
    }

    pub fn documentation_url(&self) -> Option<&str> {
        match self {
            DashError::NotFound {
                documentation_url, ..
            }
            | DashError::RateLimitedOrForbidden {
                documentation_url, ..
            }
            | DashError::RequestFailed {
                documentation_url, ..
            } => documentation_url.as_deref(),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DashError::NotFound { .. } => ErrorKind::NotFound,
            DashError::RateLimitedOrForbidden { .. } => ErrorKind::RateLimitedOrForbidden,
            DashError::InvalidInput { .. } => ErrorKind::InvalidInput,
            _ => ErrorKind::RequestFailed,
        }
    }

    /// 404 and 403 are definitive answers from GitHub; everything else may be transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.status(), Some(404) | Some(403))
    }

    /// Text shown in place of the affected panel.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "Organization not found.",
            ErrorKind::RateLimitedOrForbidden => {
                "GitHub API rate limit exceeded or access forbidden. Please wait a bit and try again."
            }
            ErrorKind::InvalidInput => "Enter a GitHub organization handle.",
            ErrorKind::RequestFailed => {
                "Something went wrong while fetching data from GitHub. Please try again."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
