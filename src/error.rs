use crate::endpoints::REFRESH_TOKEN_PATH;
use crate::response::ApiResponse;
use thiserror::Error;

/// Main error type for back-office API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error returned by an API endpoint
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        response: ApiResponse,
    },

    /// Non-JSON error body from the backend or a proxy in front of it
    #[error("HTTP error {status}: {body}")]
    Http {
        status: u16,
        body: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The refresh credential itself was rejected; the local session has been
    /// wiped and the user must sign in again
    #[error("session terminated, sign in required")]
    SessionTerminated,

    /// Request building error
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error, including request timeouts
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl ApiError {
    /// Create an API error from a decoded error response
    pub fn from_response(response: ApiResponse) -> Self {
        let message = response
            .message()
            .unwrap_or("unknown error")
            .to_string();

        ApiError::Api {
            status: response.status,
            message,
            response,
        }
    }

    /// The backend's message string, when this is a decoded API error
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { response, .. } => response.message(),
            _ => None,
        }
    }

    /// Whether the request failed by exceeding the configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Reqwest(e) if e.is_timeout())
    }

    /// The HTTP status code, when one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for back-office API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// `jwt expired` appears in both signature groups; which endpoint failed
/// decides whether it is terminal.
pub const MSG_JWT_EXPIRED: &str = "jwt expired";
pub const MSG_REFRESH_UNAVAILABLE: &str = "Refresh token unavailable";
pub const MSG_REFRESH_MALFORMED: &str = "Refresh token must be conditioned";
pub const MSG_SESSION_UNAVAILABLE: &str = "Session unavailable";
pub const MSG_BEARER_MALFORMED: &str = "Bearer token must be conditioned";

/// Messages that terminate the session when the refresh endpoint itself fails
const REFRESH_TERMINAL_MESSAGES: [&str; 3] = [
    MSG_JWT_EXPIRED,
    MSG_REFRESH_UNAVAILABLE,
    MSG_REFRESH_MALFORMED,
];

/// Messages that trigger a refresh-and-retry on any other endpoint
const SESSION_RECOVERABLE_MESSAGES: [&str; 3] = [
    MSG_JWT_EXPIRED,
    MSG_SESSION_UNAVAILABLE,
    MSG_BEARER_MALFORMED,
];

/// What to do with a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Wipe the session, navigate home, reject without retry
    Terminal,
    /// Refresh the session and re-issue the request once
    Refresh,
    /// Return the error to the caller unchanged
    Propagate,
}

/// Classify a failed request.
///
/// The backend has no structured error codes; classification keys on the
/// message string and on whether the failing path is the refresh endpoint,
/// which is what disambiguates the shared `jwt expired` message. A request
/// that already consumed its retry never refreshes again.
pub fn classify(path: &str, error: &ApiError, retried: bool) -> Outcome {
    let Some(message) = error.api_message() else {
        return Outcome::Propagate;
    };

    if path.contains(REFRESH_TOKEN_PATH) {
        if REFRESH_TERMINAL_MESSAGES.contains(&message) {
            return Outcome::Terminal;
        }
        return Outcome::Propagate;
    }

    if SESSION_RECOVERABLE_MESSAGES.contains(&message) && !retried {
        return Outcome::Refresh;
    }

    Outcome::Propagate
}
