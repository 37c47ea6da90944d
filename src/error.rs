use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("api error ({status})")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("session storage is unavailable")]
    Storage,
}

impl ApiError {
    pub fn status(status: u16, message: Option<String>) -> Self {
        Self::Status { status, message }
    }

    /// HTTP status carried by the error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
