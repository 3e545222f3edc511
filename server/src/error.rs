use serde::Serialize;
use thiserror::Error;
use warp::http::StatusCode;

pub const FETCH_FAILED: &str = "Failed to fetch fire data";

/// Every way a fire feed request can fail.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{0}")]
    MissingParameter(String),
    #[error("{0}")]
    InvalidParameter(String),
    #[error("NASA FIRMS API error: {0}")]
    Upstream(String),
    #[error("{0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Unknown(err.to_string())
    }
}

impl From<csv::Error> for FeedError {
    fn from(err: csv::Error) -> Self {
        FeedError::Unknown(format!("CSV parse error: {}", err))
    }
}

impl FeedError {
    pub fn status(&self) -> StatusCode {
        match self {
            FeedError::MissingParameter(_) | FeedError::InvalidParameter(_) => {
                StatusCode::BAD_REQUEST
            }
            FeedError::Upstream(_) | FeedError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent back to the caller.
    pub fn body(&self) -> ErrorBody {
        match self {
            FeedError::MissingParameter(msg) | FeedError::InvalidParameter(msg) => ErrorBody {
                error: msg.clone(),
                details: None,
            },
            FeedError::Upstream(_) | FeedError::Unknown(_) => ErrorBody {
                error: FETCH_FAILED.to_string(),
                details: Some(self.to_string()),
            },
        }
    }
}

impl warp::reject::Reject for FeedError {}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
