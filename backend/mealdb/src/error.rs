use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Provider answered {0}")]
    Status(StatusCode),

    #[error("Malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for QueryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            QueryError::Timeout
        } else {
            QueryError::Request(error)
        }
    }
}
