//! Error types for the task board.
//!
//! Each variant maps onto the HTTP status the API answers with:
//! - 400: malformed payloads and unknown enum values
//! - 404: unknown task ids and routes
//! - 500: file I/O failures

use thiserror::Error;
use tiny_http::StatusCode;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Task {0} not found")]
    TaskNotFound(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidTask(_) | Error::InvalidCategory(_) | Error::Json(_) => StatusCode(400),
            Error::TaskNotFound(_) | Error::NotFound(_) => StatusCode(404),
            Error::Io(_) => StatusCode(500),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(Error::TaskNotFound("x".into()).status_code(), StatusCode(404));
        assert_eq!(Error::InvalidTask("empty title".into()).status_code(), StatusCode(400));
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(Error::from(io).status_code(), StatusCode(500));
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = Error::TaskNotFound("nest-integration".into());
        assert_eq!(err.to_string(), "Task nest-integration not found");
    }
}
