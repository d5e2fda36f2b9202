//! Application-wide error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::tutor::TutorError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("api error: {0}")]
    Api(#[from] ApiError),

    #[error("tutor error: {0}")]
    Tutor(#[from] TutorError),

    #[error("invalid input: {0}")]
    Input(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(e.to_string().contains("config error"));
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn auth_error_display() {
        let e = AppError::Auth("not logged in".into());
        assert!(e.to_string().contains("not logged in"));
    }

    #[test]
    fn input_error_display() {
        let e = AppError::Input("title is required".into());
        assert_eq!(e.to_string(), "invalid input: title is required");
    }

    #[test]
    fn api_error_converts() {
        let e: AppError = ApiError::Status { status: 401, message: "bad token".into() }.into();
        assert!(e.to_string().contains("api error"));
        assert!(e.to_string().contains("bad token"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: AppError = io_err.into();
        assert!(e.to_string().contains("io error"));
        // satisfies std::error::Error trait
        let _: &dyn Error = &e;
    }
}
