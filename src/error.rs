use thiserror::Error;

pub const NOT_FOUND_CODE: &str = "404";
pub const INTERNAL_CODE: &str = "500";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Unauthorized,
    BadRequest,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category:?}, {code}, {message}")]
pub struct ApiError {
    pub category: ErrorCategory,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(category: ErrorCategory, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::NotFound, NOT_FOUND_CODE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, INTERNAL_CODE, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == NOT_FOUND_CODE
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("action {0} not found")]
    ActionNotFound(String),
    #[error("invalid continuation token: {0}")]
    InvalidToken(String),
}

impl From<HostError> for ApiError {
    fn from(error: HostError) -> Self {
        match error {
            HostError::ActionNotFound(id) => ApiError::not_found(format!("action {id} not found")),
            HostError::InvalidToken(token) => ApiError::new(
                ErrorCategory::BadRequest,
                "400",
                format!("invalid continuation token: {token}"),
            ),
            other => ApiError::internal(other.to_string()),
        }
    }
}
