use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Question generation failed: {0}")]
    GenerationFailure(String),

    #[error("Index {index} is out of range for {len} questions")]
    OutOfRange { index: usize, len: usize },

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::GenerationFailure(_) => "GENERATION_FAILURE",
            AppError::OutOfRange { .. } => "OUT_OF_RANGE",
            AppError::StorageError(_) => "STORAGE_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::GenerationFailure(format!("AI request failed: {}", err))
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StorageError(format!("JSON serialization error: {}", err))
    }
}
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
