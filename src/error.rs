use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid chunking configuration: {0}")]
    InvalidConfig(String),
    #[error("No chunks to select from")]
    EmptyInput,
    #[error("No document loaded. Upload and process a document first.")]
    NotLoaded,
    #[error("No usable text found")]
    NoUsableText,
    #[error("Answer service error: {0}")]
    AnswerService(String),
    #[error("{0}")]
    Internal(String),
}

impl serde::Serialize for AppError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<AppError> for String {
    fn from(e: AppError) -> String {
        e.to_string()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::AnswerService(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
