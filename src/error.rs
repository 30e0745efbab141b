use thiserror::Error;

use crate::validation::FieldError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(FieldError),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("ORM error: {0}")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::Validation(err)
    }
}

impl AppError {
    pub fn integrity(message: impl Into<String>) -> Self {
        AppError::Integrity(message.into())
    }

    /// Name of the offending field, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::Validation(err) => Some(err.field),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
