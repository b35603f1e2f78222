use crate::domain::validation::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<ErrorResponse>),
    #[error("no record found for {field} '{value}'")]
    NotFound { field: &'static str, value: String },
    #[error("{message}")]
    Conflict {
        field: &'static str,
        message: String,
    },
    #[error("Transient error: {0}")]
    Transient(Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServiceError {
    pub fn not_found(field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            field,
            value: value.into(),
        }
    }

    pub fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            message: message.into(),
        }
    }

    pub fn transient(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transient(err.into())
    }

    /// Field-level errors describing this failure, in reporting order.
    pub fn field_errors(&self) -> Vec<ErrorResponse> {
        match self {
            Self::Validation(errors) => errors.clone(),
            Self::NotFound { field, .. } | Self::Conflict { field, .. } => {
                vec![ErrorResponse::new(*field, self.to_string())]
            }
            Self::CsvError(_) | Self::IoError(_) => {
                vec![ErrorResponse::new("catalog", self.to_string())]
            }
            Self::Transient(_) => vec![ErrorResponse::new("server", "internal server error")],
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transient(Box::new(err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for ServiceError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Transient(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
