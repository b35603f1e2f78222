use crate::domain::validation::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Uniform response body for every endpoint.
///
/// Clients discriminate on the presence of `data` versus `errors`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ResponseEnvelope<T> {
    Success {
        status_code: u16,
        status_text: String,
        data: T,
        correlation_id: String,
    },
    Failure {
        status_code: u16,
        status_text: String,
        errors: Vec<ErrorResponse>,
        error_count: usize,
        correlation_id: String,
    },
}

impl<T> ResponseEnvelope<T> {
    pub fn success(status: StatusCode, data: T, correlation_id: impl Into<String>) -> Self {
        Self::Success {
            status_code: status.as_u16(),
            status_text: status.to_string(),
            data,
            correlation_id: correlation_id.into(),
        }
    }

    pub fn failure(
        status: StatusCode,
        errors: Vec<ErrorResponse>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self::Failure {
            status_code: status.as_u16(),
            status_text: status.to_string(),
            error_count: errors.len(),
            errors,
            correlation_id: correlation_id.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::Success { status_code, .. } | Self::Failure { status_code, .. } => *status_code,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::Success { correlation_id, .. } | Self::Failure { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl<T: Serialize> IntoResponse for ResponseEnvelope<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
