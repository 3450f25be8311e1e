use crate::analysis::{AnalysisResult, AnalyzeError};
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::sync::Arc;

const LOG_TARGET: &str = "server";

#[derive(Debug, Serialize)]
struct SuccessBody<'a> {
    success: bool,
    data: &'a AnalysisResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
}

/// Body of a successful `POST /api/analyze`.
#[derive(Debug)]
pub struct AnalyzeSuccess(pub Arc<AnalysisResult>);

impl IntoResponse for AnalyzeSuccess {
    fn into_response(self) -> Response {
        Json(SuccessBody {
            success: true,
            data: &self.0,
        })
        .into_response()
    }
}

/// Failure of an API call, rendered as `{ success: false, message }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    retry_after: Option<u64>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            retry_after: None,
        }
    }

    #[must_use]
    pub fn invalid_repo_url() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid GitHub URL")
    }

    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(error: AnalyzeError) -> Self {
        match error {
            AnalyzeError::InvalidRepoUrl(_) => Self::invalid_repo_url(),
            AnalyzeError::RateLimited { retry_after } => Self {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: error.to_string(),
                retry_after: Some(retry_after),
            },
            AnalyzeError::Upstream(_) => {
                log::error!(target: LOG_TARGET, "Analysis failed: {error}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
            retry_after: self.retry_after,
        };

        let mut response = (self.status, Json(body)).into_response();
        if let Some(seconds) = self.retry_after {
            let _ = response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}
