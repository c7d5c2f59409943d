use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::ProblemDetails;
use thiserror::Error;

use crate::domain::ValidationFailure;

pub const MALFORMED_BODY_TITLE: &str = "The request body could not be read.";
pub const PROBLEM_JSON_CONTENT_TYPE: &str = "application/problem+json";

/// ハンドラ層のエラー。いずれも Problem Details として返す
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(rejection) => rejection.status(),
        }
    }

    pub fn problem_details(&self) -> ProblemDetails {
        match self {
            ApiError::Validation(failure) => failure.to_problem_details(),
            ApiError::MalformedBody(rejection) => {
                let status = rejection.status();
                ProblemDetails::new(problem_type(status), MALFORMED_BODY_TITLE, status.as_u16())
                    .with_error("body", rejection.body_text())
            }
        }
    }
}

fn problem_type(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "https://tools.ietf.org/html/rfc7231#section-6.5.1",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "https://tools.ietf.org/html/rfc7231#section-6.5.13",
        StatusCode::UNPROCESSABLE_ENTITY => "https://tools.ietf.org/html/rfc4918#section-11.2",
        _ => "about:blank",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(PROBLEM_JSON_CONTENT_TYPE),
            )],
            Json(self.problem_details()),
        )
            .into_response()
    }
}
