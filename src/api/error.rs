use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use super::json::PrettyJson;
use crate::domain::DomainError;

const INVALID_REQUEST: &str = "The request is invalid.";

/// Validation messages keyed by the offending field, e.g. `book.title`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ModelState(BTreeMap<String, Vec<String>>);

impl ModelState {
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }
}

impl From<&garde::Report> for ModelState {
    fn from(report: &garde::Report) -> Self {
        let mut state = ModelState::default();
        for (path, error) in report.iter() {
            state.add(model_key(&path.to_string()), error.message());
        }
        state
    }
}

/// `publish_date` becomes `book.publishDate`, matching the JSON field names.
fn model_key(path: &str) -> String {
    let mut key = String::from("book");
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        key.push('.');
        let mut upper = false;
        for c in segment.chars() {
            if c == '_' {
                upper = true;
            } else if upper {
                key.extend(c.to_uppercase());
                upper = false;
            } else {
                key.push(c);
            }
        }
    }
    key
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("The request is invalid.")]
    Validation(ModelState),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found() -> Self {
        ApiError::NotFound("No book matches the request.".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(model_state) => json!({
                "message": INVALID_REQUEST,
                "modelState": model_state,
            }),
            ApiError::BadRequest(message) | ApiError::NotFound(message) => {
                json!({ "message": message })
            }
            ApiError::Internal(cause) => {
                tracing::error!("Request failed: {}", cause);
                json!({ "message": "An error has occurred." })
            }
        };
        (status, PrettyJson(body)).into_response()
    }
}

impl From<garde::Report> for ApiError {
    fn from(report: garde::Report) -> Self {
        ApiError::Validation(ModelState::from(&report))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let mut model_state = ModelState::default();
        model_state.add("book", rejection.body_text());
        ApiError::Validation(model_state)
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ApiError::not_found(),
            DomainError::Concurrency { .. } | DomainError::Database(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}
