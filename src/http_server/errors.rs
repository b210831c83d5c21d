//! HTTP error responses.

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use super::views;
use crate::books::StoreError;

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Request body is not a complete form
    #[error("Invalid form: {0}")]
    Form(#[from] FormRejection),

    /// No book has this identifier
    #[error("No book with id {0}")]
    NotFound(String),

    /// Blocking store task panicked or was cancelled
    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Store(err) => match err {
                StoreError::InvalidIdentifier(_)
                | StoreError::TypeConversion(_)
                | StoreError::InvalidSearchPattern(_) => StatusCode::BAD_REQUEST,
                StoreError::UnknownPipeline(_) => StatusCode::NOT_FOUND,
                StoreError::Decode(_) | StoreError::Collection(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            WebError::Form(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        match self {
            WebError::Store(StoreError::UnknownPipeline(err)) => {
                (status, Json(json!({ "error": err.to_string() }))).into_response()
            }
            other => (status, Html(views::error_page(status, &other.to_string()))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::{BookForm, UnknownPipeline};
    use crate::document::ObjectId;

    #[test]
    fn test_status_mapping() {
        let invalid_id = StoreError::from("zz".parse::<ObjectId>().unwrap_err());
        assert_eq!(WebError::from(invalid_id).status(), StatusCode::BAD_REQUEST);

        let conversion = StoreError::from(BookForm::new("T", "A", "x", "1").parse().unwrap_err());
        assert_eq!(WebError::from(conversion).status(), StatusCode::BAD_REQUEST);

        let pipeline = StoreError::from(UnknownPipeline {
            name: "median".to_string(),
        });
        assert_eq!(WebError::from(pipeline).status(), StatusCode::NOT_FOUND);

        assert_eq!(
            WebError::NotFound("abc".to_string()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_response_carries_status() {
        let response = WebError::NotFound("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
