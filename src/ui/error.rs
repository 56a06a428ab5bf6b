//! UI server error types.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::core_state::CoreError;

/// Handler-level failures. Domain failures never end up here: they are
/// rendered as panels inside the page.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        match &self {
            UiError::Internal(detail) => {
                tracing::error!(detail, "UI internal error");
            }
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Html(INTERNAL_ERROR_PAGE)).into_response()
    }
}

impl From<CoreError> for UiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => UiError::Internal("lock poisoned".into()),
        }
    }
}

const INTERNAL_ERROR_PAGE: &str = r#"<!DOCTYPE html><html lang="en"><body><p role="alert">An internal error occurred</p><p><a href="/">Back</a></p></body></html>"#;

/// Failures starting the UI server.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("Failed to bind UI server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to get server address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_lock_error_maps_to_internal() {
        let err: UiError = CoreError::LockPoisoned.into();
        assert!(matches!(err, UiError::Internal(_)));
    }

    #[test]
    fn internal_error_is_500_without_detail() {
        let response = UiError::Internal("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bind_error_names_address() {
        let err = ServeError::Bind {
            addr: "127.0.0.1:3000".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(err.to_string().contains("127.0.0.1:3000"));
    }
}
