//! Response builders used by handlers.
//!
//! # Design Decisions
//! - Handlers choose the status; helpers only shape the body
//! - JSON bodies carry `application/json`, text bodies `text/plain`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Plain-text body with an explicit status.
pub fn text(status: StatusCode, body: impl Into<String>) -> Response {
    (status, body.into()).into_response()
}

/// JSON body with an explicit status.
pub fn json<T: Serialize>(status: StatusCode, value: T) -> Response {
    (status, Json(value)).into_response()
}

/// Empty body.
pub fn empty(status: StatusCode) -> Response {
    status.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_json_content_type() {
        let response = json(StatusCode::CREATED, serde_json::json!({"ok": true}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_text_and_empty() {
        let response = text(StatusCode::CONFLICT, "taken");
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));

        assert_eq!(empty(StatusCode::NO_CONTENT).status(), StatusCode::NO_CONTENT);
    }
}
