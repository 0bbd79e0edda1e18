//! JSON body extraction that keeps the response envelope.
//!
//! Axum's stock `Json` rejection answers with a plain-text 422, which
//! would leak past the `{"success": false, "error": msg}` contract for
//! payloads that fail deserialization (unknown enum values, wrong
//! types). This wrapper routes every body failure through [`ApiError`].

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::ApiError;

/// Drop-in replacement for `axum::Json` whose rejection is an
/// [`ApiError`], so parse failures keep the envelope and map to 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                // Well-formed JSON that does not fit the target type is a
                // caller validation problem, same as a failed field check.
                JsonRejection::JsonDataError(err) => ApiError::validation(
                    vec![json!({"error": err.body_text()})],
                    "request body failed validation",
                ),
                other => ApiError::bad_request(other.body_text()),
            })?;
        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Shelf {
        Fiction,
        Reference,
    }

    #[derive(Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        shelf: Shelf,
    }

    async fn accept(Json(_): Json<Payload>) -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new().route("/", post(accept))
    }

    async fn post_body(body: &'static str) -> axum::response::Response {
        app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_enum_value_gets_enveloped_400() {
        let response = post_body(r#"{"shelf": "cooking"}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn syntax_error_gets_enveloped_400() {
        let response = post_body("{not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let response = post_body(r#"{"shelf": "fiction"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
