//! Response builders for the HTTP handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::core::models::ErrorBody;
use crate::errors::DigestError;

/// JSON error body `{"detail": ...}` with the given status.
#[must_use]
pub fn err_response(status: StatusCode, detail: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for DigestError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        err_response(StatusCode::INTERNAL_SERVER_ERROR, &format!("Error: {self}"))
    }
}

/// `Json` extractor whose rejections use the `{"detail": ...}` error body.
///
/// The rejection status (400, 415 or 422) is kept as axum reports it.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                warn!(status = %rejection.status(), "Rejected request body");
                Err(err_response(rejection.status(), &rejection.body_text()))
            }
        }
    }
}
