use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use deepread_core::Error;
use deepread_providers::ProviderError;

/// Error body returned by every route: `{ "error": "<message>" }`.
#[derive(Debug)]
pub enum ApiError {
    Core(Error),
    Provider(ProviderError),
    /// The request body was not JSON of the expected shape.
    Body(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Core(err)
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(Error::Validation(_)) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Core(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Core(Error::InvalidConfig(_) | Error::Operation(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Provider(ProviderError::MissingApiKey(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Provider(ProviderError::Unsupported { .. }) => StatusCode::NOT_IMPLEMENTED,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Core(err) => err.to_string(),
            Self::Provider(err) => err.to_string(),
            Self::Body(text) => text.clone(),
        };
        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// `Json` extractor whose rejections use the `{ error }` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
