use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use ripple_core::ServiceError;
use ripple_types::api::Envelope;

/// Wrapper giving `ServiceError` a transport mapping without leaking
/// HTTP concerns into the service layer.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::UserNotFound(_) | ServiceError::PostNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidCredential
            | ServiceError::TokenInvalid
            | ServiceError::TokenExpired => StatusCode::UNAUTHORIZED,
            ServiceError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            ServiceError::DuplicateUser(_) | ServiceError::AlreadyLiked { .. } => {
                StatusCode::CONFLICT
            }
            ServiceError::Config(_) | ServiceError::Storage(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.0);
        }

        let body = Envelope::<()>::error(self.0.code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

/// Run a synchronous service call off the async runtime. Storage and
/// password hashing both block.
pub async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError(ServiceError::Internal("background task failed".into()))
        })?
        .map_err(ApiError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(err: ServiceError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn each_kind_maps_to_its_status() {
        assert_eq!(status_of(ServiceError::UserNotFound("a".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ServiceError::PostNotFound(Uuid::new_v4())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ServiceError::InvalidCredential), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ServiceError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ServiceError::PermissionDenied {
                username: "b".into(),
                post_id: Uuid::new_v4(),
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_of(ServiceError::DuplicateUser("a".into())), StatusCode::CONFLICT);
        assert_eq!(
            status_of(ServiceError::AlreadyLiked {
                username: "a".into(),
                post_id: Uuid::new_v4(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(ServiceError::Config("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
