use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use ripple_core::ServiceError;

use crate::AppState;
use crate::error::ApiError;

/// The authenticated principal, injected by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

/// Extract and validate the bearer token, then attach the subject
/// username to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError(ServiceError::TokenInvalid).into_response())?;

    let username = state
        .tokens
        .validate(token)
        .map_err(|e| ApiError(e).into_response())?;

    req.extensions_mut().insert(AuthUser(username));
    Ok(next.run(req).await)
}
