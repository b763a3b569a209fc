use axum::extract::{Query, State};
use axum::{Extension, Json};

use ripple_types::api::{Envelope, JoinRequest, JoinResponse, LoginRequest, LoginResponse};
use ripple_types::models::{Alarm, Page};

use crate::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::AuthUser;
use crate::posts::PageQuery;

pub async fn join(
    State(state): State<AppState>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<Envelope<JoinResponse>>, ApiError> {
    let user = blocking(move || {
        state
            .users
            .join(&req.username, &req.password, &req.email, &req.nickname)
    })
    .await?;

    Ok(Json(Envelope::ok(JoinResponse {
        id: user.id,
        username: user.username,
        role: user.role,
    })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let token = blocking(move || state.users.login(&req.username, &req.password)).await?;
    Ok(Json(Envelope::ok(LoginResponse { token })))
}

pub async fn alarm(
    State(state): State<AppState>,
    Extension(AuthUser(username)): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Envelope<Page<Alarm>>>, ApiError> {
    let page = blocking(move || state.users.alarms(&username, query.into_request())).await?;
    Ok(Json(Envelope::ok(page)))
}
