use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use uuid::Uuid;

use ripple_types::api::{CommentRequest, Envelope, LikeCountResponse};
use ripple_types::models::{Comment, Page};

use crate::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::AuthUser;
use crate::posts::PageQuery;

pub async fn like(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(AuthUser(username)): Extension<AuthUser>,
) -> Result<Json<Envelope<()>>, ApiError> {
    blocking(move || state.engagement.like(post_id, &username)).await?;
    Ok(Json(Envelope::empty()))
}

pub async fn like_count(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Envelope<LikeCountResponse>>, ApiError> {
    let count = blocking(move || state.engagement.like_count(post_id)).await?;
    Ok(Json(Envelope::ok(LikeCountResponse { count })))
}

pub async fn comment(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(AuthUser(username)): Extension<AuthUser>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<Envelope<()>>, ApiError> {
    blocking(move || state.engagement.comment(post_id, &username, &req.comment)).await?;
    Ok(Json(Envelope::empty()))
}

pub async fn comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Envelope<Page<Comment>>>, ApiError> {
    let page = blocking(move || state.engagement.comments(post_id, query.into_request())).await?;
    Ok(Json(Envelope::ok(page)))
}
