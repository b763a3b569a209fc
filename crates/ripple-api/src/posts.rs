use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use ripple_types::api::{Envelope, PostCreateRequest, PostModifyRequest};
use ripple_types::models::{Page, PageRequest, Post};

use crate::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    20
}

impl PageQuery {
    pub fn into_request(self) -> PageRequest {
        PageRequest::new(self.page, self.size.min(100))
    }
}

pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(username)): Extension<AuthUser>,
    Json(req): Json<PostCreateRequest>,
) -> Result<Json<Envelope<()>>, ApiError> {
    blocking(move || state.posts.create(&req.title, &req.body, &username)).await?;
    Ok(Json(Envelope::empty()))
}

pub async fn modify(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(AuthUser(username)): Extension<AuthUser>,
    Json(req): Json<PostModifyRequest>,
) -> Result<Json<Envelope<Post>>, ApiError> {
    let post =
        blocking(move || state.posts.modify(&req.title, &req.body, &username, post_id)).await?;
    Ok(Json(Envelope::ok(post)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(AuthUser(username)): Extension<AuthUser>,
) -> Result<Json<Envelope<()>>, ApiError> {
    blocking(move || state.posts.delete(&username, post_id)).await?;
    Ok(Json(Envelope::empty()))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Envelope<Page<Post>>>, ApiError> {
    let page = blocking(move || state.posts.list(query.into_request())).await?;
    Ok(Json(Envelope::ok(page)))
}

pub async fn my(
    State(state): State<AppState>,
    Extension(AuthUser(username)): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Envelope<Page<Post>>>, ApiError> {
    let page = blocking(move || state.posts.list_by_owner(&username, query.into_request())).await?;
    Ok(Json(Envelope::ok(page)))
}
