//! HTTP adapter: routes, auth middleware, and the error-to-status
//! mapping. All domain decisions are delegated to ripple-core.

pub mod engagement;
pub mod error;
pub mod middleware;
pub mod posts;
pub mod users;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Router, middleware::from_fn_with_state};

use ripple_core::engagement::EngagementService;
use ripple_core::posts::PostService;
use ripple_core::token::TokenConfig;
use ripple_core::users::UserService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub users: UserService,
    pub posts: PostService,
    pub engagement: EngagementService,
    pub tokens: TokenConfig,
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/v1/users/join", post(users::join))
        .route("/api/v1/users/login", post(users::login));

    let protected = Router::new()
        .route("/api/v1/users/alarm", get(users::alarm))
        .route("/api/v1/posts", post(posts::create).get(posts::list))
        .route("/api/v1/posts/my", get(posts::my))
        .route("/api/v1/posts/{post_id}", put(posts::modify).delete(posts::remove))
        .route(
            "/api/v1/posts/{post_id}/likes",
            post(engagement::like).get(engagement::like_count),
        )
        .route(
            "/api/v1/posts/{post_id}/comments",
            post(engagement::comment).get(engagement::comments),
        )
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    public.merge(protected).with_state(state)
}
