use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use trellis::prelude::*;

use crate::state::{AppState, NewPost, Post};

/// JSON resource over the in-memory post store. Writes need a token.
pub struct PostsController;

impl Controller for PostsController {
    fn declare(d: &mut Declarer<'_>) {
        d.resource("posts")
            .api_only()
            .resource_params([("posts", "post")])
            .resource_middleware(["store", "update", "destroy"], "auth");
    }
}

pub async fn index(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.list().await)
}

pub async fn store(State(state): State<AppState>, Json(input): Json<NewPost>) -> (StatusCode, Json<Post>) {
    let post = state.insert(input).await;
    tracing::info!(id = post.id, "post created");
    (StatusCode::CREATED, Json(post))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<Post>, StatusCode> {
    state.get(id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<NewPost>,
) -> Result<Json<Post>, StatusCode> {
    state.update(id, input).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<u64>) -> StatusCode {
    match state.remove(id).await {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}
