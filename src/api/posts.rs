//! `/posts` handlers.

use http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::error::ApiError;
use crate::api::params;
use crate::pagination::{paginate, Page};
use crate::post::{Post, PostCreate, PostUpdate, PostView};
use crate::request::Request;
use crate::response::{Json, Response};
use crate::store::{PostStore, SharedStore};
use crate::validation::{validate_create, validate_update, ValidationError};

/// `{"post": ...}` envelope of `GET /posts/{post_id}`.
#[derive(Debug, Serialize)]
pub struct PostEnvelope {
    pub post: PostView,
}

/// Envelope of `GET /posts/{post_id}/detail`.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub data: PostView,
    pub include_content: bool,
}

fn store(req: &Request) -> Result<&PostStore, ApiError> {
    req.state::<SharedStore>()
        .map(|store| &**store)
        .ok_or(ApiError::MissingState("PostStore"))
}

// GET /
pub async fn home(_req: Request) -> Json<Value> {
    Json(json!({ "message": "Welcome to the Mini Blog!" }))
}

// GET /posts
pub async fn list_posts(req: Request) -> Result<Json<Page>, ApiError> {
    let query = params::page_query(&req)?;
    let page = paginate(&store(&req)?.list(), &query);
    Ok(Json(page))
}

// GET /posts/{post_id}
pub async fn get_post(req: Request) -> Result<Json<PostEnvelope>, ApiError> {
    let id = params::post_id(&req)?;
    let include_content = params::include_content(&req, true)?;
    let post = store(&req)?.get(id)?;
    Ok(Json(PostEnvelope { post: PostView::new(post, include_content) }))
}

// GET /posts/{post_id}/detail
pub async fn get_post_detail(req: Request) -> Result<Json<PostDetail>, ApiError> {
    let id = params::post_id(&req)?;
    let include_content = params::include_content(&req, false)?;
    let post = store(&req)?.get(id)?;
    Ok(Json(PostDetail { data: PostView::new(post, include_content), include_content }))
}

// POST /posts → 201 + location
pub async fn create_post(req: Request) -> Result<Response, ApiError> {
    let input: PostCreate = req.json().map_err(|e| ValidationError::body(&e))?;
    let input = validate_create(input)?;
    let post = store(&req)?.create(input);
    info!(post_id = post.id, title = %post.title, "post created");

    let body = serde_json::to_vec(&post)?;
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("location", &format!("/posts/{}", post.id))
        .json(body))
}

// PUT /posts/{post_id}
pub async fn update_post(req: Request) -> Result<Json<Post>, ApiError> {
    let id = params::post_id(&req)?;
    let input: PostUpdate = req.json().map_err(|e| ValidationError::body(&e))?;
    let input = validate_update(input)?;
    let post = store(&req)?.update(id, input)?;
    info!(post_id = id, "post updated");
    Ok(Json(post))
}

// DELETE /posts/{post_id} → 204
pub async fn delete_post(req: Request) -> Result<StatusCode, ApiError> {
    let id = params::post_id(&req)?;
    store(&req)?.delete(id)?;
    info!(post_id = id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}
