//! Owner-scoped blog post handlers.
//!
//! The owner always comes from the bearer token. Ids belonging to someone
//! else answer 404, same as ids that never existed.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use sparkblog_core::domain::{Post, PostInput};
use sparkblog_shared::ApiResponse;
use sparkblog_shared::dto::{PostRequest, PostResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        user_id: post.owner_id,
        title: post.title,
        content: post.content,
        topic: post.topic,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn to_input(req: PostRequest) -> AppResult<PostInput> {
    let input = PostInput::new(req.title, req.content, req.topic.as_deref().unwrap_or(""));
    input.validate()?;
    Ok(input)
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.find_by_owner(identity.user_id).await?;
    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let input = to_input(body.into_inner())?;
    let post = state.posts.insert(identity.user_id, input).await?;
    tracing::info!(post_id = %post.id, owner_id = %identity.user_id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(to_response(post))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let input = to_input(body.into_inner())?;
    let post = state.posts.update(identity.user_id, id, input).await?;
    tracing::info!(post_id = %id, owner_id = %identity.user_id, "Post updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(post))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(identity.user_id, id).await?;
    tracing::info!(post_id = %id, owner_id = %identity.user_id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Blog post deleted")))
}
