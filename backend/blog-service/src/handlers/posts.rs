/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{PatchPostRequest, PostRequest, PostResponse};
use crate::repository::BlogRepository;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// List all posts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    responses(
        (status = 200, description = "All posts", body = [PostResponse]),
    )
)]
pub async fn list_posts(repo: web::Data<Arc<dyn BlogRepository>>) -> Result<HttpResponse> {
    let service = PostService::new(repo.get_ref().clone());
    let posts: Vec<PostResponse> = service
        .list_posts()
        .await?
        .into_iter()
        .map(PostResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post by ID
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found"),
    )
)]
pub async fn get_post(
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.get_ref().clone());
    let post = service.get_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Create a new post authored by the caller
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Authentication required"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.get_ref().clone());
    let post = service.create_post(user.id, req.into_inner()).await?;

    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Replace a post
#[utoipa::path(
    put,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = i64, Path, description = "Post id")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Post not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<i64>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.get_ref().clone());
    let post = service
        .update_post(user.id, path.into_inner(), req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Partially update a post
#[utoipa::path(
    patch,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = i64, Path, description = "Post id")),
    request_body = PatchPostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Post not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn patch_post(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<i64>,
    req: web::Json<PatchPostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.get_ref().clone());
    let post = service
        .patch_post(user.id, path.into_inner(), req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Delete a post and its comments
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = i64, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Post not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let service = PostService::new(repo.get_ref().clone());
    service.delete_post(user.id, path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
