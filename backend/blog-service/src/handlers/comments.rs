/// Comment handlers - comments nested under `/posts/{post_id}/comments`
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{CommentRequest, CommentResponse, PatchCommentRequest};
use crate::repository::BlogRepository;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// List comments of a post, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments",
    tag = "comments",
    params(("post_id" = i64, Path, description = "Parent post id")),
    responses(
        (status = 200, description = "Comments of the post", body = [CommentResponse]),
        (status = 404, description = "Post not found"),
    )
)]
pub async fn list_comments(
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let service = CommentService::new(repo.get_ref().clone());
    let comments: Vec<CommentResponse> = service
        .get_post_comments(path.into_inner())
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("comment_id" = i64, Path, description = "Comment id"),
    ),
    responses(
        (status = 200, description = "Comment found", body = CommentResponse),
        (status = 404, description = "Post or comment not found"),
    )
)]
pub async fn get_comment(
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let service = CommentService::new(repo.get_ref().clone());
    let comment = service.get_comment(post_id, comment_id).await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/comments",
    tag = "comments",
    params(("post_id" = i64, Path, description = "Parent post id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Post not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<i64>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let service = CommentService::new(repo.get_ref().clone());
    let comment = service
        .create_comment(path.into_inner(), user.id, req.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{post_id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("comment_id" = i64, Path, description = "Comment id"),
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Post or comment not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_comment(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<(i64, i64)>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let service = CommentService::new(repo.get_ref().clone());
    let comment = service
        .update_comment(post_id, comment_id, user.id, req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/posts/{post_id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("comment_id" = i64, Path, description = "Comment id"),
    ),
    request_body = PatchCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Post or comment not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn patch_comment(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<(i64, i64)>,
    req: web::Json<PatchCommentRequest>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let service = CommentService::new(repo.get_ref().clone());
    let comment = service
        .patch_comment(post_id, comment_id, user.id, req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("comment_id" = i64, Path, description = "Comment id"),
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Post or comment not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let service = CommentService::new(repo.get_ref().clone());
    service.delete_comment(post_id, comment_id, user.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
