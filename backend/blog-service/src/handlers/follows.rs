/// Follow handlers - follow edges of the authenticated caller
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{FollowRequest, FollowResponse, FollowSearchParams};
use crate::repository::BlogRepository;
use crate::services::FollowService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// List the caller's follow edges, optionally filtered by `search`
#[utoipa::path(
    get,
    path = "/api/v1/follow",
    tag = "follow",
    params(("search" = Option<String>, Query, description = "Substring of the followed username")),
    responses(
        (status = 200, description = "Follow edges of the caller", body = [FollowResponse]),
        (status = 401, description = "Authentication required"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_follows(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    query: web::Query<FollowSearchParams>,
) -> Result<HttpResponse> {
    let service = FollowService::new(repo.get_ref().clone());
    let follows: Vec<FollowResponse> = service
        .list_follows(user.id, query.search.as_deref())
        .await?
        .into_iter()
        .map(FollowResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(follows))
}

/// Follow the user named in `following`
///
/// A body that is missing or does not carry a string `following` is treated
/// like an unknown target.
#[utoipa::path(
    post,
    path = "/api/v1/follow",
    tag = "follow",
    request_body = FollowRequest,
    responses(
        (status = 201, description = "Follow created", body = FollowResponse),
        (status = 400, description = "Invalid target, self follow or duplicate"),
        (status = 401, description = "Authentication required"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_follow(
    user: AuthenticatedUser,
    repo: web::Data<Arc<dyn BlogRepository>>,
    req: Option<web::Json<FollowRequest>>,
) -> Result<HttpResponse> {
    let following = req.as_ref().and_then(|body| body.following.as_deref());
    let service = FollowService::new(repo.get_ref().clone());
    let follow = service.follow(user.id, following).await?;

    Ok(HttpResponse::Created().json(FollowResponse::from(follow)))
}
