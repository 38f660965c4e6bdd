/// Group handlers - read-only group endpoints
use crate::error::Result;
use crate::repository::BlogRepository;
use crate::services::GroupService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/groups",
    tag = "groups",
    responses((status = 200, description = "All groups ordered by id", body = [Group]))
)]
pub async fn list_groups(repo: web::Data<Arc<dyn BlogRepository>>) -> Result<HttpResponse> {
    let groups = GroupService::new(repo.get_ref().clone()).list_groups().await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{group_id}",
    tag = "groups",
    params(("group_id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group found", body = Group),
        (status = 404, description = "Group not found"),
    )
)]
pub async fn get_group(
    repo: web::Data<Arc<dyn BlogRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let group = GroupService::new(repo.get_ref().clone())
        .get_group(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(group))
}
