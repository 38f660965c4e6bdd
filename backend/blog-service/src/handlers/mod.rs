/// HTTP handlers for blog-service
///
/// - Posts: CRUD with the author rule
/// - Groups: read-only
/// - Comments: nested under a post
/// - Follow: the caller's follow edges
/// - Health: liveness, readiness and summary
///
/// Every resource answers with and without a trailing slash.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod health;
pub mod posts;

use crate::error::AppError;
use actix_web::{web, Error};

/// Register the `/api/v1` resource routes and their extractor error handlers
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(
            web::resource(["/posts", "/posts/"])
                .route(web::get().to(posts::list_posts))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource(["/posts/{post_id}", "/posts/{post_id}/"])
                .route(web::get().to(posts::get_post))
                .route(web::put().to(posts::update_post))
                .route(web::patch().to(posts::patch_post))
                .route(web::delete().to(posts::delete_post)),
        )
        .service(
            web::resource(["/posts/{post_id}/comments", "/posts/{post_id}/comments/"])
                .route(web::get().to(comments::list_comments))
                .route(web::post().to(comments::create_comment)),
        )
        .service(
            web::resource([
                "/posts/{post_id}/comments/{comment_id}",
                "/posts/{post_id}/comments/{comment_id}/",
            ])
            .route(web::get().to(comments::get_comment))
            .route(web::put().to(comments::update_comment))
            .route(web::patch().to(comments::patch_comment))
            .route(web::delete().to(comments::delete_comment)),
        )
        .service(web::resource(["/groups", "/groups/"]).route(web::get().to(groups::list_groups)))
        .service(
            web::resource(["/groups/{group_id}", "/groups/{group_id}/"])
                .route(web::get().to(groups::get_group)),
        )
        .service(
            web::resource(["/follow", "/follow/"])
                .route(web::get().to(follows::list_follows))
                .route(web::post().to(follows::create_follow)),
        );
}

/// Health routes; registered ahead of the authenticated `/api/v1` scope
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/health", web::get().to(health::health_summary))
        .route("/api/v1/health/ready", web::get().to(health::readiness_summary))
        .route("/api/v1/health/live", web::get().to(health::liveness_check));
}

/// Malformed or non-JSON bodies become 400 responses with the usual error body
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::from(AppError::Validation(format!("Invalid request body: {}", err)))
    })
}

/// Non-numeric ids cannot match any object
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| Error::from(AppError::NotFound("Not found.".to_string())))
}
