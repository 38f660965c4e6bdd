/// OpenAPI documentation for the Yatube Blog Service
use crate::handlers;
use crate::models::{
    CommentRequest, CommentResponse, FollowRequest, FollowResponse, Group, PatchCommentRequest,
    PatchPostRequest, PostRequest, PostResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Yatube Blog Service API",
        version = "1.0.0",
        description = "Posts, groups, nested comments and author subscriptions. Reads are public; writes require a bearer token and are limited to the author of the object.",
        contact(
            name = "Yatube Team",
            email = "team@yatube.dev"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    paths(
        handlers::posts::list_posts,
        handlers::posts::get_post,
        handlers::posts::create_post,
        handlers::posts::update_post,
        handlers::posts::patch_post,
        handlers::posts::delete_post,
        handlers::groups::list_groups,
        handlers::groups::get_group,
        handlers::comments::list_comments,
        handlers::comments::get_comment,
        handlers::comments::create_comment,
        handlers::comments::update_comment,
        handlers::comments::patch_comment,
        handlers::comments::delete_comment,
        handlers::follows::list_follows,
        handlers::follows::create_follow,
        handlers::health::health_summary,
        handlers::health::readiness_summary,
        handlers::health::liveness_check,
    ),
    components(schemas(
        PostRequest,
        PatchPostRequest,
        PostResponse,
        Group,
        CommentRequest,
        PatchCommentRequest,
        CommentResponse,
        FollowRequest,
        FollowResponse,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "posts", description = "Post creation, retrieval, updates, and deletion"),
        (name = "groups", description = "Read-only community groups"),
        (name = "comments", description = "Comments nested under a post"),
        (name = "follow", description = "Subscriptions of the authenticated user"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 access token issued by `blog-service issue-token`"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_follow_route_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/follow"));
        assert!(doc.paths.paths.contains_key("/api/v1/posts/{post_id}/comments/{comment_id}"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn group_routes_reference_group_schema() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        let schema = &json["paths"]["/api/v1/groups/{group_id}"]["get"]["responses"]["200"]
            ["content"]["application/json"]["schema"]["$ref"];
        assert_eq!(schema, "#/components/schemas/Group");
        assert!(json["components"]["schemas"]["Group"].is_object());
    }
}
