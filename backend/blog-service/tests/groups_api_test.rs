mod common;

use actix_web::{http::StatusCode, test};
use common::TestContext;
use serde_json::{json, Value};

#[actix_web::test]
async fn groups_are_readable_by_anyone() {
    let ctx = TestContext::new();
    let cats = ctx.group("Cats", "cats").await;
    let dogs = ctx.group("Dogs", "dogs").await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/groups/").to_request();
    let groups: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(groups[0]["slug"], "cats");
    assert_eq!(groups[1]["slug"], "dogs");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/groups/{}/", dogs.id))
        .to_request();
    let group: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        group,
        json!({
            "id": dogs.id,
            "title": "Dogs",
            "slug": "dogs",
            "description": "Dogs group"
        })
    );
    assert_ne!(cats.id, dogs.id);
}

#[actix_web::test]
async fn missing_group_is_404() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/groups/99/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn groups_have_no_write_surface() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    let cats = ctx.group("Cats", "cats").await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/groups/")
        .insert_header(leo.auth())
        .set_json(json!({"title": "New", "slug": "new"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/groups/{}/", cats.id))
        .insert_header(leo.auth())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[actix_web::test]
async fn health_and_metrics_are_served() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["storage"], "memory");

    let req = test::TestRequest::get().uri("/api/v1/health/ready").to_request();
    let ready: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ready["ready"], true);

    let req = test::TestRequest::get().uri("/api/v1/groups/").to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("blog_http_requests_total"));
}
