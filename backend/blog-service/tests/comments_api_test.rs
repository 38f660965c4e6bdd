mod common;

use actix_web::{http::StatusCode, test};
use blog_service::models::PostData;
use blog_service::repository::BlogRepository;
use common::{TestContext, TestUser};
use serde_json::{json, Value};

async fn create_post(ctx: &TestContext, author: &TestUser, text: &str) -> i64 {
    let data = PostData {
        text: text.into(),
        image: None,
        group_id: None,
    };
    ctx.repo
        .create_post(author.id(), &data)
        .await
        .expect("create post")
        .id
}

#[actix_web::test]
async fn comments_on_missing_post_are_404() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/777/comments/")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/777/comments/")
        .insert_header(leo.auth())
        .set_json(json!({"text": "hello?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn create_binds_author_and_post() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    let mia = ctx.user("mia").await;
    let app = test::init_service(ctx.app()).await;
    let post_id = create_post(&ctx, &leo, "post").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments/", post_id))
        .insert_header(mia.auth())
        .set_json(json!({"text": "nice", "post": 999, "author": "leo"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let comment: Value = test::read_body_json(resp).await;
    assert_eq!(comment["author"], "mia");
    assert_eq!(comment["post"], post_id);
    assert_eq!(comment["text"], "nice");
    assert!(comment["created"].is_string());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/comments", post_id))
        .to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(comments.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn blank_comment_is_rejected() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    let app = test::init_service(ctx.app()).await;
    let post_id = create_post(&ctx, &leo, "post").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments/", post_id))
        .insert_header(leo.auth())
        .set_json(json!({"text": "   "}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn comment_is_not_reachable_through_another_post() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    let app = test::init_service(ctx.app()).await;
    let first = create_post(&ctx, &leo, "first").await;
    let second = create_post(&ctx, &leo, "second").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments/", first))
        .insert_header(leo.auth())
        .set_json(json!({"text": "on first"}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let comment_id = comment["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/comments/{}/", second, comment_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}/comments/{}/", second, comment_id))
        .insert_header(leo.auth())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/comments/", second))
        .to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(comments, json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/comments/{}/", first, comment_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn only_comment_author_can_modify() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    let mia = ctx.user("mia").await;
    let app = test::init_service(ctx.app()).await;
    let post_id = create_post(&ctx, &leo, "post").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments/", post_id))
        .insert_header(mia.auth())
        .set_json(json!({"text": "mia was here"}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/posts/{}/comments/{}/", post_id, comment["id"]);

    // the post author has no say over other users' comments
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(leo.auth())
        .set_json(json!({"text": "edited by leo"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .set_json(json!({"text": "anonymous edit"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(mia.auth())
        .set_json(json!({"text": "edited"}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["text"], "edited");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(mia.auth())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn deleting_post_removes_comments() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    let app = test::init_service(ctx.app()).await;
    let post_id = create_post(&ctx, &leo, "post").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments/", post_id))
        .insert_header(leo.auth())
        .set_json(json!({"text": "soon gone"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}/", post_id))
        .insert_header(leo.auth())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/comments/", post_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
