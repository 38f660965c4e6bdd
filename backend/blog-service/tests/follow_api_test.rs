mod common;

use actix_web::{http::StatusCode, test};
use common::TestContext;
use serde_json::{json, Value};

#[actix_web::test]
async fn follow_requires_authentication() {
    let ctx = TestContext::new();
    ctx.user("mia").await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/api/v1/follow/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .set_json(json!({"following": "mia"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn follow_then_list_contains_edge_once() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    ctx.user("mia").await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(leo.auth())
        .set_json(json!({"following": "mia"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"user": "leo", "following": "mia"}));

    let req = test::TestRequest::get()
        .uri("/api/v1/follow/")
        .insert_header(leo.auth())
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([{"user": "leo", "following": "mia"}]));
}

#[actix_web::test]
async fn follow_rejections_carry_messages() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    ctx.user("mia").await;
    let app = test::init_service(ctx.app()).await;

    let cases = [
        (json!({}), "Invalid data!"),
        (json!({"following": "ghost"}), "Invalid data!"),
        (json!({"following": "leo"}), "You cannot follow yourself!"),
    ];
    for (payload, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/v1/follow/")
            .insert_header(leo.auth())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], message, "{}", payload);
    }

    for body in [r#"{"following": 5}"#, r#"{"following": null}"#, "[]", "{"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/follow/")
            .insert_header(leo.auth())
            .insert_header(("Content-Type", "application/json"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", body);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["message"], "Invalid data!", "{}", body);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(leo.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["message"], "Invalid data!");

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri("/api/v1/follow/")
            .insert_header(leo.auth())
            .set_json(json!({"following": "mia"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
        if expected == StatusCode::BAD_REQUEST {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "You are already following this author!");
        }
    }
}

#[actix_web::test]
async fn username_lookup_is_exact() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    ctx.user("Mia").await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/follow/")
        .insert_header(leo.auth())
        .set_json(json!({"following": "mia"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn list_shows_only_callers_edges_and_filters_by_search() {
    let ctx = TestContext::new();
    let leo = ctx.user("leo").await;
    let mia = ctx.user("mia").await;
    ctx.user("Annabel").await;
    ctx.user("bob").await;
    let app = test::init_service(ctx.app()).await;

    for (caller, target) in [(&leo, "Annabel"), (&leo, "bob"), (&mia, "leo")] {
        let req = test::TestRequest::post()
            .uri("/api/v1/follow/")
            .insert_header(caller.auth())
            .set_json(json!({ "following": target }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/follow/")
        .insert_header(leo.auth())
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let following: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["following"].as_str().unwrap())
        .collect();
    assert_eq!(following, vec!["Annabel", "bob"]);
    assert!(list.as_array().unwrap().iter().all(|f| f["user"] == "leo"));

    let req = test::TestRequest::get()
        .uri("/api/v1/follow/?search=ANNA")
        .insert_header(leo.auth())
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([{"user": "leo", "following": "Annabel"}]));

    let req = test::TestRequest::get()
        .uri("/api/v1/follow/?search=zzz")
        .insert_header(leo.auth())
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([]));
}
