use super::helpers::{expect_status, json_request, read_json, send, spawn_app, unique_entity};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn health_reports_healthy_and_tags_request_id() {
    let app = spawn_app();
    let res = expect_status(
        send(&app.app, json_request("GET", "/health", None, None)).await,
        StatusCode::OK,
    )
    .await;
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn toggling_requires_identity() {
    let app = spawn_app();
    let res = send(
        &app.app,
        json_request("POST", "/api/likes", None, Some(json!({ "entity_id": "p-1" }))),
    )
    .await;
    let res = expect_status(res, StatusCode::UNAUTHORIZED).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Please log in to continue");
}

#[tokio::test]
async fn like_toggle_round_trip() {
    let app = spawn_app();
    let entity = unique_entity("prompt");

    for (user, expected_count) in [("alice", 1), ("bob", 2)] {
        let res = send(
            &app.app,
            json_request("POST", "/api/likes", Some(user), Some(json!({ "entity_id": entity }))),
        )
        .await;
        let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
        assert_eq!(body, json!({ "liked": true, "count": expected_count }));
    }

    let res = send(
        &app.app,
        json_request("POST", "/api/likes", Some("alice"), Some(json!({ "entity_id": entity }))),
    )
    .await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body, json!({ "liked": false, "count": 1 }));

    let uri = format!("/api/likes?entity_id={entity}");
    let body: Value = read_json(send(&app.app, json_request("GET", &uri, Some("bob"), None)).await).await;
    assert_eq!(body, json!({ "liked": true, "count": 1 }));
    let body: Value = read_json(send(&app.app, json_request("GET", &uri, None, None)).await).await;
    assert_eq!(body, json!({ "liked": false, "count": 1 }));
}

#[tokio::test]
async fn comment_validation() {
    let app = spawn_app();
    let entity = unique_entity("prompt");

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/comments",
            Some("alice"),
            Some(json!({ "entity_id": entity, "content": "   " })),
        ),
    )
    .await;
    let body: Value = read_json(expect_status(res, StatusCode::BAD_REQUEST).await).await;
    assert_eq!(body["error"], "Comment cannot be empty");

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/comments",
            Some("alice"),
            Some(json!({ "entity_id": entity, "content": "x".repeat(501) })),
        ),
    )
    .await;
    expect_status(res, StatusCode::BAD_REQUEST).await;

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/comments",
            None,
            Some(json!({ "entity_id": entity, "content": "hi" })),
        ),
    )
    .await;
    expect_status(res, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
async fn comment_create_list_delete() {
    let app = spawn_app();
    let entity = unique_entity("prompt");

    let mut ids = Vec::new();
    for content in ["first", "second"] {
        let res = send(
            &app.app,
            json_request(
                "POST",
                "/api/comments",
                Some("alice"),
                Some(json!({ "entity_id": entity, "content": content })),
            ),
        )
        .await;
        let body: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;
        assert_eq!(body["data"]["content"], content);
        assert_eq!(body["data"]["user_id"], "alice");
        ids.push(body["data"]["id"].as_str().expect("missing id").to_string());
    }

    let uri = format!("/api/comments?entity_id={entity}");
    let body: Value = read_json(send(&app.app, json_request("GET", &uri, None, None)).await).await;
    let listed: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|c| c["id"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(listed, vec![ids[0].as_str(), ids[1].as_str()]);

    let delete_uri = format!("/api/comments/{}", ids[0]);
    let res = send(&app.app, json_request("DELETE", &delete_uri, Some("bob"), None)).await;
    expect_status(res, StatusCode::FORBIDDEN).await;

    let res = send(&app.app, json_request("DELETE", &delete_uri, Some("alice"), None)).await;
    expect_status(res, StatusCode::OK).await;

    let res = send(&app.app, json_request("DELETE", &delete_uri, Some("alice"), None)).await;
    expect_status(res, StatusCode::NOT_FOUND).await;

    let body: Value = read_json(send(&app.app, json_request("GET", &uri, None, None)).await).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}
