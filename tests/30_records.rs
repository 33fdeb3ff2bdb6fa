mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{bearer, request, send, test_app};

#[tokio::test]
async fn create_returns_the_created_record() {
    let app = test_app();
    let owner = Uuid::new_v4();

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/v1",
            Some(&bearer(owner)),
            Some(json!({ "title": "Test" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "Test");
    assert_eq!(body["data"]["user_id"], owner.to_string());
    assert!(body["data"]["id"].is_string());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn create_rejects_an_empty_title() {
    let app = test_app();

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/v1",
            Some(&bearer(Uuid::new_v4())),
            Some(json!({ "title": "" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_rejects_a_malformed_body() {
    let app = test_app();

    let req = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/v1")
        .header("authorization", bearer(Uuid::new_v4()))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, _, _) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn another_owner_cannot_see_or_touch_a_record() {
    let app = test_app();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let (_, _, created) = send(
        &app,
        request(
            Method::POST,
            "/v1",
            Some(&bearer(alice)),
            Some(json!({ "title": "Test" })),
        ),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Bob gets the same answer he would for an id that does not exist
    let (status, _, foreign) = send(
        &app,
        request(Method::GET, &format!("/v1/{id}"), Some(&bearer(bob)), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(foreign.get("data").is_none());

    let (missing_status, _, missing) = send(
        &app,
        request(
            Method::GET,
            &format!("/v1/{}", Uuid::new_v4()),
            Some(&bearer(bob)),
            None,
        ),
    )
    .await;
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign, missing, "ownership mismatch must be indistinguishable from a missing record");

    // Mutations fail the same way
    let (status, _, _) = send(
        &app,
        request(
            Method::PATCH,
            &format!("/v1/{id}"),
            Some(&bearer(bob)),
            Some(json!({ "title": "Stolen" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(
        &app,
        request(Method::DELETE, &format!("/v1/{id}"), Some(&bearer(bob)), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice still owns an untouched record
    let (status, _, body) = send(
        &app,
        request(Method::GET, &format!("/v1/{id}"), Some(&bearer(alice)), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Test");
}

#[tokio::test]
async fn update_changes_the_title_only() {
    let app = test_app();
    let owner = Uuid::new_v4();

    let (_, _, created) = send(
        &app,
        request(
            Method::POST,
            "/v1",
            Some(&bearer(owner)),
            Some(json!({ "title": "before" })),
        ),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _, body) = send(
        &app,
        request(
            Method::PATCH,
            &format!("/v1/{id}"),
            Some(&bearer(owner)),
            Some(json!({ "title": "after" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "after");
    assert_eq!(body["data"]["user_id"], owner.to_string());
    assert_eq!(body["data"]["id"], id);
}

#[tokio::test]
async fn deleted_records_become_invisible() {
    let app = test_app();
    let owner = Uuid::new_v4();

    let (_, _, created) = send(
        &app,
        request(
            Method::POST,
            "/v1",
            Some(&bearer(owner)),
            Some(json!({ "title": "Test" })),
        ),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _, body) = send(
        &app,
        request(Method::DELETE, &format!("/v1/{id}"), Some(&bearer(owner)), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _, _) = send(
        &app,
        request(Method::GET, &format!("/v1/{id}"), Some(&bearer(owner)), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting twice is a not-found, not a second delete
    let (status, _, _) = send(
        &app,
        request(Method::DELETE, &format!("/v1/{id}"), Some(&bearer(owner)), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_only_the_requesters_records() {
    let app = test_app();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    for title in ["a", "b"] {
        send(
            &app,
            request(
                Method::POST,
                "/v1",
                Some(&bearer(alice)),
                Some(json!({ "title": title })),
            ),
        )
        .await;
    }
    send(
        &app,
        request(
            Method::POST,
            "/v1",
            Some(&bearer(bob)),
            Some(json!({ "title": "c" })),
        ),
    )
    .await;

    let (status, _, body) = send(&app, request(Method::GET, "/v1", Some(&bearer(alice)), None)).await;
    assert_eq!(status, StatusCode::OK);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["user_id"] == alice.to_string()));

    let (_, _, body) = send(&app, request(Method::GET, "/v1", Some(&bearer(bob)), None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_orders_and_paginates() {
    let app = test_app();
    let owner = Uuid::new_v4();

    for title in ["b", "c", "a"] {
        send(
            &app,
            request(
                Method::POST,
                "/v1",
                Some(&bearer(owner)),
                Some(json!({ "title": title })),
            ),
        )
        .await;
    }

    let (status, _, body) = send(
        &app,
        request(
            Method::GET,
            "/v1?order_by=title&order_direction=asc",
            Some(&bearer(owner)),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["a", "b", "c"]);

    let (_, _, body) = send(
        &app,
        request(
            Method::GET,
            "/v1?order_by=title&order_direction=asc&skip=1&limit=1",
            Some(&bearer(owner)),
            None,
        ),
    )
    .await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["b"]);
}

#[tokio::test]
async fn list_rejects_invalid_filters() {
    let app = test_app();
    let token = bearer(Uuid::new_v4());

    for uri in [
        "/v1?limit=101",
        "/v1?skip=-1",
        "/v1?order_by=owner_id",
        "/v1?order_direction=sideways",
    ] {
        let (status, _, body) = send(&app, request(Method::GET, uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expected 400 for {uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn list_filters_by_exact_title() {
    let app = test_app();
    let owner = Uuid::new_v4();

    for title in ["keep", "skip"] {
        send(
            &app,
            request(
                Method::POST,
                "/v1",
                Some(&bearer(owner)),
                Some(json!({ "title": title })),
            ),
        )
        .await;
    }

    let (_, _, body) = send(
        &app,
        request(Method::GET, "/v1?title=keep", Some(&bearer(owner)), None),
    )
    .await;
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "keep");
}

#[tokio::test]
async fn malformed_record_ids_are_a_bad_request() {
    let app = test_app();
    let token = bearer(Uuid::new_v4());

    let (status, _, body) = send(
        &app,
        request(Method::GET, "/v1/not-a-uuid", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid record id");
}

#[tokio::test]
async fn update_rejects_an_empty_title() {
    let app = test_app();
    let owner = Uuid::new_v4();

    let (_, _, created) = send(
        &app,
        request(
            Method::POST,
            "/v1",
            Some(&bearer(owner)),
            Some(json!({ "title": "Test" })),
        ),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _, _) = send(
        &app,
        request(
            Method::PATCH,
            &format!("/v1/{id}"),
            Some(&bearer(owner)),
            Some(json!({ "title": "" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
