use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, ErrorBody, Success, Todo};
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Send one request through a long-lived app so state carries over.
async fn send(app: &mut Router, request: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

// --- health ---

#[tokio::test]
async fn health_reports_ok() {
    let resp = app().oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let resp = app().oneshot(empty_request("GET", "/api/todos")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":"Buy milk","order":3}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo = body_json(resp).await;
    assert_eq!(todo.id, 1);
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.order, 3);
    assert!(!todo.completed);
    assert_eq!(todo.created_at, todo.updated_at);
}

#[tokio::test]
async fn create_todo_empty_title_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":"","order":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert!(body.error.contains("title"));
}

#[tokio::test]
async fn create_todo_overlong_title_returns_400() {
    let title = "x".repeat(201);
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/todos",
            &format!(r#"{{"title":"{title}","order":1}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_todo_missing_title_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"order":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert!(body.error.contains("title"));
}

#[tokio::test]
async fn create_todo_malformed_json_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let _: ErrorBody = body_json(resp).await;
}

// --- update / toggle ---

#[tokio::test]
async fn update_todo_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/todos/7", r#"{"title":"Nope"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "todo not found");
}

#[tokio::test]
async fn toggle_todo_not_found() {
    let resp = app()
        .oneshot(empty_request("PATCH", "/api/todos/7/toggle"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("PATCH", "/api/todos/abc/toggle"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- reorder ---

#[tokio::test]
async fn reorder_missing_ids_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos/reorder", r#"{}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert!(body.error.contains("ids"));
}

#[tokio::test]
async fn reorder_empty_ids_succeeds() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos/reorder", r#"{"ids":[]}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Success = body_json(resp).await;
    assert!(body.success);
}

// --- delete ---

#[tokio::test]
async fn delete_unknown_todo_still_succeeds() {
    let resp = app().oneshot(empty_request("DELETE", "/api/todos/7")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Success = body_json(resp).await;
    assert!(body.success);
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let mut app = app();

    // create three, out of order
    for (title, order) in [("Walk dog", 2), ("Feed cat", 1), ("Water plants", 3)] {
        let resp = send(
            &mut app,
            json_request(
                "POST",
                "/api/todos",
                &format!(r#"{{"title":"{title}","order":{order}}}"#),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // list is sorted by order
    let resp = send(&mut app, empty_request("GET", "/api/todos")).await;
    let todos: Vec<Todo> = body_json(resp).await;
    let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Feed cat", "Walk dog", "Water plants"]);

    // toggle flips completion
    let resp = send(&mut app, empty_request("PATCH", "/api/todos/1/toggle")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let toggled: Todo = body_json(resp).await;
    assert!(toggled.completed);

    // partial update keeps other fields
    let resp = send(&mut app, json_request("PUT", "/api/todos/1", r#"{"title":"Walk cat"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.title, "Walk cat");
    assert!(updated.completed);
    assert_eq!(updated.order, 2);

    // reorder assigns positions; unknown ids are skipped
    let resp = send(
        &mut app,
        json_request("POST", "/api/todos/reorder", r#"{"ids":[3,99,1,2]}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&mut app, empty_request("GET", "/api/todos")).await;
    let todos: Vec<Todo> = body_json(resp).await;
    let pairs: Vec<(u64, i64)> = todos.iter().map(|t| (t.id, t.order)).collect();
    assert_eq!(pairs, vec![(3, 0), (1, 2), (2, 3)]);

    // delete
    let resp = send(&mut app, empty_request("DELETE", "/api/todos/1")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&mut app, empty_request("GET", "/api/todos")).await;
    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos.len(), 2);
    assert!(todos.iter().all(|t| t.id != 1));

    // toggling the deleted todo is now a 404
    let resp = send(&mut app, empty_request("PATCH", "/api/todos/1/toggle")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
