use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub const MAX_TITLE_CHARS: usize = 200;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub order: i64,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i64>,
}

#[derive(Deserialize)]
pub struct ReorderTodos {
    pub ids: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Success {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

fn reject(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (status, Json(ErrorBody { error: message.into() }))
}

/// Unwraps a JSON body, turning any binding failure into a 400.
fn bind<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| reject(StatusCode::BAD_REQUEST, rejection.body_text()))
}

/// Todos keyed by id, plus the last id handed out.
#[derive(Default)]
pub struct Store {
    last_id: u64,
    todos: HashMap<u64, Todo>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::default();
    let todos = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/reorder", post(reorder_todos))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/todos/{id}/toggle", patch(toggle_todo));
    Router::new()
        .route("/health", get(health))
        .nest("/api", todos)
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    let mut todos: Vec<Todo> = store.todos.values().cloned().collect();
    todos.sort_by_key(|t| (t.order, t.id));
    Json(todos)
}

async fn create_todo(
    State(db): State<Db>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), HandlerError> {
    let input = bind(payload)?;
    let len = input.title.chars().count();
    if len == 0 || len > MAX_TITLE_CHARS {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            format!("title must be 1 to {MAX_TITLE_CHARS} characters"),
        ));
    }

    let mut store = db.write().await;
    store.last_id += 1;
    let now = timestamp();
    let todo = Todo {
        id: store.last_id,
        title: input.title,
        completed: false,
        order: input.order,
        created_at: now.clone(),
        updated_at: now,
    };
    store.todos.insert(todo.id, todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, HandlerError> {
    let input = bind(payload)?;
    let mut store = db.write().await;
    let todo = store
        .todos
        .get_mut(&id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "todo not found"))?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    if let Some(order) = input.order {
        todo.order = order;
    }
    todo.updated_at = timestamp();
    Ok(Json(todo.clone()))
}

async fn toggle_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Todo>, HandlerError> {
    let mut store = db.write().await;
    let todo = store
        .todos
        .get_mut(&id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "todo not found"))?;
    todo.completed = !todo.completed;
    todo.updated_at = timestamp();
    Ok(Json(todo.clone()))
}

/// Deleting an id that does not exist still succeeds.
async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> Json<Success> {
    db.write().await.todos.remove(&id);
    Json(Success { success: true })
}

/// Sets each listed todo's order to its index; unknown ids are skipped.
async fn reorder_todos(
    State(db): State<Db>,
    payload: Result<Json<ReorderTodos>, JsonRejection>,
) -> Result<Json<Success>, HandlerError> {
    let input = bind(payload)?;
    let mut store = db.write().await;
    let now = timestamp();
    for (index, id) in input.ids.iter().enumerate() {
        if let Some(todo) = store.todos.get_mut(id) {
            todo.order = index as i64;
            todo.updated_at = now.clone();
        }
    }
    Ok(Json(Success { success: true }))
}
