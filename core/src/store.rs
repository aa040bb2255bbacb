//! In-memory todo collection kept in step with the server.
//!
//! # Design
//! `TodoStore` is an explicitly owned container: callers hold it and mutate
//! it only through the operations below. Local state changes only after the
//! server confirms a mutation, so a failed call leaves the collection as it
//! was. Statistics are recomputed on demand from the collection.

use tracing::error;

use crate::api::TodoApi;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Todo, TodoId, TodoStats, UpdateTodo};

/// User-facing message stored when a full reload fails.
pub const LOAD_TODOS_FAILED: &str = "加载任务失败";

pub struct TodoStore<T> {
    api: TodoApi<T>,
    todos: Vec<Todo>,
    loading: bool,
    error: Option<String>,
}

/// Raises a flag for its lifetime and lowers it on drop, on every exit path.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl<T: Transport> TodoStore<T> {
    pub fn new(api: TodoApi<T>) -> Self {
        Self {
            api,
            todos: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn api(&self) -> &TodoApi<T> {
        &self.api
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    /// Replace the collection with the server's list.
    ///
    /// Failure is not returned: it is logged and recorded as
    /// [`LOAD_TODOS_FAILED`] in [`error`](Self::error).
    pub fn load_todos(&mut self) {
        let _loading = LoadingGuard::start(&mut self.loading);
        self.error = None;
        match self.api.get_all() {
            Ok(todos) => self.todos = todos,
            Err(err) => {
                error!(error = %err, "failed to load todos");
                self.error = Some(LOAD_TODOS_FAILED.to_string());
            }
        }
    }

    /// Create a task at the end of the list.
    ///
    /// Blank titles are skipped without a request and yield `Ok(None)`.
    pub fn add_todo(&mut self, title: &str) -> Result<Option<Todo>, ApiError> {
        if title.trim().is_empty() {
            return Ok(None);
        }
        let order = self.todos.iter().map(|t| t.order).fold(0, i64::max).saturating_add(1);
        let todo = self.api.create(title, order)?;
        self.todos.push(todo.clone());
        Ok(Some(todo))
    }

    pub fn remove_todo(&mut self, id: TodoId) -> Result<(), ApiError> {
        self.api.delete(id)?;
        self.todos.retain(|t| t.id != id);
        Ok(())
    }

    pub fn toggle_todo(&mut self, id: TodoId) -> Result<Todo, ApiError> {
        let updated = self.api.toggle(id)?;
        self.replace_local(&updated);
        Ok(updated)
    }

    pub fn update_todo(&mut self, id: TodoId, fields: &UpdateTodo) -> Result<Todo, ApiError> {
        let updated = self.api.update(id, fields)?;
        self.replace_local(&updated);
        Ok(updated)
    }

    /// Submit `ids` as the new display order, then mirror it locally with
    /// `order` set to each position. Ids unknown locally are dropped.
    // TODO: decide whether to re-fetch after reorder instead of assuming the
    // server assigned the same positions.
    pub fn reorder_todos(&mut self, ids: &[TodoId]) -> Result<(), ApiError> {
        self.api.reorder(ids)?;
        self.todos = ids
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                self.todos.iter().find(|t| t.id == *id).map(|t| Todo {
                    order: index as i64,
                    ..t.clone()
                })
            })
            .collect();
        Ok(())
    }

    fn replace_local(&mut self, updated: &Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated.clone();
        }
    }
}
