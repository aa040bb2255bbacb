//! One call per REST operation: build, execute, parse.

use tracing::debug;

use crate::client::TodoClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreateTodo, ReorderTodos, Todo, TodoId, UpdateTodo};

/// `TodoClient` paired with a `Transport`.
///
/// No retries, batching or caching: every method issues exactly one request
/// and returns the parsed result or the first error unchanged.
pub struct TodoApi<T> {
    client: TodoClient,
    transport: T,
}

impl TodoApi<UreqTransport> {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(
            TodoClient::new(&config.base_url),
            UreqTransport::new(config.timeout()),
        )
    }
}

impl<T: Transport> TodoApi<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get_all(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(self.client.build_list_todos())?;
        self.client.parse_list_todos(response)
    }

    pub fn create(&self, title: &str, order: i64) -> Result<Todo, ApiError> {
        let input = CreateTodo {
            title: title.to_string(),
            order,
        };
        let response = self.send(self.client.build_create_todo(&input)?)?;
        self.client.parse_create_todo(response)
    }

    pub fn update(&self, id: TodoId, fields: &UpdateTodo) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_update_todo(id, fields)?)?;
        self.client.parse_update_todo(response)
    }

    pub fn toggle(&self, id: TodoId) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_toggle_todo(id))?;
        self.client.parse_toggle_todo(response)
    }

    pub fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_todo(id))?;
        self.client.parse_delete_todo(response)
    }

    pub fn reorder(&self, ids: &[TodoId]) -> Result<(), ApiError> {
        let input = ReorderTodos { ids: ids.to_vec() };
        let response = self.send(self.client.build_reorder_todos(&input)?)?;
        self.client.parse_reorder_todos(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
