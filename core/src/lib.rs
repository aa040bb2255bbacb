//! Client-side data layer for the todo list service.
//!
//! # Overview
//! - `TodoClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network.
//! - A `Transport` executes requests; `UreqTransport` does so over HTTP with
//!   a fixed timeout.
//! - `TodoApi` runs one build/execute/parse cycle per REST operation.
//! - `TodoStore` holds the task list, mirroring confirmed server mutations
//!   and deriving `TodoStats`.
//! - `ThemeController` persists the light/dark/auto choice and keeps the
//!   effective dark flag in step.
//!
//! # Design
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - State containers are plain owned values mutated through `&mut self`.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod theme;
pub mod transport;
pub mod types;

pub use api::TodoApi;
pub use client::TodoClient;
pub use config::Config;
pub use error::{ApiError, ConfigError, StorageError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{TodoStore, LOAD_TODOS_FAILED};
pub use theme::{
    FileThemeStorage, FixedPreference, MemoryThemeStorage, SystemPreference, ThemeController, ThemeStorage,
    THEME_STORAGE_KEY,
};
pub use transport::{Transport, UreqTransport};
pub use types::{CreateTodo, ReorderTodos, Theme, Todo, TodoId, TodoStats, UpdateTodo};
