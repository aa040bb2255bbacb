//! Domain DTOs for the todo API and the derived view types.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//! Timestamps stay as the server's strings: the client never interprets them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-assigned task identifier.
pub type TodoId = u64;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    /// Display position. Not guaranteed contiguous or unique.
    pub order: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub order: i64,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Request payload for reordering: the full id sequence in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderTodos {
    pub ids: Vec<TodoId>,
}

/// Aggregate counters derived from a todo collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percentage in `0..=100`.
    #[serde(rename = "completionRate")]
    pub completion_rate: u32,
}

impl TodoStats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|t| t.completed).count();
        let completion_rate = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }
}

/// Display mode preference.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme: {0:?}")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: TodoId, completed: bool) -> Todo {
        Todo {
            id,
            title: format!("task {id}"),
            completed,
            order: id as i64,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn stats_for_empty_collection_are_zero() {
        assert_eq!(TodoStats::from_todos(&[]), TodoStats::default());
    }

    #[test]
    fn stats_quarter_completed() {
        let todos = vec![todo(1, true), todo(2, false), todo(3, false), todo(4, false)];
        let stats = TodoStats::from_todos(&todos);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.completion_rate, 25);
    }

    #[test]
    fn stats_completion_rate_rounds_half_up() {
        // 1/3 = 33.3 -> 33, 2/3 = 66.7 -> 67, 1/8 = 12.5 -> 13
        let third = TodoStats::from_todos(&[todo(1, true), todo(2, false), todo(3, false)]);
        assert_eq!(third.completion_rate, 33);
        let two_thirds = TodoStats::from_todos(&[todo(1, true), todo(2, true), todo(3, false)]);
        assert_eq!(two_thirds.completion_rate, 67);
        let mut eighth: Vec<Todo> = (1..=8).map(|id| todo(id, false)).collect();
        eighth[0].completed = true;
        assert_eq!(TodoStats::from_todos(&eighth).completion_rate, 13);
    }

    #[test]
    fn stats_serialize_with_camel_case_rate() {
        let json = serde_json::to_value(TodoStats::from_todos(&[todo(1, true)])).unwrap();
        assert_eq!(json["completionRate"], 100);
        assert_eq!(json["pending"], 0);
    }

    #[test]
    fn todo_decodes_server_payload() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":7,"title":"Write docs","completed":false,"order":3,
                "created_at":"2024-05-01T10:00:00Z","updated_at":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(todo.id, 7);
        assert_eq!(todo.order, 3);
        assert_eq!(todo.created_at, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn update_todo_omits_absent_fields() {
        let input = UpdateTodo {
            order: Some(4),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({"order": 4}));
    }

    #[test]
    fn theme_parses_and_prints_lowercase() {
        for theme in [Theme::Light, Theme::Dark, Theme::Auto] {
            assert_eq!(theme.to_string().parse::<Theme>(), Ok(theme));
        }
        assert_eq!(
            "Dark".parse::<Theme>(),
            Err(ParseThemeError("Dark".to_string()))
        );
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}
