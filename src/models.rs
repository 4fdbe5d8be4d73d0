use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task row as stored in the database.
///
/// `is_complete` is never stored; it is derived from `completed_at` at
/// serialization time so the two representations can't drift apart.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub goal_id: Option<i64>,
}

impl Task {
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

// API request/response types

/// Body for POST /tasks and PUT /tasks/:id. Only `title` and
/// `description` are read; anything else in the body is ignored.
///
/// Fields are optional so a missing key surfaces as our own 400 rather
/// than a deserialization rejection; handlers call `validate()`.
#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskPayload {
    pub fn validate(self) -> Option<(String, String)> {
        match (self.title, self.description) {
            (Some(title), Some(description)) => Some((title, description)),
            _ => None,
        }
    }
}

/// Plain serialized task: `{id, title, description, is_complete}`.
/// Never exposes `goal_id`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskBody {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_complete: bool,
}

/// Serialized task including its goal association:
/// `{id, goal_id, title, description, is_complete}`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithGoalBody {
    pub id: i64,
    pub goal_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub is_complete: bool,
}

impl From<Task> for TaskBody {
    fn from(task: Task) -> Self {
        TaskBody {
            id: task.id,
            is_complete: task.is_complete(),
            title: task.title,
            description: task.description,
        }
    }
}

impl From<Task> for TaskWithGoalBody {
    fn from(task: Task) -> Self {
        TaskWithGoalBody {
            id: task.id,
            goal_id: task.goal_id,
            is_complete: task.is_complete(),
            title: task.title,
            description: task.description,
        }
    }
}

/// Single-task responses are wrapped under a `task` key.
#[derive(Debug, Serialize)]
pub struct TaskEnvelope {
    pub task: TaskBody,
}

impl From<Task> for TaskEnvelope {
    fn from(task: Task) -> Self {
        TaskEnvelope { task: task.into() }
    }
}
