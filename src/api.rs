use crate::db::{Db, SortOrder};
use crate::error::ApiError;
use crate::models::{Task, TaskBody, TaskEnvelope, TaskPayload};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

// ── Shared state ───────────────────────────────────────────────

pub struct AppState {
    pub db: Db,
}

pub type SharedState = std::sync::Arc<AppState>;

/// Builds the `/tasks` route table. Layers (CORS, tracing) are the
/// caller's concern.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/mark_complete", patch(mark_complete))
        .route("/tasks/:id/mark_incomplete", patch(mark_incomplete))
        .with_state(state)
}

// ── Shared precondition ────────────────────────────────────────

/// Resolves a raw path id to a task: 400 if it isn't an integer, 404 if
/// no such task exists.
fn resolve_task(state: &SharedState, raw_id: &str) -> Result<Task, ApiError> {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| ApiError::InvalidId(raw_id.to_string()))?;

    state.db.get_task(id)?.ok_or(ApiError::NotFound(id))
}

// ── Handlers ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
    sort: Option<String>,
}

// POST /tasks
pub async fn create_task(
    State(state): State<SharedState>,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<TaskEnvelope>), ApiError> {
    // A new task always starts incomplete, whatever else the body says.
    let (title, description) = payload.validate().ok_or(ApiError::InvalidPayload)?;

    let task = state.db.create_task(&title, &description)?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

// GET /tasks?sort=asc|desc
pub async fn list_tasks(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TaskBody>>, ApiError> {
    // Unrecognized sort values fall through to the store's default order.
    let sort = match params.sort.as_deref() {
        Some("asc") => Some(SortOrder::Asc),
        Some("desc") => Some(SortOrder::Desc),
        _ => None,
    };

    let tasks = state.db.list_tasks(sort)?;

    Ok(Json(tasks.into_iter().map(TaskBody::from).collect()))
}

// GET /tasks/:id
pub async fn get_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let task = resolve_task(&state, &id)?;

    Ok(Json(task.into()))
}

// PUT /tasks/:id
pub async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let mut task = resolve_task(&state, &id)?;

    let (title, description) = payload.validate().ok_or(ApiError::InvalidPayload)?;
    task.title = title;
    task.description = description;
    // completed_at is untouched by updates.

    state.db.update_task(&task)?;

    Ok(Json(task.into()))
}

// PATCH /tasks/:id/mark_complete
pub async fn mark_complete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let mut task = resolve_task(&state, &id)?;

    // Idempotent: a second call just refreshes the timestamp.
    task.completed_at = Some(Utc::now());
    state.db.update_task(&task)?;

    Ok(Json(task.into()))
}

// PATCH /tasks/:id/mark_incomplete
pub async fn mark_incomplete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let mut task = resolve_task(&state, &id)?;

    task.completed_at = None;
    state.db.update_task(&task)?;

    Ok(Json(task.into()))
}

// DELETE /tasks/:id
pub async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = resolve_task(&state, &id)?;

    state.db.delete_task(task.id)?;

    Ok(Json(json!({
        "details": format!("Task {} \"{}\" successfully deleted", task.id, task.title)
    })))
}
