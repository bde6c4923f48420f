use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::db::DbHandle;
use super::models::{Column, Priority};
use super::status;
use super::validate::{self, FieldError};

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub db: DbHandle,
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────
//
// Every field is optional at the serde layer so missing input surfaces as
// a field-level Validation detail instead of a deserialization error.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub board_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub title: Option<String>,
    pub status: Option<String>,
    pub board_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColumnRequest {
    pub title: Option<String>,
    pub status: Option<String>,
    pub order: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub board_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnListQuery {
    pub board_id: Option<i64>,
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "error": "Validation failed", "details": details}),
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({"success": false, "error": msg}),
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                json!({"success": false, "error": msg}),
            ),
            ApiError::Internal(err) => {
                // Log the detail, surface an opaque message.
                tracing::error!(error = %err, "internal error handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"success": false, "error": "Internal server error"}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// ── Response envelope ─────────────────────────────────────────────────

fn ok<T: serde::Serialize>(data: T) -> Response {
    Json(json!({"success": true, "data": data})).into_response()
}

fn created<T: serde::Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "data": data})),
    )
        .into_response()
}

fn deleted() -> Response {
    Json(json!({"success": true})).into_response()
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/boards", get(list_boards).post(create_board))
        .route(
            "/boards/{id}",
            get(get_board).put(update_board).delete(delete_board),
        )
        .route("/boards/{id}/view", get(get_board_view))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/columns", get(list_columns).post(create_column))
        .route(
            "/columns/{id}",
            get(get_column).put(update_column).delete(delete_column),
        )
}

// ── Board handlers ────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn list_boards(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let boards = state
        .db
        .call(move |db| db.list_boards())
        .await?;
    Ok(ok(boards))
}

async fn create_board(
    State(state): State<SharedState>,
    Json(req): Json<CreateBoardRequest>,
) -> Result<Response, ApiError> {
    validate::board_create(req.title.as_deref(), req.description.as_deref())
        .map_err(ApiError::Validation)?;
    let title = req.title.unwrap_or_default();
    let description = req.description;
    let board = state
        .db
        .call(move |db| db.create_board(&title, description.as_deref()))
        .await?;
    Ok(created(board))
}

async fn get_board(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let detail = state
        .db
        .call(move |db| db.get_board_detail(id))
        .await?;
    match detail {
        Some(detail) => Ok(ok(detail)),
        None => Err(ApiError::NotFound(format!("Board {} not found", id))),
    }
}

async fn get_board_view(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let view = state
        .db
        .call(move |db| db.get_board_view(id))
        .await?;
    match view {
        Some(view) => Ok(ok(view)),
        None => Err(ApiError::NotFound(format!("Board {} not found", id))),
    }
}

async fn update_board(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBoardRequest>,
) -> Result<Response, ApiError> {
    validate::board_update(req.title.as_deref(), req.description.as_deref())
        .map_err(ApiError::Validation)?;
    let title = req.title;
    let description = req.description;
    let board = state
        .db
        .call(move |db| db.update_board(id, title.as_deref(), description.as_deref()))
        .await?;
    match board {
        Some(board) => Ok(ok(board)),
        None => Err(ApiError::NotFound(format!("Board {} not found", id))),
    }
}

async fn delete_board(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let removed = state
        .db
        .call(move |db| db.delete_board(id))
        .await?;
    if removed {
        Ok(deleted())
    } else {
        Err(ApiError::NotFound(format!("Board {} not found", id)))
    }
}

// ── Task handlers ─────────────────────────────────────────────────────

async fn list_tasks(
    State(state): State<SharedState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Response, ApiError> {
    let board_id = query.board_id;
    let task_status = query.status;
    let tasks = state
        .db
        .call(move |db| db.list_tasks(board_id, task_status.as_deref()))
        .await?;
    Ok(ok(tasks))
}

async fn create_task(
    State(state): State<SharedState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Response, ApiError> {
    validate::task_create(
        req.title.as_deref(),
        req.description.as_deref(),
        req.priority.as_deref(),
        req.board_id,
    )
    .map_err(ApiError::Validation)?;
    let title = req.title.unwrap_or_default();
    let description = req.description;
    let board_id = req.board_id.unwrap_or_default();
    let task_status = req
        .status
        .unwrap_or_else(|| status::DEFAULT_TASK_STATUS.to_string());
    // Priority was validated above; a bad value cannot reach the parse.
    let priority = req
        .priority
        .as_deref()
        .map_or(Priority::Medium, |p| {
            Priority::from_str(p).unwrap_or(Priority::Medium)
        });

    let task = state
        .db
        .call(move |db| {
            // The board reference is checked before the insert; a missing
            // board is NotFound, not a constraint failure.
            if db.get_board(board_id)?.is_none() {
                return Ok(None);
            }
            db.create_task(board_id, &title, description.as_deref(), &task_status, priority)
                .map(Some)
        })
        .await?;
    match task {
        Some(task) => Ok(created(task)),
        None => Err(ApiError::NotFound(format!("Board {} not found", board_id))),
    }
}

async fn get_task(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let task = state
        .db
        .call(move |db| db.get_task(id))
        .await?;
    match task {
        Some(task) => Ok(ok(task)),
        None => Err(ApiError::NotFound(format!("Task {} not found", id))),
    }
}

async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Response, ApiError> {
    validate::task_update(
        req.title.as_deref(),
        req.description.as_deref(),
        req.priority.as_deref(),
    )
    .map_err(ApiError::Validation)?;
    let title = req.title;
    let description = req.description;
    let task_status = req.status;
    let priority = req
        .priority
        .as_deref()
        .and_then(|p| Priority::from_str(p).ok());

    let task = state
        .db
        .call(move |db| {
            db.update_task(
                id,
                title.as_deref(),
                description.as_deref(),
                task_status.as_deref(),
                priority,
            )
        })
        .await?;
    match task {
        Some(task) => Ok(ok(task)),
        None => Err(ApiError::NotFound(format!("Task {} not found", id))),
    }
}

async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let removed = state
        .db
        .call(move |db| db.delete_task(id))
        .await?;
    if removed {
        Ok(deleted())
    } else {
        Err(ApiError::NotFound(format!("Task {} not found", id)))
    }
}

// ── Column handlers ───────────────────────────────────────────────────

enum ColumnWriteOutcome {
    NotFound(String),
    DuplicateStatus(String),
    Done(Column),
}

async fn list_columns(
    State(state): State<SharedState>,
    Query(query): Query<ColumnListQuery>,
) -> Result<Response, ApiError> {
    let board_id = query.board_id;
    let columns = state
        .db
        .call(move |db| db.list_columns(board_id))
        .await?;
    Ok(ok(columns))
}

async fn create_column(
    State(state): State<SharedState>,
    Json(req): Json<CreateColumnRequest>,
) -> Result<Response, ApiError> {
    // When the client omits the status, the canonical key is derived from
    // the title; validation then runs against the resolved value.
    let derived = req
        .status
        .or_else(|| req.title.as_deref().map(status::derive_status_key));
    validate::column_create(req.title.as_deref(), derived.as_deref(), req.board_id)
        .map_err(ApiError::Validation)?;
    let title = req.title.unwrap_or_default();
    let column_status = derived.unwrap_or_default();
    let board_id = req.board_id.unwrap_or_default();

    let outcome = state
        .db
        .call(move |db| {
            if db.get_board(board_id)?.is_none() {
                return Ok(ColumnWriteOutcome::NotFound(format!(
                    "Board {} not found",
                    board_id
                )));
            }
            let existing = db.list_columns(Some(board_id))?;
            if existing.iter().any(|c| c.status == column_status) {
                return Ok(ColumnWriteOutcome::DuplicateStatus(column_status));
            }
            let order = status::next_column_order(&existing);
            db.create_column(board_id, &title, &column_status, order)
                .map(ColumnWriteOutcome::Done)
        })
        .await?;
    match outcome {
        ColumnWriteOutcome::Done(column) => Ok(created(column)),
        ColumnWriteOutcome::NotFound(msg) => Err(ApiError::NotFound(msg)),
        ColumnWriteOutcome::DuplicateStatus(s) => Err(ApiError::Conflict(format!(
            "A column with status {} already exists on this board",
            s
        ))),
    }
}

async fn get_column(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let column = state
        .db
        .call(move |db| db.get_column(id))
        .await?;
    match column {
        Some(column) => Ok(ok(column)),
        None => Err(ApiError::NotFound(format!("Column {} not found", id))),
    }
}

async fn update_column(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateColumnRequest>,
) -> Result<Response, ApiError> {
    validate::column_update(req.title.as_deref(), req.status.as_deref(), req.order)
        .map_err(ApiError::Validation)?;
    let title = req.title;
    let column_status = req.status;
    let order = req.order;

    let outcome = state
        .db
        .call(move |db| {
            let current = match db.get_column(id)? {
                Some(c) => c,
                None => {
                    return Ok(ColumnWriteOutcome::NotFound(format!(
                        "Column {} not found",
                        id
                    )));
                }
            };
            if let Some(ref s) = column_status {
                let siblings = db.list_columns(Some(current.board_id))?;
                if siblings.iter().any(|c| c.id != id && c.status == *s) {
                    return Ok(ColumnWriteOutcome::DuplicateStatus(s.clone()));
                }
            }
            match db.update_column(id, title.as_deref(), column_status.as_deref(), order)? {
                Some(column) => Ok(ColumnWriteOutcome::Done(column)),
                None => Ok(ColumnWriteOutcome::NotFound(format!(
                    "Column {} not found",
                    id
                ))),
            }
        })
        .await?;
    match outcome {
        ColumnWriteOutcome::Done(column) => Ok(ok(column)),
        ColumnWriteOutcome::NotFound(msg) => Err(ApiError::NotFound(msg)),
        ColumnWriteOutcome::DuplicateStatus(s) => Err(ApiError::Conflict(format!(
            "A column with status {} already exists on this board",
            s
        ))),
    }
}

enum ColumnDeleteOutcome {
    Missing,
    StaticProtected(String),
    Deleted,
}

async fn delete_column(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let outcome = state
        .db
        .call(move |db| {
            let column = match db.get_column(id)? {
                Some(c) => c,
                None => return Ok(ColumnDeleteOutcome::Missing),
            };
            // Capability check, not a database constraint: the static
            // workflow stages must always be present.
            if !status::is_deletable(&column.status) {
                return Ok(ColumnDeleteOutcome::StaticProtected(column.status));
            }
            db.delete_column(id)?;
            Ok(ColumnDeleteOutcome::Deleted)
        })
        .await?;
    match outcome {
        ColumnDeleteOutcome::Deleted => Ok(deleted()),
        ColumnDeleteOutcome::Missing => {
            Err(ApiError::NotFound(format!("Column {} not found", id)))
        }
        ColumnDeleteOutcome::StaticProtected(s) => Err(ApiError::Conflict(format!(
            "Column with static status {} cannot be deleted",
            s
        ))),
    }
}
