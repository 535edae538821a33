use axum::{
    extract::{FromRequest, Path, State},
    http::StatusCode,
    Json,
};
use domain::{Todo, TodoId};
use tracing::info;

use crate::error::ApiError;
use crate::models::{AssignTodoRequest, CreateTodoRequest, HealthBody, MessageBody, UpdateTodoRequest};
use crate::AppState;

/// JSON 本文の抽出器。解析失敗は 400 として `ApiError` で返す
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// ヘルスチェック用ハンドラ
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state
        .run(|repo| repo.list_all())
        .await
        .map_err(|e| ApiError::from_todo(e, "failed to fetch todos from db"))?;

    Ok(Json(todos))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::from(id);
    let todo = state
        .run(move |repo| repo.get_by_id(&id))
        .await
        .map_err(|e| ApiError::from_todo(e, "failed to fetch todo from db"))?;

    Ok(Json(todo))
}

pub async fn create_todo(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = Todo::from(req);

    let record = todo.clone();
    state
        .run(move |repo| repo.insert(&record))
        .await
        .map_err(|e| ApiError::from_todo(e, "failed to add todo into db"))?;
    info!(id = %todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// item / completed の上書き
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::from(id);
    let todo = state
        .run(move |repo| repo.update_fields(&id, &req.item, req.completed))
        .await
        .map_err(|e| ApiError::from_todo(e, "failed to update todo in db"))?;

    Ok(Json(todo))
}

pub async fn complete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::from(id);
    let todo = state
        .run(move |repo| repo.set_completed(&id))
        .await
        .map_err(|e| ApiError::from_todo(e, "failed to update todo in db"))?;

    Ok(Json(todo))
}

pub async fn assign_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<AssignTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::from(id);
    let todo = state
        .run(move |repo| repo.set_responsible(&id, &req.responsible))
        .await
        .map_err(|e| ApiError::from_todo(e, "failed to assign todo in db"))?;

    Ok(Json(todo))
}

/// 存在しない ID でも成功として扱う
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = TodoId::from(id);
    let target = id.clone();
    let existed = state
        .run(move |repo| repo.delete_by_id(&target))
        .await
        .map_err(|e| ApiError::from_todo(e, "failed to delete todo from db"))?;
    info!(id = %id, existed, "Todo deleted");

    Ok(Json(MessageBody {
        message: "todo has been deleted successfully",
    }))
}
