use domain::Todo;
use serde::{Deserialize, Serialize};

/// POST /todos リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub id: String,
    pub item: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub responsible: String,
}

impl From<CreateTodoRequest> for Todo {
    fn from(req: CreateTodoRequest) -> Self {
        Todo {
            id: req.id.into(),
            item: req.item,
            completed: req.completed,
            responsible: req.responsible,
        }
    }
}

/// PUT /todos/:id リクエスト
///
/// 上書き対象の `item` は必須。`completed` のみ省略時 false
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub item: String,
    #[serde(default)]
    pub completed: bool,
}

/// PUT /todos/:id/assign リクエスト（`responsible` は必須）
#[derive(Debug, Deserialize)]
pub struct AssignTodoRequest {
    pub responsible: String,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// サービスの簡易ステータス
    pub status: &'static str,
}
