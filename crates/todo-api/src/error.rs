use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::TodoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("this specific todo was not found")]
    NotFound,

    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// `message` はクライアントに返す固定文言。ドライバの詳細は `source` に残しログにのみ出す
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: TodoError,
    },
}

impl ApiError {
    /// リポジトリのエラーを、操作ごとの固定メッセージ付きで変換
    pub fn from_todo(err: TodoError, message: &'static str) -> Self {
        match err {
            TodoError::NotFound(_) => ApiError::NotFound,
            TodoError::Storage(_) => ApiError::Internal {
                message,
                source: err,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, source } = &self {
            tracing::error!(error = %source, "{message}");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
