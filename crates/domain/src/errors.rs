use thiserror::Error;

/// Todo の永続化・取得で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("Todo not found: {0}")]
    NotFound(String),

    /// ドライバ由来の失敗（接続・制約違反・スキャン）を区別せずに保持する
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TodoError {
    pub fn not_found(id: &crate::TodoId) -> Self {
        TodoError::NotFound(id.as_str().to_string())
    }

    pub fn storage(message: impl std::fmt::Display) -> Self {
        TodoError::Storage(message.to_string())
    }
}
