//! Todo CRUD の HTTP API（axum）
//!
//! データベースを唯一の状態とし、ハンドラは注入された
//! `TodoRepository` だけを経由して読み書きする。

use axum::Router;
use domain::TodoError;
use infrastructure::TodoRepository;
use std::sync::Arc;

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;

pub use error::ApiError;

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    /// リポジトリ呼び出しをブロッキング用スレッドプールで実行する
    ///
    /// SQLite へのアクセスは同期 I/O とロック待ちを伴うため、
    /// 非同期ランタイムのワーカーを止めないよう `spawn_blocking` に逃がす。
    pub async fn run<T, F>(&self, f: F) -> Result<T, TodoError>
    where
        F: FnOnce(&dyn TodoRepository) -> Result<T, TodoError> + Send + 'static,
        T: Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || f(repo.as_ref()))
            .await
            .map_err(TodoError::storage)?
    }
}

/// 外部から状態を注入してルータを構築
pub fn app_with_state(state: AppState) -> Router {
    router::routes(state)
}
