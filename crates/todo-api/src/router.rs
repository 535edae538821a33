use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, put},
    Router,
};
use std::time::{Duration, Instant};

use crate::handlers;
use crate::AppState;

/// ルーティング定義。全パスは `/todos` 配下（ヘルスチェックを除く）
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todos/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/todos/:id/complete", put(handlers::complete_todo))
        .route("/todos/:id/assign", put(handlers::assign_todo))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// リクエスト単位のアクセスログ（4xx は warn、5xx は error）
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = elapsed_millis(started.elapsed());
    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, "HTTP request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, "HTTP request rejected");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, "HTTP request completed");
    }

    response
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
