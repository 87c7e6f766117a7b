use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

pub const SERVICE_NAME: &str = "Blockchain Glossary API";
pub const SERVICE_DESCRIPTION: &str =
    "API для управления глоссарием терминов исследования производительности блокчейн-платформ";

/// 服务元信息
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": SERVICE_NAME,
        "description": SERVICE_DESCRIPTION,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /terms": "Получить список всех терминов",
            "GET /terms/{keyword}": "Получить термин по ключевому слову",
            "POST /terms": "Добавить новый термин",
            "PUT /terms/{keyword}": "Обновить существующий термин",
            "DELETE /terms/{keyword}": "Удалить термин",
            "GET /categories": "Получить список категорий",
            "GET /health": "Проверка работоспособности API"
        }
    }))
}

/// 健康检查：顺带探测一次数据库
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(state.terms.pool()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "service": SERVICE_NAME })),
        ),
        Err(e) => {
            tracing::error!("!!! 健康检查失败: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "service": SERVICE_NAME })),
            )
        }
    }
}
