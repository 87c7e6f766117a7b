use axum::{routing::get, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod validation;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::{seed_service, term_repository::TermRepository};

// 全局状态，Handler 通过它拿到词条仓库（内部持有连接池）
pub struct AppState {
    pub terms: TermRepository,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { terms: TermRepository::new(pool) }
    }
}

/// 启动钩子：建表，必要时写入默认词条
pub async fn bootstrap(pool: &SqlitePool, config: &Config) -> AppResult<()> {
    db::migrate(pool).await?;
    if config.seed_default_terms {
        seed_service::seed_if_empty(&TermRepository::new(pool.clone())).await?;
    }
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // 跨域：开放给任意前端调用
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::system_handler::root))
        .route("/health", get(handlers::system_handler::health_check))
        // 词条接口
        .route("/terms", get(handlers::term_handler::list_terms)
            .post(handlers::term_handler::create_term))
        .route("/terms/:keyword", get(handlers::term_handler::get_term)
            .put(handlers::term_handler::update_term)
            .delete(handlers::term_handler::delete_term))
        .route("/categories", get(handlers::term_handler::list_categories))
        // 中间件：日志记录和跨域
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
