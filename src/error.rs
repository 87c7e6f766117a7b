use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::validation::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// 请求体或查询串无法解析（语法错误、缺少 Content-Type 等）
    #[error("{1}")]
    BadRequest(StatusCode, String),

    #[error("Термин '{0}' не найден в глоссарии")]
    NotFound(String),

    #[error("Термин '{0}' уже существует в глоссарии")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

// 字段缺失或类型不对按校验错误处理（422，逐字段明细），其余解析失败保留 axum 给出的状态码
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                AppError::Validation(ValidationErrors::single("body", e.body_text()))
            }
            other => AppError::BadRequest(other.status(), other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.status(), rejection.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(status, _) => *status,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // 重复关键词返回 400 而不是 409
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Migration(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::Validation(errors) => json!({ "detail": errors }),
            AppError::BadRequest(..) | AppError::NotFound(_) | AppError::Conflict(_) => {
                json!({ "detail": self.to_string() })
            }
            _ => {
                // 内部错误只写日志，不把细节返回给调用方
                tracing::error!("!!! 内部错误: {}", self);
                json!({ "detail": "Внутренняя ошибка сервера" })
            }
        };
        (status, Json(body)).into_response()
    }
}
