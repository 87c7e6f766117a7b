use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::term::{
    CategoriesResponse, CreateTermRequest, DeleteTermResponse, ListTermsQuery, UpdateTermRequest,
};
use crate::AppState;

/// 1. 获取词条列表（可按分类过滤，skip/limit 分页）
pub async fn list_terms(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListTermsQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) = query?;
    tracing::debug!(
        ">>> 查询词条列表: category={:?}, skip={}, limit={}",
        query.category_filter(),
        query.skip,
        query.limit
    );
    let terms = state
        .terms
        .list(query.category_filter(), query.skip, query.limit)
        .await?;
    Ok(Json(terms))
}

/// 2. 按关键词获取词条（不区分大小写）
pub async fn get_term(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> AppResult<impl IntoResponse> {
    let term = state.terms.get_by_keyword(&keyword).await?;
    Ok(Json(term))
}

/// 3. 新增词条
pub async fn create_term(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTermRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    tracing::info!(">>> 新增词条: keyword={}", payload.keyword);
    let new_term = payload.validate()?;
    let term = state.terms.create(new_term).await?;
    Ok((StatusCode::CREATED, Json(term)))
}

/// 4. 部分更新词条（只能改 definition / category）
pub async fn update_term(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
    payload: Result<Json<UpdateTermRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    tracing::info!(">>> 更新词条: keyword={}", keyword);
    let changes = payload.validate()?;
    let term = state.terms.update(&keyword, changes).await?;
    Ok(Json(term))
}

/// 5. 删除词条
pub async fn delete_term(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> AppResult<impl IntoResponse> {
    tracing::warn!(">>> 删除词条: keyword={}", keyword);
    let deleted = state.terms.delete(&keyword).await?;
    Ok(Json(DeleteTermResponse {
        message: format!("Термин '{}' успешно удален из глоссария", deleted.keyword),
        deleted_term: deleted,
    }))
}

/// 6. 当前使用中的全部分类
pub async fn list_categories(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let categories = state.terms.list_categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}
