use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::term::{NewTerm, Term, TermChanges};
use crate::validation::normalize_keyword;

const TERM_COLUMNS: &str = "id, keyword, definition, category, created_at, updated_at";

/// 词条的持久化操作。关键词一律按规范化形式（去空白 + 小写）做等值比较。
#[derive(Clone)]
pub struct TermRepository {
    pool: SqlitePool,
}

impl TermRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 按插入顺序分页列出，可选按分类精确过滤
    pub async fn list(&self, category: Option<&str>, skip: u32, limit: u32) -> AppResult<Vec<Term>> {
        let sql = format!(
            "SELECT {TERM_COLUMNS} FROM terms \
             WHERE (?1 IS NULL OR category = ?1) \
             ORDER BY id ASC LIMIT ?2 OFFSET ?3"
        );
        let terms = sqlx::query_as::<_, Term>(&sql)
            .bind(category)
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&self.pool)
            .await?;
        Ok(terms)
    }

    pub async fn get_by_keyword(&self, keyword: &str) -> AppResult<Term> {
        let sql = format!("SELECT {TERM_COLUMNS} FROM terms WHERE keyword_normalized = ?");
        sqlx::query_as::<_, Term>(&sql)
            .bind(normalize_keyword(keyword))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                tracing::debug!("--- 未找到词条: {}", keyword);
                AppError::NotFound(keyword.to_string())
            })
    }

    /// 唯一索引负责判重，并发创建同一关键词时只有一个能成功
    pub async fn create(&self, term: NewTerm) -> AppResult<Term> {
        let sql = format!(
            "INSERT INTO terms (keyword, keyword_normalized, definition, category, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {TERM_COLUMNS}"
        );
        let result = sqlx::query_as::<_, Term>(&sql)
            .bind(&term.keyword)
            .bind(normalize_keyword(&term.keyword))
            .bind(&term.definition)
            .bind(&term.category)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(created) => {
                tracing::info!("<<< 词条已创建: id={}, keyword={}", created.id, created.keyword);
                Ok(created)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::warn!("--- 关键词重复: {}", term.keyword);
                Err(AppError::Conflict(term.keyword))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 只修改提供的字段；无论是否有字段变化都会刷新 updated_at
    pub async fn update(&self, keyword: &str, changes: TermChanges) -> AppResult<Term> {
        let (set_category, category) = match changes.category {
            Some(value) => (true, value),
            None => (false, None),
        };
        let sql = format!(
            "UPDATE terms SET \
                 definition = COALESCE(?1, definition), \
                 category = CASE WHEN ?2 THEN ?3 ELSE category END, \
                 updated_at = ?4 \
             WHERE keyword_normalized = ?5 \
             RETURNING {TERM_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Term>(&sql)
            .bind(changes.definition)
            .bind(set_category)
            .bind(category)
            .bind(Utc::now())
            .bind(normalize_keyword(keyword))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(keyword.to_string()))?;

        tracing::info!("<<< 词条已更新: id={}, keyword={}", updated.id, updated.keyword);
        Ok(updated)
    }

    /// 物理删除，返回被删除的记录
    pub async fn delete(&self, keyword: &str) -> AppResult<Term> {
        let sql = format!("DELETE FROM terms WHERE keyword_normalized = ? RETURNING {TERM_COLUMNS}");
        let deleted = sqlx::query_as::<_, Term>(&sql)
            .bind(normalize_keyword(keyword))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(keyword.to_string()))?;

        tracing::warn!("<<< 词条已删除: id={}, keyword={}", deleted.id, deleted.keyword);
        Ok(deleted)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM terms \
             WHERE category IS NOT NULL AND category <> '' \
             ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM terms")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
