use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Term {
    pub id: i64,
    pub keyword: String,
    pub definition: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>, // 首次更新前为 NULL
}

/// POST /terms 请求体
#[derive(Debug, Deserialize)]
pub struct CreateTermRequest {
    pub keyword: String,
    pub definition: String,
    pub category: Option<String>,
}

/// PUT /terms/{keyword} 请求体，只有出现的字段会被修改
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTermRequest {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub definition: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub category: Option<Option<String>>,
}

/// 区分 `"field": null`（Some(None)）与字段缺失（None）
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 校验通过、可以直接入库的新词条
#[derive(Debug, Clone, PartialEq)]
pub struct NewTerm {
    pub keyword: String,
    pub definition: String,
    pub category: Option<String>,
}

/// 校验通过的部分更新。`category: Some(None)` 表示清空分类。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermChanges {
    pub definition: Option<String>,
    pub category: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListTermsQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub category: Option<String>,
}

fn default_limit() -> u32 {
    100
}

impl ListTermsQuery {
    /// `?category=` 为空时视为不过滤
    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteTermResponse {
    pub message: String,
    pub deleted_term: Term,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}
