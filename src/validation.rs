use serde::Serialize;
use std::fmt;

use crate::models::term::{CreateTermRequest, NewTerm, TermChanges, UpdateTermRequest};

pub const KEYWORD_MAX_CHARS: usize = 200;
pub const DEFINITION_MIN_CHARS: usize = 10;
pub const CATEGORY_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// 一次校验中收集到的全部字段错误
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// 只有一个字段出错时的快捷构造
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError { field, message: message.into() });
    }

    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        f.write_str(&parts.join("; "))
    }
}

/// 用于唯一索引和查询的关键词形式：去空白 + Unicode 完整大小写折叠
/// （ß 与 SS、词尾 ς 与 σ 视为相同）
pub fn normalize_keyword(keyword: &str) -> String {
    caseless::default_case_fold_str(keyword.trim())
}

fn check_keyword(raw: &str, errors: &mut ValidationErrors) -> String {
    let keyword = raw.trim();
    let len = keyword.chars().count();
    if len == 0 {
        errors.push("keyword", "Ключевое слово не может быть пустым");
    } else if len > KEYWORD_MAX_CHARS {
        errors.push(
            "keyword",
            format!("Ключевое слово не может быть длиннее {KEYWORD_MAX_CHARS} символов"),
        );
    }
    keyword.to_string()
}

fn check_definition(raw: &str, errors: &mut ValidationErrors) -> String {
    let definition = raw.trim();
    let len = definition.chars().count();
    if len == 0 {
        errors.push("definition", "Определение не может быть пустым");
    } else if len < DEFINITION_MIN_CHARS {
        errors.push(
            "definition",
            format!("Определение должно содержать не менее {DEFINITION_MIN_CHARS} символов"),
        );
    }
    definition.to_string()
}

// 空字符串的分类按"未提供"处理
fn check_category(raw: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    let category = raw.map(str::trim).filter(|c| !c.is_empty())?;
    if category.chars().count() > CATEGORY_MAX_CHARS {
        errors.push(
            "category",
            format!("Категория не может быть длиннее {CATEGORY_MAX_CHARS} символов"),
        );
    }
    Some(category.to_string())
}

impl CreateTermRequest {
    pub fn validate(self) -> Result<NewTerm, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let keyword = check_keyword(&self.keyword, &mut errors);
        let definition = check_definition(&self.definition, &mut errors);
        let category = check_category(self.category.as_deref(), &mut errors);

        if errors.is_empty() {
            Ok(NewTerm { keyword, definition, category })
        } else {
            Err(errors)
        }
    }
}

impl UpdateTermRequest {
    pub fn validate(self) -> Result<TermChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let definition = match self.definition {
            None => None,
            Some(None) => {
                errors.push("definition", "Определение не может быть пустым");
                None
            }
            Some(Some(raw)) => Some(check_definition(&raw, &mut errors)),
        };
        let category = self
            .category
            .map(|value| check_category(value.as_deref(), &mut errors));

        if errors.is_empty() {
            Ok(TermChanges { definition, category })
        } else {
            Err(errors)
        }
    }
}
