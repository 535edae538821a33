use serde::{Deserialize, Serialize};
use std::fmt;

/// クライアントが指定する Todo の識別子（主キー）
///
/// 形式の検証は行わない。作成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// タスクレコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub item: String,
    pub completed: bool,
    pub responsible: String,
}

impl Todo {
    /// 未完了・担当者なしの Todo を作成
    pub fn new(id: impl Into<TodoId>, item: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item: item.into(),
            completed: false,
            responsible: String::new(),
        }
    }
}
