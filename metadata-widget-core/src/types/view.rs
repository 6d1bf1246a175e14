//! 展示层快照类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::Mode;

/// 行标识（同一组件内唯一，重新渲染后旧 ID 全部失效）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 单行快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RowView {
    /// 只读展示
    #[serde(rename_all = "camelCase")]
    Display {
        id: RowId,
        key: String,
        mode: Mode,
        value: String,
    },
    /// 编辑中
    #[serde(rename_all = "camelCase")]
    Editing {
        id: RowId,
        key_input: String,
        value_input: String,
        mode: Mode,
        is_new: bool,
        /// 保存/删除请求进行中（对应控件应禁用）
        busy: bool,
    },
}

impl RowView {
    #[must_use]
    pub fn id(&self) -> RowId {
        match self {
            Self::Display { id, .. } | Self::Editing { id, .. } => *id,
        }
    }
}

/// 组件快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub title: String,
    /// 是否显示添加/编辑/删除入口
    pub editable: bool,
    pub rows: Vec<RowView>,
}

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Danger,
}

/// 一条用户通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    #[must_use]
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            raised_at: Utc::now(),
        }
    }
}

/// 删除确认提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePrompt {
    pub key: String,
    pub text: String,
    pub yes_text: String,
}

impl DeletePrompt {
    #[must_use]
    pub fn for_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            text: format!("Are you sure you want to delete the metadatum {key}?"),
            yes_text: "Delete".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_view_is_tagged_by_state() {
        let row = RowView::Display {
            id: RowId(3),
            key: "x".to_string(),
            mode: Mode::Simple,
            value: "1".to_string(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["state"], "display");
        assert_eq!(json["id"], 3);
        assert_eq!(json["mode"], "simple");
    }

    #[test]
    fn delete_prompt_names_the_key() {
        let prompt = DeletePrompt::for_key("color");
        assert_eq!(prompt.text, "Are you sure you want to delete the metadatum color?");
        assert_eq!(prompt.yes_text, "Delete");
    }
}
