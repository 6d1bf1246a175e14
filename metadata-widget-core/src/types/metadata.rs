//! 元数据相关类型定义

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 元数据映射（键区分大小写，值为字符串或任意 JSON 结构）
pub type MetadataMap = serde_json::Map<String, Value>;

/// 访问级别
///
/// 数值与宿主端的访问类型一致：`-1 / 0 / 1 / 2 / 100`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum AccessLevel {
    /// 无权限
    None,
    /// 只读
    #[default]
    Read,
    /// 可写
    Write,
    /// 管理员
    Admin,
    /// 站点管理员
    SiteAdmin,
}

impl AccessLevel {
    /// 是否显示添加/编辑/删除入口
    #[must_use]
    pub fn can_edit(self) -> bool {
        self >= Self::Write
    }
}

impl From<AccessLevel> for i32 {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::None => -1,
            AccessLevel::Read => 0,
            AccessLevel::Write => 1,
            AccessLevel::Admin => 2,
            AccessLevel::SiteAdmin => 100,
        }
    }
}

impl TryFrom<i32> for AccessLevel {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::None),
            0 => Ok(Self::Read),
            1 => Ok(Self::Write),
            2 => Ok(Self::Admin),
            100 => Ok(Self::SiteAdmin),
            other => Err(format!("Unknown access level: {other}")),
        }
    }
}

/// 持久化路由目标（字段名 + 可选 API 路径）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTarget {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FieldTarget {
    #[must_use]
    pub fn new(field: impl Into<String>, path: Option<String>) -> Self {
        Self {
            field: field.into(),
            path,
        }
    }
}
