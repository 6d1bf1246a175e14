//! 组件配置

use serde::{Deserialize, Serialize};

use super::{AccessLevel, FieldTarget};

/// 默认字段名
fn default_field_name() -> String {
    "meta".to_string()
}

/// 默认标题
fn default_title() -> String {
    "Metadata".to_string()
}

/// 元数据组件配置（可序列化部分）
///
/// 覆盖回调（`on_metadata_added` / `on_metadata_edited`）不可序列化，
/// 通过 `MetadataWidgetBuilder` 注入。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    /// 要展示/编辑的模型属性名
    #[serde(default = "default_field_name")]
    pub field_name: String,

    /// 组件标题
    #[serde(default = "default_title")]
    pub title: String,

    /// 持久化路由覆盖（为空时使用宿主默认路径）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,

    /// 访问级别（低于 Write 时只读）
    #[serde(default)]
    pub access_level: AccessLevel,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            field_name: default_field_name(),
            title: default_title(),
            api_path: None,
            access_level: AccessLevel::default(),
        }
    }
}

impl WidgetSettings {
    /// 持久化调用使用的路由目标
    #[must_use]
    pub fn target(&self) -> FieldTarget {
        FieldTarget::new(self.field_name.clone(), self.api_path.clone())
    }
}
