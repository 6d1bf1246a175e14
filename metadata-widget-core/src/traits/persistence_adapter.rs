//! 持久化适配器抽象 Trait

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

use super::MetadataHost;
use crate::error::CoreResult;
use crate::types::FieldTarget;

/// 新增元数据的覆盖回调 `(key, value)`
pub type AddHook = Arc<dyn Fn(String, Value) -> BoxFuture<'static, CoreResult<()>> + Send + Sync>;

/// 编辑元数据的覆盖回调 `(new_key, old_key, value)`
pub type EditHook =
    Arc<dyn Fn(String, String, Value) -> BoxFuture<'static, CoreResult<()>> + Send + Sync>;

/// 持久化适配器 Trait
///
/// 元数据的唯一写入方。组件只通过此接口提交变更。
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// 新增元数据
    async fn add(&self, key: &str, value: &Value) -> CoreResult<()>;

    /// 更新元数据（`new_key` 与 `old_key` 不同时即重命名）
    async fn edit(&self, new_key: &str, old_key: &str, value: &Value) -> CoreResult<()>;

    /// 删除元数据
    async fn remove(&self, key: &str) -> CoreResult<()>;
}

/// 默认适配器：转发到宿主对象，可选地由调用方回调替换新增/编辑
#[derive(Clone)]
pub struct HostPersistence {
    host: Arc<dyn MetadataHost>,
    target: FieldTarget,
    on_added: Option<AddHook>,
    on_edited: Option<EditHook>,
}

impl HostPersistence {
    #[must_use]
    pub fn new(host: Arc<dyn MetadataHost>, target: FieldTarget) -> Self {
        Self {
            host,
            target,
            on_added: None,
            on_edited: None,
        }
    }

    /// 使用自定义回调替换 `add`
    #[must_use]
    pub fn with_add_hook(mut self, hook: Option<AddHook>) -> Self {
        self.on_added = hook;
        self
    }

    /// 使用自定义回调替换 `edit`
    #[must_use]
    pub fn with_edit_hook(mut self, hook: Option<EditHook>) -> Self {
        self.on_edited = hook;
        self
    }

    #[must_use]
    pub fn target(&self) -> &FieldTarget {
        &self.target
    }
}

#[async_trait]
impl PersistenceAdapter for HostPersistence {
    async fn add(&self, key: &str, value: &Value) -> CoreResult<()> {
        match &self.on_added {
            Some(hook) => hook(key.to_string(), value.clone()).await,
            None => self.host.add_metadata(key, value, &self.target).await,
        }
    }

    async fn edit(&self, new_key: &str, old_key: &str, value: &Value) -> CoreResult<()> {
        match &self.on_edited {
            Some(hook) => hook(new_key.to_string(), old_key.to_string(), value.clone()).await,
            None => {
                self.host
                    .edit_metadata(new_key, old_key, value, &self.target)
                    .await
            }
        }
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        self.host.remove_metadata(key, &self.target).await
    }
}
