//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::traits::{Confirmer, InMemoryMetadataHost, ItemChanged, MetadataHost, RecordingNotifier};
use crate::types::{AccessLevel, DeletePrompt, FieldTarget, MetadataMap, WidgetSettings};
use crate::widget::MetadataWidget;

// ===== MockMetadataHost =====

/// 记录的宿主调用
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Add {
        key: String,
        value: Value,
    },
    Edit {
        new_key: String,
        old_key: String,
        value: Value,
    },
    Remove {
        key: String,
    },
}

pub struct MockMetadataHost {
    inner: InMemoryMetadataHost,
    calls: RwLock<Vec<HostCall>>,
    /// 如果 Some，写入时返回此错误
    write_error: RwLock<Option<String>>,
}

impl MockMetadataHost {
    pub fn new(map: MetadataMap) -> Self {
        Self {
            inner: InMemoryMetadataHost::with_field("meta", map),
            calls: RwLock::new(Vec::new()),
            write_error: RwLock::new(None),
        }
    }

    pub async fn set_write_error(&self, err: Option<String>) {
        *self.write_error.write().await = err;
    }

    pub async fn calls(&self) -> Vec<HostCall> {
        self.calls.read().await.clone()
    }

    /// 模拟远端修改
    pub fn replace(&self, map: MetadataMap) {
        self.inner.replace_field("meta", map);
    }

    async fn record(&self, call: HostCall) -> CoreResult<()> {
        self.calls.write().await.push(call);
        match &*self.write_error.read().await {
            Some(msg) => Err(CoreError::PersistenceError(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetadataHost for MockMetadataHost {
    fn field(&self, name: &str) -> MetadataMap {
        self.inner.field(name)
    }

    async fn add_metadata(
        &self,
        key: &str,
        value: &Value,
        target: &FieldTarget,
    ) -> CoreResult<()> {
        self.record(HostCall::Add {
            key: key.to_string(),
            value: value.clone(),
        })
        .await?;
        self.inner.add_metadata(key, value, target).await
    }

    async fn edit_metadata(
        &self,
        new_key: &str,
        old_key: &str,
        value: &Value,
        target: &FieldTarget,
    ) -> CoreResult<()> {
        self.record(HostCall::Edit {
            new_key: new_key.to_string(),
            old_key: old_key.to_string(),
            value: value.clone(),
        })
        .await?;
        self.inner
            .edit_metadata(new_key, old_key, value, target)
            .await
    }

    async fn remove_metadata(&self, key: &str, target: &FieldTarget) -> CoreResult<()> {
        self.record(HostCall::Remove {
            key: key.to_string(),
        })
        .await?;
        self.inner.remove_metadata(key, target).await
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<ItemChanged> {
        self.inner.subscribe_changes()
    }
}

// ===== StaticConfirmer =====

/// 固定回答的确认器
pub struct StaticConfirmer(pub bool);

#[async_trait]
impl Confirmer for StaticConfirmer {
    async fn confirm(&self, _prompt: &DeletePrompt) -> bool {
        self.0
    }
}

// ===== 工厂方法 =====

/// 从 JSON 对象字面量构造元数据映射
pub fn metadata(value: Value) -> MetadataMap {
    match value {
        Value::Object(map) => map,
        other => panic!("metadata fixture must be an object, got {other}"),
    }
}

/// 创建测试用可写组件
pub fn create_test_widget(
    value: Value,
) -> (MetadataWidget, Arc<MockMetadataHost>, Arc<RecordingNotifier>) {
    create_test_widget_with_access(value, AccessLevel::Write)
}

/// 创建测试用组件（指定访问级别）
pub fn create_test_widget_with_access(
    value: Value,
    access_level: AccessLevel,
) -> (MetadataWidget, Arc<MockMetadataHost>, Arc<RecordingNotifier>) {
    let host = Arc::new(MockMetadataHost::new(metadata(value)));
    let notifier = Arc::new(RecordingNotifier::new());
    let settings = WidgetSettings {
        access_level,
        ..WidgetSettings::default()
    };

    let widget = MetadataWidget::builder()
        .host(host.clone())
        .notifier(notifier.clone())
        .settings(settings)
        .build()
        .unwrap();

    (widget, host, notifier)
}
