//! Host item abstraction Trait

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

use crate::error::CoreResult;
use crate::types::{FieldTarget, MetadataMap};

/// Change notification fired after any successful mutation of the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemChanged;

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Host item trait
///
/// The item owns its metadata fields; the widget only reads them through
/// `field` and writes through the three `*_metadata` calls.
#[async_trait]
pub trait MetadataHost: Send + Sync {
    /// Current contents of a metadata field (empty when the field is absent)
    fn field(&self, name: &str) -> MetadataMap;

    /// Create a metadatum
    ///
    /// # Arguments
    /// * `key` - New key
    /// * `value` - Value to store
    /// * `target` - Field name and optional API path override
    async fn add_metadata(
        &self,
        key: &str,
        value: &Value,
        target: &FieldTarget,
    ) -> CoreResult<()>;

    /// Update a metadatum, renaming it when `new_key` differs from `old_key`
    async fn edit_metadata(
        &self,
        new_key: &str,
        old_key: &str,
        value: &Value,
        target: &FieldTarget,
    ) -> CoreResult<()>;

    /// Delete a metadatum
    async fn remove_metadata(&self, key: &str, target: &FieldTarget) -> CoreResult<()>;

    /// Subscribe to change notifications
    fn subscribe_changes(&self) -> broadcast::Receiver<ItemChanged>;
}

/// In-memory host item
///
/// Keeps every field in memory and broadcasts `ItemChanged` after each write.
/// Suitable for previews, local-only editing and tests.
#[derive(Clone)]
pub struct InMemoryMetadataHost {
    fields: Arc<RwLock<HashMap<String, MetadataMap>>>,
    changes: broadcast::Sender<ItemChanged>,
}

impl InMemoryMetadataHost {
    /// Create an empty host
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            fields: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    /// Create a host with one pre-populated field
    #[must_use]
    pub fn with_field(name: &str, map: MetadataMap) -> Self {
        let host = Self::new();
        host.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), map);
        host
    }

    /// Replace a field wholesale and notify subscribers (simulates a remote change)
    pub fn replace_field(&self, name: &str, map: MetadataMap) {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), map);
        self.notify();
    }

    fn mutate(&self, target: &FieldTarget, apply: impl FnOnce(&mut MetadataMap)) {
        {
            let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
            apply(fields.entry(target.field.clone()).or_default());
        }
        self.notify();
    }

    fn notify(&self) {
        // 没有订阅者时发送失败，忽略即可
        let _ = self.changes.send(ItemChanged);
    }
}

impl Default for InMemoryMetadataHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataHost for InMemoryMetadataHost {
    fn field(&self, name: &str) -> MetadataMap {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    async fn add_metadata(
        &self,
        key: &str,
        value: &Value,
        target: &FieldTarget,
    ) -> CoreResult<()> {
        self.mutate(target, |map| {
            map.insert(key.to_string(), value.clone());
        });
        Ok(())
    }

    async fn edit_metadata(
        &self,
        new_key: &str,
        old_key: &str,
        value: &Value,
        target: &FieldTarget,
    ) -> CoreResult<()> {
        self.mutate(target, |map| {
            if new_key != old_key {
                map.remove(old_key);
            }
            map.insert(new_key.to_string(), value.clone());
        });
        Ok(())
    }

    async fn remove_metadata(&self, key: &str, target: &FieldTarget) -> CoreResult<()> {
        self.mutate(target, |map| {
            map.remove(key);
        });
        Ok(())
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<ItemChanged> {
        self.changes.subscribe()
    }
}
