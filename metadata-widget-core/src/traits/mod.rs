//! Collaborator abstraction trait definitions

mod confirmer;
mod metadata_host;
mod notifier;
mod persistence_adapter;

pub use confirmer::Confirmer;
pub use metadata_host::{InMemoryMetadataHost, ItemChanged, MetadataHost};
pub use notifier::{LogNotifier, Notifier, RecordingNotifier};
pub use persistence_adapter::{AddHook, EditHook, HostPersistence, PersistenceAdapter};
