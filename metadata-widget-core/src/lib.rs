//! Metadata Widget Core Library
//!
//! Headless model of a key/value metadata editor attached to a host item:
//! - Value codecs for simple (string) and JSON values
//! - Per-row edit sessions with mode toggling and validated saves
//! - A list widget that renders, adds, saves, cancels and deletes rows
//!
//! The host item, persistence, notifications and delete confirmation are
//! abstracted through traits, so any frontend can drive the same state machine.

pub mod codec;
pub mod error;
pub mod traits;
pub mod types;
pub mod utils;
pub mod widget;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use codec::Mode;
pub use error::{CoreError, CoreResult};
pub use traits::{Confirmer, MetadataHost, Notifier, PersistenceAdapter};
pub use widget::{MetadataWidget, MetadataWidgetBuilder};
