//! Delete confirmation capability

use async_trait::async_trait;

use crate::types::DeletePrompt;

/// Confirmer trait
///
/// Presents the delete prompt (a modal dialog, a terminal question, ...) and
/// resolves to whether the user accepted.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: &DeletePrompt) -> bool;
}
