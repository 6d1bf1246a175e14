//! Metadata list widget
//!
//! [`MetadataWidget`] owns the rows of one item's metadata field. Each
//! [`RowController`] owns at most one [`EditorState`]. Collaborators (host,
//! persistence, notifier, confirmer) are passed down, never reached back up to.

mod editor;
mod row;

pub use editor::{CancelOutcome, EditorOverrides, EditorState, SaveRequest, KEY_REQUIRED};
pub use row::{PendingOp, RowController};

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::codec::Mode;
use crate::error::{CoreError, CoreResult};
use crate::traits::{
    AddHook, Confirmer, EditHook, HostPersistence, ItemChanged, LogNotifier, MetadataHost,
    Notifier, PersistenceAdapter,
};
use crate::types::{DeletePrompt, RowId, WidgetSettings, WidgetView};
use crate::utils::locale;

/// Handle for a save whose adapter call is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    row: RowId,
    mode: Mode,
    request: SaveRequest,
}

impl SaveTicket {
    #[must_use]
    pub fn row(&self) -> RowId {
        self.row
    }

    #[must_use]
    pub fn request(&self) -> &SaveRequest {
        &self.request
    }

    /// Runs the adapter call; feed the result to [`MetadataWidget::finish_save`].
    pub async fn dispatch(&self, adapter: &dyn PersistenceAdapter) -> CoreResult<()> {
        self.request.dispatch(adapter).await
    }
}

/// Handle for a confirmed delete whose adapter call is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTicket {
    row: RowId,
    key: String,
}

impl DeleteTicket {
    #[must_use]
    pub fn row(&self) -> RowId {
        self.row
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Runs the adapter call; feed the result to [`MetadataWidget::finish_delete`].
    pub async fn dispatch(&self, adapter: &dyn PersistenceAdapter) -> CoreResult<()> {
        adapter.remove(&self.key).await
    }
}

/// Metadata list widget
pub struct MetadataWidget {
    host: Arc<dyn MetadataHost>,
    adapter: Arc<dyn PersistenceAdapter>,
    notifier: Arc<dyn Notifier>,
    settings: WidgetSettings,
    on_added: Option<AddHook>,
    on_edited: Option<EditHook>,
    changes: broadcast::Receiver<ItemChanged>,
    rows: Vec<RowController>,
    next_id: u64,
}

impl MetadataWidget {
    #[must_use]
    pub fn builder() -> MetadataWidgetBuilder {
        MetadataWidgetBuilder::new()
    }

    #[must_use]
    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    /// Adapter saves and deletes go through; use it to dispatch tickets.
    #[must_use]
    pub fn adapter(&self) -> Arc<dyn PersistenceAdapter> {
        self.adapter.clone()
    }

    #[must_use]
    pub fn rows(&self) -> &[RowController] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&RowController> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// First row currently showing `key`.
    #[must_use]
    pub fn row_by_key(&self, key: &str) -> Option<&RowController> {
        self.rows.iter().find(|row| row.key() == key)
    }

    /// Whether add/edit/delete affordances are shown.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.settings.access_level.can_edit()
    }

    /// Points the widget at another item and re-renders.
    pub fn set_host(&mut self, host: Arc<dyn MetadataHost>) {
        self.changes = host.subscribe_changes();
        self.adapter = build_adapter(
            host.clone(),
            &self.settings,
            self.on_added.clone(),
            self.on_edited.clone(),
        );
        self.host = host;
        self.render();
    }

    /// Rebuilds every row from the host's current map, sorted by key.
    ///
    /// Uncommitted rows and open editors are discarded; outstanding tickets go stale.
    pub fn render(&mut self) {
        let map = self.host.field(&self.settings.field_name);
        let mut keys: Vec<String> = map.keys().cloned().collect();
        locale::sort_keys(&mut keys);

        let mut rows = Vec::with_capacity(keys.len());
        for key in keys {
            let value = map.get(&key).cloned().unwrap_or_default();
            let id = self.allocate_id();
            rows.push(RowController::derived(id, key, value));
        }
        self.rows = rows;
        log::debug!(
            "Rendered {} metadata rows for field '{}'",
            self.rows.len(),
            self.settings.field_name
        );
    }

    /// Re-renders if the host reported changes since the last call.
    ///
    /// Returns whether a render happened. Bursts of notifications collapse into one render.
    pub fn poll_changes(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(ItemChanged) => changed = true,
                Err(TryRecvError::Lagged(skipped)) => {
                    log::debug!("Missed {skipped} change notifications, re-rendering");
                    changed = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.render();
        }
        changed
    }

    /// Appends a new row already editing in `mode`.
    pub fn add_new(&mut self, mode: Mode) -> CoreResult<RowId> {
        self.ensure_editable()?;
        let id = self.allocate_id();
        self.rows.push(RowController::new_entry(id, mode));
        log::debug!("Added new {mode} metadatum row {id}");
        Ok(id)
    }

    /// Opens a row for editing; `mode` defaults to the row's current mode.
    pub fn open(&mut self, id: RowId, mode: Option<Mode>) -> CoreResult<()> {
        self.ensure_editable()?;
        let result = self.row_mut(id)?.open(mode);
        self.surface(result)
    }

    /// Live editor of a row, for feeding control input.
    pub fn editor_mut(&mut self, id: RowId) -> CoreResult<&mut EditorState> {
        self.row_mut(id)?.editor_mut()
    }

    /// Switches a row's editor to `target`; refused conversions leave it as it was.
    pub fn toggle(
        &mut self,
        id: RowId,
        target: Mode,
        overrides: Option<EditorOverrides>,
    ) -> CoreResult<()> {
        let result = self.row_mut(id)?.toggle(target, overrides);
        self.surface(result)
    }

    /// Validates a row's editor and marks it busy.
    pub fn begin_save(&mut self, id: RowId) -> CoreResult<SaveTicket> {
        let result = self.row_mut(id)?.begin_save();
        let (mode, request) = self.surface(result)?;
        Ok(SaveTicket {
            row: id,
            mode,
            request,
        })
    }

    /// Applies a save result. Tickets for rows that no longer exist are ignored.
    pub fn finish_save(&mut self, ticket: SaveTicket, result: CoreResult<()>) -> CoreResult<()> {
        let Some(row) = self.rows.iter_mut().find(|row| row.id() == ticket.row) else {
            log::debug!("Ignoring save result for discarded row {}", ticket.row);
            return Ok(());
        };

        let key = ticket.request.key().to_string();
        match row.finish_save(ticket.mode, ticket.request, result) {
            Ok(()) => {
                log::debug!("Saved metadatum '{key}'");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save metadatum '{key}': {e}");
                self.notifier.error(&persistence_message(&e));
                Err(e)
            }
        }
    }

    /// Saves a row through the adapter in one step.
    pub async fn save(&mut self, id: RowId) -> CoreResult<()> {
        let ticket = self.begin_save(id)?;
        let result = ticket.dispatch(self.adapter.as_ref()).await;
        self.finish_save(ticket, result)
    }

    /// Ends a row's edit session; new rows leave the list.
    pub fn cancel(&mut self, id: RowId) -> CoreResult<CancelOutcome> {
        let result = self.row_mut(id)?.cancel();
        let outcome = self.surface(result)?;
        if outcome == CancelOutcome::RemoveRow {
            self.rows.retain(|row| row.id() != id);
        }
        Ok(outcome)
    }

    /// Prompt to show before deleting a row.
    pub fn delete_prompt(&self, id: RowId) -> CoreResult<DeletePrompt> {
        let row = self.row(id).ok_or(CoreError::RowNotFound(id.0))?;
        Ok(DeletePrompt::for_key(row.key()))
    }

    /// Marks a row busy for a confirmed delete.
    pub fn begin_delete(&mut self, id: RowId) -> CoreResult<DeleteTicket> {
        self.ensure_editable()?;
        let result = self.row_mut(id)?.begin_delete();
        let key = self.surface(result)?;
        Ok(DeleteTicket { row: id, key })
    }

    /// Applies a delete result: the row leaves on success and stays intact on failure.
    pub fn finish_delete(
        &mut self,
        ticket: DeleteTicket,
        result: CoreResult<()>,
    ) -> CoreResult<()> {
        let Some(row) = self.rows.iter_mut().find(|row| row.id() == ticket.row) else {
            log::debug!("Ignoring delete result for discarded row {}", ticket.row);
            return Ok(());
        };

        match row.finish_delete(result) {
            Ok(()) => {
                self.rows.retain(|row| row.id() != ticket.row);
                log::debug!("Deleted metadatum '{}'", ticket.key);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to delete metadatum '{}': {e}", ticket.key);
                self.notifier.error(&persistence_message(&e));
                Err(e)
            }
        }
    }

    /// Asks for confirmation, then deletes. Returns `false` when the user declined.
    pub async fn delete(&mut self, id: RowId, confirmer: &dyn Confirmer) -> CoreResult<bool> {
        self.ensure_editable()?;
        let prompt = self.delete_prompt(id)?;
        if !confirmer.confirm(&prompt).await {
            log::debug!("Delete of metadatum '{}' declined", prompt.key);
            return Ok(false);
        }

        let ticket = self.begin_delete(id)?;
        let result = ticket.dispatch(self.adapter.as_ref()).await;
        self.finish_delete(ticket, result)?;
        Ok(true)
    }

    /// Snapshot for the presentation layer.
    #[must_use]
    pub fn view(&self) -> WidgetView {
        WidgetView {
            title: self.settings.title.clone(),
            editable: self.is_editable(),
            rows: self.rows.iter().map(RowController::view).collect(),
        }
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    fn row_mut(&mut self, id: RowId) -> CoreResult<&mut RowController> {
        self.rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(CoreError::RowNotFound(id.0))
    }

    fn ensure_editable(&self) -> CoreResult<()> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(CoreError::ReadOnly)
        }
    }

    /// Shows user-facing failures as warnings and passes the result through.
    fn surface<T>(&self, result: CoreResult<T>) -> CoreResult<T> {
        if let Err(e) = &result {
            match e {
                CoreError::ValidationError(msg) | CoreError::ConversionRejected(msg) => {
                    self.notifier.warn(msg);
                }
                CoreError::RowBusy(_) => self.notifier.warn(&e.to_string()),
                _ if e.is_expected() => log::warn!("Metadata widget: {e}"),
                _ => log::error!("Metadata widget: {e}"),
            }
        }
        result
    }
}

/// Message shown for an adapter failure.
fn persistence_message(e: &CoreError) -> String {
    match e {
        CoreError::PersistenceError(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn build_adapter(
    host: Arc<dyn MetadataHost>,
    settings: &WidgetSettings,
    on_added: Option<AddHook>,
    on_edited: Option<EditHook>,
) -> Arc<dyn PersistenceAdapter> {
    Arc::new(
        HostPersistence::new(host, settings.target())
            .with_add_hook(on_added)
            .with_edit_hook(on_edited),
    )
}

/// Builder for [`MetadataWidget`].
pub struct MetadataWidgetBuilder {
    host: Option<Arc<dyn MetadataHost>>,
    settings: WidgetSettings,
    notifier: Option<Arc<dyn Notifier>>,
    on_added: Option<AddHook>,
    on_edited: Option<EditHook>,
}

impl MetadataWidgetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: None,
            settings: WidgetSettings::default(),
            notifier: None,
            on_added: None,
            on_edited: None,
        }
    }

    #[must_use]
    pub fn host(mut self, host: Arc<dyn MetadataHost>) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: WidgetSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replaces the host's `add_metadata` for new rows.
    #[must_use]
    pub fn on_metadata_added(mut self, hook: AddHook) -> Self {
        self.on_added = Some(hook);
        self
    }

    /// Replaces the host's `edit_metadata` for existing rows.
    #[must_use]
    pub fn on_metadata_edited(mut self, hook: EditHook) -> Self {
        self.on_edited = Some(hook);
        self
    }

    /// Build the widget and perform the first render.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if no host was supplied.
    pub fn build(self) -> CoreResult<MetadataWidget> {
        let host = self
            .host
            .ok_or_else(|| CoreError::ValidationError("MetadataHost is required".to_string()))?;
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));
        let adapter = build_adapter(
            host.clone(),
            &self.settings,
            self.on_added.clone(),
            self.on_edited.clone(),
        );

        let mut widget = MetadataWidget {
            changes: host.subscribe_changes(),
            host,
            adapter,
            notifier,
            settings: self.settings,
            on_added: self.on_added,
            on_edited: self.on_edited,
            rows: Vec::new(),
            next_id: 0,
        };
        widget.render();
        Ok(widget)
    }
}

impl Default for MetadataWidgetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
