//! One metadatum row: display state plus an optional edit session.

use serde_json::Value;

use super::editor::{CancelOutcome, EditorOverrides, EditorState, SaveRequest};
use crate::codec::Mode;
use crate::error::{CoreError, CoreResult};
use crate::types::{RowId, RowView};

/// Adapter call in flight for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    Save,
    Delete,
}

/// Row controller
///
/// Shows either the display view or the edit view of one key. Holds at most
/// one [`EditorState`] and at most one in-flight adapter call.
#[derive(Debug, Clone)]
pub struct RowController {
    id: RowId,
    key: String,
    value: Value,
    mode: Mode,
    editor: Option<EditorState>,
    pending: Option<PendingOp>,
}

impl RowController {
    /// Row for a stored entry, in the given mode.
    #[must_use]
    pub fn new(id: RowId, key: impl Into<String>, value: Value, mode: Mode) -> Self {
        Self {
            id,
            key: key.into(),
            value,
            mode,
            editor: None,
            pending: None,
        }
    }

    /// Row for a stored entry, with the mode derived from the value.
    #[must_use]
    pub fn derived(id: RowId, key: impl Into<String>, value: Value) -> Self {
        let mode = Mode::from_value(&value);
        Self::new(id, key, value, mode)
    }

    /// Row from a mode name; unknown names are a contract violation.
    pub fn with_mode_name(
        id: RowId,
        key: impl Into<String>,
        value: Value,
        mode: &str,
    ) -> CoreResult<Self> {
        Ok(Self::new(id, key, value, mode.parse()?))
    }

    /// Uncommitted row, already editing, with an empty key and the mode's empty value.
    #[must_use]
    pub fn new_entry(id: RowId, mode: Mode) -> Self {
        let value = mode.empty_value();
        let editor = EditorState::open("", &value, mode, true);
        Self {
            id,
            key: String::new(),
            value,
            mode,
            editor: Some(editor),
            pending: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Text of the display view.
    #[must_use]
    pub fn display_value(&self) -> String {
        self.mode.display(&self.value)
    }

    #[must_use]
    pub fn editor(&self) -> Option<&EditorState> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> CoreResult<&mut EditorState> {
        self.ensure_idle()?;
        let key = self.key.clone();
        self.editor
            .as_mut()
            .ok_or_else(|| CoreError::InvalidState(format!("metadatum '{key}' is not being edited")))
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Whether the row has never been committed.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.editor.as_ref().is_some_and(EditorState::is_new)
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingOp> {
        self.pending
    }

    /// Starts (or restarts) the edit session, in `mode` or the row's current mode.
    pub fn open(&mut self, mode: Option<Mode>) -> CoreResult<()> {
        self.ensure_idle()?;
        let mode = mode.unwrap_or(self.mode);
        let is_new = self.is_new();
        self.editor = Some(EditorState::open(&self.key, &self.value, mode, is_new));
        log::debug!("Opened metadatum '{}' for editing in {mode} mode", self.key);
        Ok(())
    }

    /// Swaps the editor for one in `target`, keeping the control values.
    pub fn toggle(&mut self, target: Mode, overrides: Option<EditorOverrides>) -> CoreResult<()> {
        let editor = self.editor_mut()?;
        let toggled = editor.toggled(target, overrides)?;
        *editor = toggled;
        log::debug!("Toggled metadatum '{}' editor to {target} mode", self.key);
        Ok(())
    }

    /// Validates the editor and marks the row busy; returns the call to dispatch.
    pub fn begin_save(&mut self) -> CoreResult<(Mode, SaveRequest)> {
        let editor = self.editor_mut()?;
        let mode = editor.mode();
        let request = editor.save_request()?;
        self.pending = Some(PendingOp::Save);
        Ok((mode, request))
    }

    /// Applies the adapter's answer to a save started with [`Self::begin_save`].
    ///
    /// On failure the editor stays open with its controls untouched.
    pub fn finish_save(
        &mut self,
        mode: Mode,
        request: SaveRequest,
        result: CoreResult<()>,
    ) -> CoreResult<()> {
        self.pending = None;
        result?;

        self.value = request.value().clone();
        self.key = request.key().to_string();
        self.mode = mode;
        self.editor = None;
        Ok(())
    }

    /// Ends the edit session without saving.
    pub fn cancel(&mut self) -> CoreResult<CancelOutcome> {
        let outcome = self.editor_mut()?.cancel();
        if outcome == CancelOutcome::Restored {
            self.editor = None;
        }
        Ok(outcome)
    }

    /// Marks the row busy for a delete; returns the stored key to remove.
    pub fn begin_delete(&mut self) -> CoreResult<String> {
        self.ensure_idle()?;
        if self.is_new() {
            return Err(CoreError::InvalidState(
                "an uncommitted metadatum cannot be deleted".to_string(),
            ));
        }
        self.pending = Some(PendingOp::Delete);
        Ok(self.key.clone())
    }

    /// Clears the busy mark after a delete; the caller drops the row on success.
    pub fn finish_delete(&mut self, result: CoreResult<()>) -> CoreResult<()> {
        self.pending = None;
        result
    }

    #[must_use]
    pub fn view(&self) -> RowView {
        match &self.editor {
            None => RowView::Display {
                id: self.id,
                key: self.key.clone(),
                mode: self.mode,
                value: self.display_value(),
            },
            Some(editor) => RowView::Editing {
                id: self.id,
                key_input: editor.key_input().to_string(),
                value_input: editor.value_input().to_string(),
                mode: editor.mode(),
                is_new: editor.is_new(),
                busy: self.pending.is_some(),
            },
        }
    }

    fn ensure_idle(&self) -> CoreResult<()> {
        match self.pending {
            Some(_) => Err(CoreError::RowBusy(self.key.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(key: &str, value: Value) -> RowController {
        RowController::derived(RowId(1), key, value)
    }

    #[test]
    fn unknown_mode_name_fails_fast() {
        let err = RowController::with_mode_name(RowId(1), "k", json!("v"), "xml").unwrap_err();
        assert_eq!(err, CoreError::UnsupportedMode("xml".to_string()));
    }

    #[test]
    fn reopening_replaces_the_session() {
        let mut row = row("k", json!("v"));
        row.open(None).unwrap();
        row.editor_mut().unwrap().set_value_input("changed");

        row.open(None).unwrap();
        assert_eq!(row.editor().unwrap().value_input(), "v");
    }

    #[test]
    fn open_in_explicit_mode() {
        let mut row = row("k", json!("[1]"));
        row.open(Some(Mode::Json)).unwrap();
        let editor = row.editor().unwrap();
        assert_eq!(editor.mode(), Mode::Json);
        assert_eq!(editor.value().unwrap(), json!([1]));
    }

    #[test]
    fn successful_save_updates_display() {
        let mut row = row("k", json!("v"));
        row.open(None).unwrap();
        row.toggle(Mode::Json, Some(EditorOverrides {
            key: None,
            value: Some("{\"n\": 2}".to_string()),
        }))
        .unwrap();

        let (mode, request) = row.begin_save().unwrap();
        assert_eq!(row.pending(), Some(PendingOp::Save));
        row.finish_save(mode, request, Ok(())).unwrap();

        assert!(!row.is_editing());
        assert_eq!(row.mode(), Mode::Json);
        assert_eq!(row.value(), &json!({"n": 2}));
        assert_eq!(row.pending(), None);
    }

    #[test]
    fn failed_save_keeps_editor_open() {
        let mut row = row("k", json!("v"));
        row.open(None).unwrap();
        row.editor_mut().unwrap().set_value_input("draft");

        let (mode, request) = row.begin_save().unwrap();
        let err = row
            .finish_save(mode, request, Err(CoreError::PersistenceError("nope".into())))
            .unwrap_err();

        assert_eq!(err, CoreError::PersistenceError("nope".into()));
        assert_eq!(row.editor().unwrap().value_input(), "draft");
        assert_eq!(row.value(), &json!("v"));
    }

    #[test]
    fn busy_row_refuses_everything() {
        let mut row = row("k", json!("v"));
        row.open(None).unwrap();
        let _ticket = row.begin_save().unwrap();

        assert_eq!(row.begin_save().unwrap_err(), CoreError::RowBusy("k".into()));
        assert_eq!(row.cancel().unwrap_err(), CoreError::RowBusy("k".into()));
        assert_eq!(row.begin_delete().unwrap_err(), CoreError::RowBusy("k".into()));
        assert!(matches!(row.view(), RowView::Editing { busy: true, .. }));
    }

    #[test]
    fn new_entries_cannot_be_deleted() {
        let mut row = RowController::new_entry(RowId(9), Mode::Json);
        assert!(row.is_new());
        assert!(matches!(row.begin_delete(), Err(CoreError::InvalidState(_))));
        assert_eq!(row.editor().unwrap().value_input(), "{}");
    }

    #[test]
    fn cancel_restores_display() {
        let mut row = row("y", json!({"n": 2}));
        let before = row.view();
        row.open(None).unwrap();
        row.editor_mut().unwrap().set_value_input("[]");

        assert_eq!(row.cancel().unwrap(), CancelOutcome::Restored);
        assert_eq!(row.view(), before);
    }
}
