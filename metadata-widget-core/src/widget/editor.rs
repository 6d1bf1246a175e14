//! Edit session for a single metadatum.

use serde_json::Value;

use crate::codec::{check_conversion, Mode};
use crate::error::{CoreError, CoreResult};
use crate::traits::PersistenceAdapter;

/// Warning shown when a new row is saved without a key.
pub const KEY_REQUIRED: &str = "A key is required for all metadata.";

/// Pending control values pushed together with a toggle.
///
/// Anything set here wins over what the editor currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOverrides {
    pub key: Option<String>,
    pub value: Option<String>,
}

/// What a save dispatches to the persistence adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Add {
        key: String,
        value: Value,
    },
    Edit {
        new_key: String,
        old_key: String,
        value: Value,
    },
}

impl SaveRequest {
    /// Key the row will carry once the save lands.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Add { key, .. } => key,
            Self::Edit { new_key, .. } => new_key,
        }
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Add { value, .. } | Self::Edit { value, .. } => value,
        }
    }

    pub async fn dispatch(&self, adapter: &dyn PersistenceAdapter) -> CoreResult<()> {
        match self {
            Self::Add { key, value } => adapter.add(key, value).await,
            Self::Edit {
                new_key,
                old_key,
                value,
            } => adapter.edit(new_key, old_key, value).await,
        }
    }
}

/// Result of cancelling an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The row was never committed and must leave the list.
    RemoveRow,
    /// The prior display state is shown again.
    Restored,
}

/// Live state of one editor: the key and value controls plus the mode they are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    original_key: String,
    key_input: String,
    value_input: String,
    mode: Mode,
    is_new: bool,
}

impl EditorState {
    /// Opens an editor in `mode` seeded with `{key, value}`.
    #[must_use]
    pub fn open(key: &str, value: &Value, mode: Mode, is_new: bool) -> Self {
        let editable = mode.to_editable(value);
        Self {
            original_key: key.to_string(),
            key_input: key.to_string(),
            value_input: mode.editor_text(&editable),
            mode,
            is_new,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Key the session started with (empty for new rows).
    #[must_use]
    pub fn original_key(&self) -> &str {
        &self.original_key
    }

    #[must_use]
    pub fn key_input(&self) -> &str {
        &self.key_input
    }

    #[must_use]
    pub fn value_input(&self) -> &str {
        &self.value_input
    }

    pub fn set_key_input(&mut self, key: impl Into<String>) {
        self.key_input = key.into();
    }

    pub fn set_value_input(&mut self, text: impl Into<String>) {
        self.value_input = text.into();
    }

    /// Value currently in the control, parsed according to the mode.
    pub fn value(&self) -> CoreResult<Value> {
        self.mode.read_editor(&self.value_input)
    }

    /// Builds the editor for `target`, carrying the current control values across.
    ///
    /// On rejection `self` is untouched and the error carries the warning text.
    pub fn toggled(&self, target: Mode, overrides: Option<EditorOverrides>) -> CoreResult<Self> {
        let overrides = overrides.unwrap_or_default();
        let key = overrides.key.unwrap_or_else(|| self.key_input.clone());
        let text = overrides.value.unwrap_or_else(|| self.value_input.clone());

        check_conversion(self.mode, target, &text)?;

        // Same-mode toggles keep the text verbatim, malformed or not.
        let value_input = if target == self.mode {
            text
        } else {
            target.editor_text(&target.to_editable(&Value::String(text)))
        };
        Ok(Self {
            original_key: self.original_key.clone(),
            key_input: key,
            value_input,
            mode: target,
            is_new: self.is_new,
        })
    }

    /// Validates the controls and produces the adapter call for a save.
    pub fn save_request(&self) -> CoreResult<SaveRequest> {
        if self.is_new && self.key_input.is_empty() {
            return Err(CoreError::ValidationError(KEY_REQUIRED.to_string()));
        }
        let value = self.value()?;

        Ok(if self.is_new {
            SaveRequest::Add {
                key: self.key_input.clone(),
                value,
            }
        } else {
            SaveRequest::Edit {
                new_key: self.key_input.clone(),
                old_key: self.original_key.clone(),
                value,
            }
        })
    }

    #[must_use]
    pub fn cancel(&self) -> CancelOutcome {
        if self.is_new {
            CancelOutcome::RemoveRow
        } else {
            CancelOutcome::Restored
        }
    }
}
