//! Value codecs for the two metadatum representations.
//!
//! Each [`Mode`] knows how to display a stored value, how to seed its editor,
//! how to read a value back out of editor text, and which conversions into it
//! need validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Warning shown when Simple -> Json is refused.
pub const NOT_CONVERTIBLE_TO_JSON: &str =
    "The simple field is not valid JSON and can not be converted.";

/// Warning shown when a Json editor holds malformed text on save.
pub const INVALID_JSON_ON_SAVE: &str = "The field contains invalid JSON and can not be saved.";

const JSON_INDENT: &[u8] = b"    ";

/// Value representation / editor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Scalar string values
    Simple,
    /// Arbitrary structured values
    Json,
}

/// Validation a target mode applies to raw text coming from another mode.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRule {
    check: fn(&str) -> bool,
    message: &'static str,
}

impl ConversionRule {
    #[must_use]
    pub fn accepts(&self, raw: &str) -> bool {
        (self.check)(raw)
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }
}

fn parses_as_json(raw: &str) -> bool {
    serde_json::from_str::<Value>(raw).is_ok()
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Simple, Self::Json];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Json => "json",
        }
    }

    /// Mode a value is first displayed in: strings are Simple, everything else Json.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        if value.is_string() {
            Self::Simple
        } else {
            Self::Json
        }
    }

    /// The mode the toggle control switches to.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Simple => Self::Json,
            Self::Json => Self::Simple,
        }
    }

    /// Initial value of a freshly added row.
    #[must_use]
    pub fn empty_value(self) -> Value {
        match self {
            Self::Simple => Value::String(String::new()),
            Self::Json => Value::Object(serde_json::Map::new()),
        }
    }

    /// Human-readable rendering of a stored value.
    #[must_use]
    pub fn display(self, value: &Value) -> String {
        match self {
            Self::Simple => simple_text(value),
            Self::Json => pretty_json(value),
        }
    }

    /// Value handed to this mode's editor when it opens.
    ///
    /// Json re-parses string values so a stored display string comes back as
    /// structured data; unparseable strings pass through untouched.
    #[must_use]
    pub fn to_editable(self, value: &Value) -> Value {
        match self {
            Self::Simple => Value::String(simple_text(value)),
            Self::Json => match value {
                Value::String(raw) => serde_json::from_str(raw).unwrap_or_else(|_| value.clone()),
                other => other.clone(),
            },
        }
    }

    /// Text placed in the value control for an editable value.
    #[must_use]
    pub fn editor_text(self, editable: &Value) -> String {
        match self {
            Self::Simple => simple_text(editable),
            Self::Json => pretty_json(editable),
        }
    }

    /// Reads the committed value back out of the value control.
    pub fn read_editor(self, text: &str) -> CoreResult<Value> {
        match self {
            Self::Simple => Ok(Value::String(text.to_string())),
            Self::Json => serde_json::from_str(text)
                .map_err(|_| CoreError::ValidationError(INVALID_JSON_ON_SAVE.to_string())),
        }
    }

    /// Rule this mode applies to text converted from `from`, if any.
    #[must_use]
    pub fn conversion_rule(self, from: Self) -> Option<ConversionRule> {
        match (from, self) {
            (Self::Simple, Self::Json) => Some(ConversionRule {
                check: parses_as_json,
                message: NOT_CONVERTIBLE_TO_JSON,
            }),
            (Self::Json, Self::Simple) | (Self::Simple, Self::Simple) | (Self::Json, Self::Json) => {
                None
            }
        }
    }
}

/// Whether editor text in `from` may be carried over into `to`.
#[must_use]
pub fn validate_conversion(from: Mode, to: Mode, raw: &str) -> bool {
    to.conversion_rule(from).is_none_or(|rule| rule.accepts(raw))
}

/// Same as [`validate_conversion`], returning the warning to surface on rejection.
pub fn check_conversion(from: Mode, to: Mode, raw: &str) -> CoreResult<()> {
    match to.conversion_rule(from) {
        Some(rule) if !rule.accepts(raw) => {
            Err(CoreError::ConversionRejected(rule.message().to_string()))
        }
        _ => Ok(()),
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| CoreError::UnsupportedMode(s.to_string()))
    }
}

fn simple_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}
