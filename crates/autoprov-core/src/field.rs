//! Typed "field changed" events emitted by step views.
//!
//! A view never mutates a draft directly: it emits a [`FieldChange`] naming a
//! section, a field and a value, and the draft store applies it. Section and
//! field names are the camelCase names used in the persisted JSON.

use std::fmt;

use thiserror::Error;

use crate::tristate::TriState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("unknown field '{field}' in section '{section}'")]
    UnknownField { section: String, field: String },

    #[error("section '{0}' cannot be edited directly")]
    ReadOnlySection(String),

    #[error("field '{field}' expects {expected}")]
    KindMismatch { field: String, expected: FieldKind },

    #[error("'{value}' is not a valid choice for '{field}'")]
    InvalidChoice { field: String, value: String },

    #[error("no damage record with id {0}")]
    UnknownDamage(String),
}

/// The shape of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice,
    TriState,
    Flag,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "free text",
            Self::Choice => "one of a fixed set of choices",
            Self::TriState => "yes, no or unset",
            Self::Flag => "true or false",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Tri(TriState),
    Flag(bool),
}

impl FieldValue {
    pub(crate) fn into_text(self, field: &str) -> Result<String, FieldError> {
        match self {
            Self::Text(s) => Ok(s),
            _ => Err(mismatch(field, FieldKind::Text)),
        }
    }

    /// Accepts a flag, or text such as "yes"/"false".
    pub(crate) fn into_flag(self, field: &str) -> Result<bool, FieldError> {
        match self {
            Self::Flag(b) => Ok(b),
            Self::Text(s) => match TriState::parse(&s) {
                Some(TriState::Yes) => Ok(true),
                Some(TriState::No) => Ok(false),
                _ => Err(mismatch(field, FieldKind::Flag)),
            },
            Self::Tri(_) => Err(mismatch(field, FieldKind::Flag)),
        }
    }

    /// Accepts a tri-state, a flag, or text such as "yes"/"unset".
    pub(crate) fn into_tri(self, field: &str) -> Result<TriState, FieldError> {
        match self {
            Self::Tri(t) => Ok(t),
            Self::Flag(b) => Ok(b.into()),
            Self::Text(s) => TriState::parse(&s).ok_or_else(|| mismatch(field, FieldKind::TriState)),
        }
    }

    /// Accepts text and maps it through `parse`; unrecognised keys are rejected.
    pub(crate) fn into_choice<T>(
        self,
        field: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, FieldError> {
        let raw = self.into_text(field).map_err(|_| mismatch(field, FieldKind::Choice))?;
        parse(raw.trim()).ok_or_else(|| FieldError::InvalidChoice {
            field: field.to_string(),
            value: raw,
        })
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<TriState> for FieldValue {
    fn from(t: TriState) -> Self {
        Self::Tri(t)
    }
}

/// One field-level edit of a draft section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub section: String,
    pub field: String,
    pub value: FieldValue,
}

impl FieldChange {
    pub fn new(
        section: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            section: section.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parse a `section.field` path, as typed at the CLI.
    pub fn from_path(path: &str, value: impl Into<FieldValue>) -> Option<Self> {
        let (section, field) = path.split_once('.')?;
        if section.is_empty() || field.is_empty() {
            return None;
        }
        Some(Self::new(section, field, value))
    }
}

fn mismatch(field: &str, expected: FieldKind) -> FieldError {
    FieldError::KindMismatch {
        field: field.to_string(),
        expected,
    }
}

pub(crate) fn unknown_field(section: &str, field: &str) -> FieldError {
    FieldError::UnknownField {
        section: section.to_string(),
        field: field.to_string(),
    }
}
