use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::export::Document;
use crate::field::{FieldChange, FieldError};
use crate::step::Step;
use crate::tool::Tool;

/// The root aggregate a wizard tool operates on.
///
/// A draft is a plain value: edits produce a new draft rather than mutating
/// nested sections in place, and the whole value round-trips through JSON.
pub trait Draft: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned {
    type Step: Step;

    const TOOL: Tool;

    /// A new draft with default sections and a newly generated identity.
    fn fresh() -> Self;

    /// Identity assigned at creation. Never regenerated for this draft.
    fn id(&self) -> &str;

    /// A fresh draft whose identity differs from `previous`.
    fn fresh_replacing(previous: &Self) -> Self {
        loop {
            let draft = Self::fresh();
            if draft.id() != previous.id() {
                return draft;
            }
            tracing::debug!(id = draft.id(), "identifier collision, regenerating");
        }
    }

    /// Unmet requirements of one step, in a fixed order.
    fn validate_step(&self, step: Self::Step) -> Vec<String>;

    /// Unmet requirements of every step, in step order.
    fn validate_all(&self) -> Vec<String> {
        Self::Step::ALL
            .iter()
            .flat_map(|step| self.validate_step(*step))
            .collect()
    }

    /// Requirements checked before the document may be exported.
    fn export_violations(&self) -> Vec<String> {
        Vec::new()
    }

    /// Apply one field edit, returning the edited copy.
    fn apply(&self, change: &FieldChange) -> Result<Self, FieldError>;

    fn document(&self, today: NaiveDate) -> Document;

    fn export_filename(&self, today: NaiveDate) -> String;
}

pub(crate) fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `required-text`: push `message` when `value` is blank after trimming.
pub(crate) fn require_text(errs: &mut Vec<String>, value: &str, message: &str) {
    if value.trim().is_empty() {
        errs.push(message.to_string());
    }
}

/// `required-boolean-true`: push `message` unless `value` is set.
pub(crate) fn require_true(errs: &mut Vec<String>, value: bool, message: &str) {
    if !value {
        errs.push(message.to_string());
    }
}
