//! The single live draft of one tool, autosaved on every change.

use autoprov_core::{Draft, FieldChange, FieldError};
use tracing::{debug, info, warn};

use crate::{DraftPersistence, StoreError};

/// Owns the live draft for one tool and writes it through to persistence.
///
/// Storage is read exactly once, in [`open`](Self::open). Every successful
/// update writes the whole draft back under the tool's storage key. Storage
/// failures never reach the caller: a draft that cannot be read is replaced
/// by fresh defaults, and a failed write is logged and the session continues
/// in memory.
pub struct DraftStore<D: Draft, P: DraftPersistence> {
    persistence: P,
    draft: D,
}

impl<D: Draft, P: DraftPersistence> DraftStore<D, P> {
    /// Rehydrate from `persistence`, falling back to a fresh draft.
    pub fn open(persistence: P) -> Self {
        let draft = rehydrate::<D>(&persistence).unwrap_or_else(D::fresh);
        Self { persistence, draft }
    }

    pub fn key(&self) -> &'static str {
        D::TOOL.storage_key()
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Apply one field edit and persist the result.
    ///
    /// A rejected edit leaves the draft and storage untouched.
    pub fn set_field(&mut self, change: &FieldChange) -> Result<&D, FieldError> {
        let next = self.draft.apply(change)?;
        debug!(section = %change.section, field = %change.field, "field changed");
        self.replace(next);
        Ok(&self.draft)
    }

    /// Replace the whole draft and persist it.
    pub fn replace(&mut self, draft: D) {
        self.draft = draft;
        self.persist();
    }

    /// Discard the draft: clear storage and start a fresh one with a new id.
    ///
    /// The fresh draft is not written until its first change.
    pub fn reset(&mut self) -> &D {
        if let Err(e) = self.persistence.clear(self.key()) {
            warn!(key = self.key(), error = %e, "failed to clear stored draft");
        }
        let previous = self.draft.id().to_string();
        self.draft = D::fresh_replacing(&self.draft);
        info!(key = self.key(), previous = %previous, id = self.draft.id(), "draft reset");
        &self.draft
    }

    fn persist(&self) {
        if let Err(e) = self.write() {
            warn!(key = self.key(), error = %e, "autosave failed; continuing in memory");
        }
    }

    fn write(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string(&self.draft)?;
        self.persistence.save(self.key(), &text)
    }
}

fn decode<D: Draft>(text: &str) -> Result<D, StoreError> {
    Ok(serde_json::from_str(text)?)
}

fn rehydrate<D: Draft>(persistence: &impl DraftPersistence) -> Option<D> {
    let key = D::TOOL.storage_key();
    let text = match persistence.load(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!(key, "no stored draft");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "stored draft unreadable; starting fresh");
            return None;
        }
    };
    match decode::<D>(&text) {
        Ok(draft) => {
            info!(key, id = draft.id(), "restored draft");
            Some(draft)
        }
        Err(e) => {
            warn!(key, error = %e, "stored draft malformed; starting fresh");
            None
        }
    }
}
