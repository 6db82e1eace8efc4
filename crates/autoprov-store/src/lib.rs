//! Draft storage: a key-value persistence capability and the autosaving draft store.

mod draft_store;
mod error;
mod persistence;

pub use draft_store::DraftStore;
pub use error::StoreError;
pub use persistence::{DraftPersistence, FileStore, MemoryStore};
