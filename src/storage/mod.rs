//! Outline persistence and the local update collaborator.
//!
//! The outline is a single JSON document. Every update request is appended
//! to a JSON-lines journal next to it before being applied to the stored
//! record.

mod apply;
mod error;
mod journal;
mod manager;

pub use apply::apply_payload;
pub use error::StorageError;
pub use journal::{JournalCodec, UpdateRequest};
pub use manager::OutlineStore;
