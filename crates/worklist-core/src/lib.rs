//! Core engine for the clinic worklist: appointment-roster reconciliation,
//! demographics merging, and day-grid projection, backed by a whole-state
//! SQLite snapshot store.
//!
//! The data flows in one direction:
//!
//! ```text
//!   spreadsheet rows            persisted snapshot
//!        |                             |
//!   [reconcile] --- classify,     [db] --- load, migrate
//!        |          reshape            |
//!        v                             v
//!   [merge] -----------------> [store] <----- Commands (edits)
//!                                  |
//!                                  v
//!                            [slots] --- day grid projection
//! ```
//!
//! Imports and edits mutate the [`Store`]; every mutation is followed by a
//! synchronous whole-state save. Rendering reads back out of the store
//! through pure projections and never mutates.

pub mod db;
pub mod format;
pub mod identity;
pub mod merge;
pub mod models;
pub mod reconcile;
pub mod slots;
pub mod store;
pub mod tags;

pub use db::{Database, DbError, DbResult, MemoryBackend, PersistedState, StateBackend};
pub use identity::normalize_name;
pub use merge::{merge_supplemental, MergeError, MergeResult};
pub use models::{
    AppointmentRecord, ApplicationState, AttachmentRef, AttachmentSlot, DisplayStatus, ResultItem,
    RowObject, CHECKBOX_COLUMNS, FIXED_COLUMNS,
};
pub use reconcile::{build_primary_records, FileKind};
pub use slots::{canonical_slots, project_day, GridRow, TimeSlotPlaceholder};
pub use store::{Command, StatusFlag, Store, StoreError, StoreResult};
pub use tags::{TagSet, TagVocabulary};
