//! Edit commands.
//!
//! Every interactive edit is a discrete intent naming a record, a field,
//! and a value. The store consumes these: it validates, formats, updates
//! the tag vocabularies, and persists. Nothing here knows about rendering.

use crate::models::AttachmentSlot;

/// The three independent status checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Printed,
    Done,
    Cancelled,
}

/// A discrete mutation of one date group, applied through
/// [`Store::apply`](crate::store::Store::apply).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Commit an edited cell. The store formats Time/Phone/DOB/Sex/Age on
    /// commit; unknown headers land in the record's passthrough fields.
    EditField {
        dos: String,
        record_id: String,
        field: String,
        value: String,
    },
    /// Set the single-valued visit type, growing the vocabulary.
    SetVisitType {
        dos: String,
        record_id: String,
        value: String,
    },
    AddReason {
        dos: String,
        record_id: String,
        value: String,
    },
    RemoveReason {
        dos: String,
        record_id: String,
        value: String,
    },
    AddResult {
        dos: String,
        record_id: String,
        name: String,
    },
    ToggleResult {
        dos: String,
        record_id: String,
        name: String,
    },
    RemoveResult {
        dos: String,
        record_id: String,
        name: String,
    },
    SetFlag {
        dos: String,
        record_id: String,
        flag: StatusFlag,
        value: bool,
    },
    /// Attach a document, validated against the slot's accepted MIME types
    /// before anything is stored.
    SetAttachment {
        dos: String,
        record_id: String,
        slot: AttachmentSlot,
        file_name: String,
        mime: String,
        data_url: String,
    },
    ClearAttachment {
        dos: String,
        record_id: String,
        slot: AttachmentSlot,
    },
    /// Append a blank manually-entered appointment to a date group.
    AddAppointment { dos: String },
}
