//! Note type discriminator values.
//!
//! These must match the CHECK constraint on `notes.note_type`.

pub const NOTE_TYPE_NOTE: &str = "note";
pub const NOTE_TYPE_LIST: &str = "list";
pub const NOTE_TYPE_IMAGE_NOTE: &str = "image_note";
pub const NOTE_TYPE_ARTICLE: &str = "article";

/// All accepted note types.
pub const NOTE_TYPES: &[&str] = &[
    NOTE_TYPE_NOTE,
    NOTE_TYPE_LIST,
    NOTE_TYPE_IMAGE_NOTE,
    NOTE_TYPE_ARTICLE,
];

/// Default background colour for new notes.
pub const DEFAULT_BACKGROUND_COLOR: &str = "white";

/// Check whether a note type is one of [`NOTE_TYPES`].
pub fn is_valid_note_type(note_type: &str) -> bool {
    NOTE_TYPES.contains(&note_type)
}
