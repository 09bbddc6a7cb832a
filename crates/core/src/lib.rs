//! Domain logic shared by the database and API layers.
//!
//! Nothing in here touches I/O: the modules hold the error type, id and
//! timestamp aliases, the category-id codec and the small parsing and
//! validation rules the handlers and repositories build on.

pub mod category_ids;
pub mod datetime;
pub mod error;
pub mod note_type;
pub mod priority;
pub mod roles;
pub mod search;
pub mod tags;
pub mod types;
pub mod uploads;
