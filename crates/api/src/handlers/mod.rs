pub mod articles;
pub mod auth;
pub mod categories;
pub mod events;
pub mod notes;
pub mod public;
pub mod tasks;
pub mod uploads;
