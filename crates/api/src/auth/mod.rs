//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification and length rules.
//! - [`jwt`] -- access tokens and refresh-token helpers.

pub mod jwt;
pub mod password;
