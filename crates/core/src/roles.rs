//! Well-known role name constants.
//!
//! A user's role is derived from the `users.is_admin` flag and embedded in
//! the JWT `role` claim.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Resolve the role name carried in tokens for a user row.
pub fn role_for(is_admin: bool) -> &'static str {
    if is_admin {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}
