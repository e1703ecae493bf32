//! Well-known role name constants.
//!
//! These must match the column default in `20260301000001_create_accounts_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
