//! Admin session authentication.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`authenticator`] -- Login, per-request authentication, logout, introspection.
//! - [`cookie`] -- Building and reading the `admin_session` cookie.

pub mod authenticator;
pub mod cookie;
pub mod password;
