//! Request extractors for session authentication.
//!
//! - [`auth::SessionCookie`] -- The raw `admin_session` cookie, if any.
//! - [`auth::AdminSession`] -- Requires an active admin session.
//! - [`client`] -- Client IP and user agent recorded on new sessions.

pub mod auth;
pub mod client;
