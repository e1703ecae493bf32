//! Domain primitives shared by the Atlas storage layer and HTTP server.

pub mod error;
pub mod keys;
pub mod roles;
pub mod session_token;
pub mod types;
