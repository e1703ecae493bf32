//! Row models and input DTOs, one module per table family.

pub mod account;
pub mod content;
pub mod session;
