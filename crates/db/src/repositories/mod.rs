//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod account_repo;
pub mod content_repo;
pub mod session_repo;

pub use account_repo::AccountRepo;
pub use content_repo::{CityRepo, CountryRepo, EntityRepo, PageRepo};
pub use session_repo::SessionRepo;
