//! Atlas API server library.
//!
//! Exposes the building blocks (config, state, error handling, session
//! authentication, routes) so integration tests, the server binary, and the
//! `atlas-admin` tool can all reach them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod telemetry;
