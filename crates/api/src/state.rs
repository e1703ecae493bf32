use std::sync::Arc;

use atlas_core::error::CoreError;
use atlas_core::session_token::TokenDigester;
use atlas_db::Stores;

use crate::auth::authenticator::SessionAuthenticator;
use crate::auth::password::PasswordHasher;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Store handles, created once at startup and closed on shutdown.
    pub stores: Stores,
    /// Session authenticator sharing the same stores.
    pub auth: Arc<SessionAuthenticator>,
}

impl AppState {
    /// Wire the authenticator to the stores using the configured pepper.
    pub fn new(
        config: ServerConfig,
        stores: Stores,
        hasher: PasswordHasher,
    ) -> Result<Self, CoreError> {
        let digester = TokenDigester::new(&config.session_pepper)?;
        let auth = SessionAuthenticator::new(&stores, Arc::new(hasher), digester);
        Ok(Self {
            config: Arc::new(config),
            stores,
            auth: Arc::new(auth),
        })
    }
}
