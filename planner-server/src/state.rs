use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::auth::{AllowAll, Authorizer, TokenAuthorizer};
use crate::config::ServerConfig;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RwLock<Database>>,
    pub authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    pub fn new(db: Database, authorizer: Arc<dyn Authorizer>) -> Self {
        AppState {
            db: Arc::new(RwLock::new(db)),
            authorizer,
        }
    }

    pub fn from_config(config: &ServerConfig, data_dir: &Path) -> Result<Self> {
        let db = Database::open(data_dir)?;

        let authorizer: Arc<dyn Authorizer> = if config.auth_enabled() {
            Arc::new(TokenAuthorizer::new(config.auth_tokens.iter().cloned()))
        } else {
            tracing::warn!("no auth_tokens configured, API is open to any caller");
            Arc::new(AllowAll)
        };

        Ok(AppState::new(db, authorizer))
    }
}
