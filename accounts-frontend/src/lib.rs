pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use access_core::{AccessResolver, PolicyTable};
use services::accounts_client::AccountsClient;
use std::sync::Arc;

/// Shared application state: the access resolver and the accounts API client.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<AccessResolver>,
    pub accounts_client: Arc<AccountsClient>,
}

impl AppState {
    pub fn new(resolver: Arc<AccessResolver>, accounts_client: Arc<AccountsClient>) -> Self {
        Self {
            resolver,
            accounts_client,
        }
    }

    /// Build the resolver over the built-in policy table and the API client.
    pub fn from_settings(settings: &crate::config::Settings) -> anyhow::Result<Self> {
        let policy = PolicyTable::builtin()
            .map_err(|e| anyhow::anyhow!("Invalid permission table: {}", e))?;
        let resolver = AccessResolver::new(Arc::new(policy), settings.auth.clone());
        let accounts_client = AccountsClient::new(settings.api.clone())?;

        Ok(Self::new(Arc::new(resolver), Arc::new(accounts_client)))
    }
}
