//! Entry point for all SDK interaction.
//!
//! A [`BoxClient`] owns the configuration, transport and auth handles and
//! hands out one manager per endpoint family.

use std::sync::Arc;

use tracing::info;

use crate::auth::{AuthRepository, StaticTokenAuth};
use crate::config::BoxConfig;
use crate::error::Result;
use crate::managers::{EventsManager, ResourceManager};
use crate::service::{BoxService, HttpService};

#[derive(Clone)]
pub struct BoxClient {
    config: Arc<BoxConfig>,
    auth: Arc<dyn AuthRepository>,
    events: EventsManager,
}

impl BoxClient {
    /// Client using the reqwest transport and the config's access token.
    pub fn new(config: BoxConfig) -> Result<Self> {
        let service = Arc::new(HttpService::new(&config)?);
        let auth = Arc::new(StaticTokenAuth::from_token(&config.access_token));
        info!(
            base_uri = %config.base_uri,
            as_user = config.as_user.as_deref(),
            "box client ready"
        );
        Ok(Self::with_parts(Arc::new(config), service, auth))
    }

    /// Client with caller-supplied transport and auth, e.g. a refreshing
    /// auth repository or a test double.
    pub fn with_parts(
        config: Arc<BoxConfig>,
        service: Arc<dyn BoxService>,
        auth: Arc<dyn AuthRepository>,
    ) -> Self {
        let base = ResourceManager::new(Arc::clone(&config), service, Arc::clone(&auth));
        Self {
            config,
            auth,
            events: EventsManager::new(base),
        }
    }

    /// A copy of this client whose managers act on behalf of `user_id`.
    pub fn as_user(&self, user_id: impl Into<String>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            auth: Arc::clone(&self.auth),
            events: self.events.as_user(user_id),
        }
    }

    pub fn config(&self) -> &BoxConfig {
        &self.config
    }

    pub fn auth(&self) -> &Arc<dyn AuthRepository> {
        &self.auth
    }

    /// The events endpoint.
    pub fn events(&self) -> &EventsManager {
        &self.events
    }
}
