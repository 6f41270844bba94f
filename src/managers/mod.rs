//! Resource managers, one per family of API endpoints.
//!
//! Every manager wraps a [`ResourceManager`], which owns the shared handles
//! (config, transport, auth) and performs a single authenticated round trip.

pub mod events;

use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, warn};

use crate::auth::AuthRepository;
use crate::config::BoxConfig;
use crate::converter;
use crate::error::{Error, Result};
use crate::request::BoxRequest;
use crate::service::{BoxResponse, BoxService};
use crate::telemetry::{metrics, request as request_span};

pub use events::{EventsManager, EventsQuery};

/// Header carrying the user an admin token acts on behalf of.
pub const AS_USER_HEADER: &str = "As-User";

/// Shared plumbing for all managers. Cheap to clone; holds no mutable state.
#[derive(Clone)]
pub struct ResourceManager {
    config: Arc<BoxConfig>,
    service: Arc<dyn BoxService>,
    auth: Arc<dyn AuthRepository>,
    as_user: Option<String>,
}

impl ResourceManager {
    /// `As-User` is taken from the config; see [`ResourceManager::as_user`]
    /// to override it.
    pub fn new(
        config: Arc<BoxConfig>,
        service: Arc<dyn BoxService>,
        auth: Arc<dyn AuthRepository>,
    ) -> Self {
        let as_user = config.as_user.clone();
        Self {
            config,
            service,
            auth,
            as_user,
        }
    }

    /// A copy of this manager that acts on behalf of `user_id`.
    pub fn as_user(&self, user_id: impl Into<String>) -> Self {
        Self {
            as_user: Some(user_id.into()),
            ..self.clone()
        }
    }

    pub fn config(&self) -> &BoxConfig {
        &self.config
    }

    /// Send `request` with auth headers attached and decode the response.
    ///
    /// Aborts with [`Error::Cancelled`] as soon as `cancel` fires. Errors from
    /// the auth repository, the transport and decoding propagate unchanged.
    pub async fn to_response<T: DeserializeOwned>(
        &self,
        request: BoxRequest,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let endpoint = request.host.path().to_string();
        let span = request_span::start_request_span(&request.method.to_string(), &endpoint);
        let started = Instant::now();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            response = self.send(request).instrument(span.clone()) => response,
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::api_duration_ms().record(elapsed_ms, &[KeyValue::new("endpoint", endpoint.clone())]);

        let outcome = response.and_then(|response| {
            request_span::record_status(&span, response.status);
            converter::parse::<T>(&response)
        });

        metrics::api_requests().add(
            1,
            &[
                KeyValue::new("endpoint", endpoint.clone()),
                KeyValue::new("result", result_label(&outcome)),
            ],
        );
        if let Err(ref e) = outcome {
            span.in_scope(|| warn!(endpoint = %endpoint, elapsed_ms, "request failed: {e}"));
        }

        outcome
    }

    async fn send(&self, request: BoxRequest) -> Result<BoxResponse> {
        let token = self.auth.access_token().await?;
        let mut request =
            request.header("Authorization", format!("Bearer {}", token.expose_secret()));
        if let Some(ref user) = self.as_user {
            request = request.header(AS_USER_HEADER, user.as_str());
        }

        debug!(method = %request.method, uri = %request.uri(), "sending request");
        self.service.execute(&request).await
    }
}

/// Value of the `result` label on `box.api.requests`.
fn result_label<T>(outcome: &Result<T>) -> &'static str {
    match outcome {
        Ok(_) => "ok",
        Err(Error::Cancelled) => "cancelled",
        Err(Error::Transport(_)) => "transport_error",
        Err(Error::Decode(_)) => "decode_error",
        Err(Error::Auth(_)) => "auth_error",
        Err(Error::Unauthorized { .. }) => "unauthorized",
        Err(_) => "api_error",
    }
}
