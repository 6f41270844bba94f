//! Events endpoint.
//!
//! Supports simple polling only: ask for the current stream position, then
//! ask for the events since a position you hold. The manager keeps no
//! cursor of its own; callers advance theirs with
//! [`EventPage::next_stream_position`]. Long polling and webhooks are not
//! supported.

use opentelemetry::KeyValue;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ResourceManager;
use crate::config::DEFAULT_STREAM_LIMIT;
use crate::error::{Error, Result};
use crate::model::{EventFilter, EventPage, StreamPosition};
use crate::request::{BoxRequest, params};
use crate::telemetry::metrics;

/// Parameters for [`EventsManager::get_events_since`].
///
/// Defaults: from the beginning of the log, all events, 100 per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventsQuery {
    /// Position after which events are returned. `0` means the beginning.
    pub stream_position: i64,
    pub filter: EventFilter,
    /// Maximum number of events in the page.
    pub limit: u32,
}

impl Default for EventsQuery {
    fn default() -> Self {
        Self {
            stream_position: 0,
            filter: EventFilter::All,
            limit: DEFAULT_STREAM_LIMIT,
        }
    }
}

impl EventsQuery {
    pub fn since(stream_position: i64) -> Self {
        Self {
            stream_position,
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: EventFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Clone)]
pub struct EventsManager {
    base: ResourceManager,
}

impl EventsManager {
    pub fn new(base: ResourceManager) -> Self {
        Self { base }
    }

    /// A copy of this manager that acts on behalf of `user_id`.
    pub fn as_user(&self, user_id: impl Into<String>) -> Self {
        Self::new(self.base.as_user(user_id))
    }

    /// The current head of the stream.
    ///
    /// Polling from the returned position yields only events that happen
    /// after this call.
    pub async fn get_current_stream_position(&self, cancel: &CancellationToken) -> Result<i64> {
        let request = self.stream_request(StreamPosition::Now)?;
        let page: EventPage = self.base.to_response(request, cancel).await?;
        debug!(
            next_stream_position = page.next_stream_position,
            "current stream position"
        );
        Ok(page.next_stream_position)
    }

    /// The events that have occurred since `query.stream_position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LimitOutOfRange`] when `query.limit` is outside the
    /// configured bounds and [`Error::InvalidArgument`] for a negative
    /// position. Both are raised before any request is sent.
    pub async fn get_events_since(
        &self,
        query: EventsQuery,
        cancel: &CancellationToken,
    ) -> Result<EventPage> {
        let request = self.events_request(&query)?;
        let page: EventPage = self.base.to_response(request, cancel).await?;

        metrics::events_received().add(
            page.len() as u64,
            &[KeyValue::new("filter", query.filter.as_str())],
        );
        debug!(
            stream_position = query.stream_position,
            next_stream_position = page.next_stream_position,
            chunk_size = page.chunk_size,
            "received events"
        );
        Ok(page)
    }

    /// Build the request for `query`, validating it first.
    ///
    /// Parameters equal to the server defaults are left out.
    pub fn events_request(&self, query: &EventsQuery) -> Result<BoxRequest> {
        let limits = self.base.config().stream_limits;
        if !limits.contains(query.limit) {
            return Err(Error::LimitOutOfRange {
                value: query.limit,
                min: limits.min,
                max: limits.max,
            });
        }
        if query.stream_position < 0 {
            return Err(Error::InvalidArgument(format!(
                "stream_position must be non-negative, got {}",
                query.stream_position
            )));
        }

        let mut request = self.stream_request(StreamPosition::At(query.stream_position))?;
        if let Some(stream_type) = query.filter.query_value() {
            request = request.param(params::STREAM_TYPE, stream_type);
        }
        if query.limit != DEFAULT_STREAM_LIMIT {
            request = request.param(params::STREAM_LIMIT, query.limit.to_string());
        }
        Ok(request)
    }

    fn stream_request(&self, position: StreamPosition) -> Result<BoxRequest> {
        let request = BoxRequest::new(self.base.config().events_endpoint()?);
        Ok(match position.query_value() {
            Some(value) => request.param(params::STREAM_POSITION, value),
            None => request,
        })
    }
}
