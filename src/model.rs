//! Core data model.
//!
//! Records returned by the Box API, plus the stream cursor used to page
//! through the events log.

pub mod entity;
pub mod event;

pub use entity::{Comment, EventSource, Item, User};
pub use event::{Event, EventFilter, EventPage, EventType};

use crate::request::params::NOW_STREAM_POSITION;

// ---------------------------------------------------------------------------
// Stream Position
// ---------------------------------------------------------------------------

/// A point in the event log.
///
/// Positions are opaque, server-issued and increase monotonically. `At(0)`
/// means the beginning of the log; `Now` asks for the current head without
/// any history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamPosition {
    Now,
    At(i64),
}

impl StreamPosition {
    pub const BEGINNING: StreamPosition = StreamPosition::At(0);

    /// Value for the `stream_position` query parameter, or `None` when the
    /// parameter should be left out and the server default applied.
    pub fn query_value(self) -> Option<String> {
        match self {
            StreamPosition::Now => Some(NOW_STREAM_POSITION.to_string()),
            StreamPosition::At(p) if p > 0 => Some(p.to_string()),
            StreamPosition::At(_) => None,
        }
    }
}

impl Default for StreamPosition {
    fn default() -> Self {
        Self::BEGINNING
    }
}

impl From<i64> for StreamPosition {
    fn from(position: i64) -> Self {
        StreamPosition::At(position)
    }
}

impl std::fmt::Display for StreamPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamPosition::Now => write!(f, "{NOW_STREAM_POSITION}"),
            StreamPosition::At(p) => write!(f, "{p}"),
        }
    }
}
