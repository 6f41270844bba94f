//! Event records and pages returned by the events endpoint.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::entity::{EventSource, User};

// ---------------------------------------------------------------------------
// Event Filter
// ---------------------------------------------------------------------------

/// Which categories of events the server should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventFilter {
    /// Everything.
    #[default]
    #[serde(rename = "all")]
    All,
    /// Tree changes.
    #[serde(rename = "changes")]
    FolderChanges,
    /// Tree changes, only for folders marked for sync.
    #[serde(rename = "sync")]
    SyncedFolderChanges,
}

impl EventFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            EventFilter::All => "all",
            EventFilter::FolderChanges => "changes",
            EventFilter::SyncedFolderChanges => "sync",
        }
    }

    /// Value for the `stream_type` query parameter. `All` is the server
    /// default and is never sent.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            EventFilter::All => None,
            other => Some(other.as_str()),
        }
    }
}

impl std::fmt::Display for EventFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for EventFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(EventFilter::All),
            "changes" => Ok(EventFilter::FolderChanges),
            "sync" => Ok(EventFilter::SyncedFolderChanges),
            other => Err(format!(
                "unknown event filter {other:?}, expected one of: all, changes, sync"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Event Type
// ---------------------------------------------------------------------------

/// Declares [`EventType`] and both directions of its wire table from one list.
macro_rules! event_types {
    ($( $(#[$meta:meta])* $variant:ident => $token:literal, )*) => {
        /// The action an event records.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum EventType {
            $( $(#[$meta])* $variant, )*
            /// A token this crate does not know, kept as sent.
            Other(String),
        }

        impl EventType {
            /// Every known kind, in wire-table order.
            pub const KNOWN: &'static [EventType] = &[ $( EventType::$variant, )* ];

            /// Wire token for this kind.
            pub fn as_str(&self) -> &str {
                match self {
                    $( EventType::$variant => $token, )*
                    EventType::Other(token) => token,
                }
            }

            /// Parse a wire token. Never fails; unknown tokens become `Other`.
            pub fn from_token(token: &str) -> Self {
                match token {
                    $( $token => EventType::$variant, )*
                    other => EventType::Other(other.to_string()),
                }
            }
        }
    };
}

event_types! {
    /// A folder or file was created.
    ItemCreated => "ITEM_CREATE",
    /// A folder or file was uploaded.
    ItemUploaded => "ITEM_UPLOAD",
    /// A comment was created on a folder, file, or other comment.
    CommentCreated => "COMMENT_CREATE",
    ItemDownloaded => "ITEM_DOWNLOAD",
    /// A file was previewed.
    ItemPreviewed => "ITEM_PREVIEW",
    ItemMoved => "ITEM_MOVE",
    ItemCopied => "ITEM_COPY",
    /// A task was assigned.
    TaskAssignmentCreated => "TASK_ASSIGNMENT_CREATE",
    /// A file was locked.
    LockCreated => "LOCK_CREATE",
    /// A file was unlocked.
    LockDestroyed => "LOCK_DESTROY",
    /// A file or folder was moved to the trash.
    ItemDeleted => "ITEM_TRASH",
    /// A file or folder was restored from the trash.
    ItemUndeleted => "ITEM_UNDELETE_VIA_TRASH",
    CollaboratorAdded => "COLLAB_ADD_COLLABORATOR",
    CollaboratorRoleChanged => "COLLAB_ROLE_CHANGE",
    CollaboratorInvited => "COLLAB_INVITE_COLLABORATOR",
    CollaboratorRemoved => "COLLAB_REMOVE_COLLABORATOR",
    FolderMarkedForSync => "ITEM_SYNC",
    FolderUnmarkedForSync => "ITEM_UNSYNC",
    ItemRenamed => "ITEM_RENAME",
    /// A shared link was created for a file or folder.
    ItemShareEnabled => "ITEM_SHARED_CREATE",
    /// A shared link was removed from a file or folder.
    ItemShareDisabled => "ITEM_SHARED_UNSHARE",
    FolderShared => "ITEM_SHARED",
    /// A tag was added to a file or folder.
    TagAdded => "TAG_ITEM_CREATE",
    /// A user logged in from a device not seen before.
    LoginOnNewDevice => "ADD_LOGIN_ACTIVITY_DEVICE",
    /// A user session associated with an app was invalidated.
    LoginDeviceRemoved => "REMOVE_LOGIN_ACTIVITY_DEVICE",
    AdminRoleChanged => "CHANGE_ADMIN_ROLE",
    /// A collaborator violated an admin-set upload policy.
    UploadPolicyViolation => "CONTENT_WORKFLOW_UPLOAD_POLICY_VIOLATION",
}

impl EventType {
    pub fn is_known(&self) -> bool {
        !matches!(self, EventType::Other(_))
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(EventType::from_token(&token))
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One occurrence in the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Always `"event"`.
    #[serde(rename = "type", default = "event_kind")]
    pub kind: String,

    /// Stable id of the event. Overlapping polls can return the same event
    /// twice; callers dedup on this.
    pub event_id: String,

    /// The user that performed the action.
    pub created_by: Option<User>,

    pub created_at: DateTime<FixedOffset>,

    pub recorded_at: DateTime<FixedOffset>,

    pub event_type: EventType,

    /// Session of the user that performed the action.
    pub session_id: Option<String>,

    /// The object acted upon. Not all events have one.
    #[serde(default)]
    pub source: Option<EventSource>,
}

fn event_kind() -> String {
    "event".to_string()
}

// ---------------------------------------------------------------------------
// Event Page
// ---------------------------------------------------------------------------

/// The result of one poll of the events endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    /// Number of events in this page.
    pub chunk_size: u32,

    /// Position to request next to continue after this page.
    #[serde(deserialize_with = "stream_position")]
    pub next_stream_position: i64,

    /// Events in server order.
    #[serde(rename = "entries", default)]
    pub events: Vec<Event>,
}

impl EventPage {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether the reported `chunk_size` matches the events received.
    pub fn is_consistent(&self) -> bool {
        self.chunk_size as usize == self.events.len()
    }

    /// Event ids in page order, for dedup across overlapping polls.
    pub fn event_ids(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| e.event_id.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a EventPage {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl IntoIterator for EventPage {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

/// Accepts the position as a JSON number or a numeric string (the
/// enterprise stream sends strings) and rejects negatives.
fn stream_position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    let position = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .parse::<i64>()
            .map_err(|e| D::Error::custom(format!("invalid next_stream_position {s:?}: {e}")))?,
    };
    if position < 0 {
        return Err(D::Error::custom(format!(
            "next_stream_position must be non-negative, got {position}"
        )));
    }
    Ok(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn filter_wire_tokens() {
        assert_eq!(EventFilter::All.query_value(), None);
        assert_eq!(EventFilter::FolderChanges.query_value(), Some("changes"));
        assert_eq!(EventFilter::SyncedFolderChanges.query_value(), Some("sync"));
        assert_eq!(EventFilter::default(), EventFilter::All);
    }

    #[test]
    fn filter_parses_from_wire_token() {
        for filter in [
            EventFilter::All,
            EventFilter::FolderChanges,
            EventFilter::SyncedFolderChanges,
        ] {
            assert_eq!(filter.as_str().parse::<EventFilter>().unwrap(), filter);
        }
        assert!("everything".parse::<EventFilter>().is_err());
    }

    #[test]
    fn event_type_table_has_unique_tokens() {
        let tokens: HashSet<&str> = EventType::KNOWN.iter().map(|k| k.as_str()).collect();
        assert_eq!(EventType::KNOWN.len(), 27);
        assert_eq!(tokens.len(), EventType::KNOWN.len());
    }

    #[test]
    fn every_known_kind_decodes_from_its_token() {
        for kind in EventType::KNOWN {
            assert_eq!(&EventType::from_token(kind.as_str()), kind);
            assert!(kind.is_known());
            let decoded: EventType = serde_json::from_value(json!(kind.as_str())).unwrap();
            assert_eq!(&decoded, kind);
        }
        assert_eq!(
            EventType::from_token("CONTENT_WORKFLOW_UPLOAD_POLICY_VIOLATION"),
            EventType::UploadPolicyViolation
        );
    }

    #[test]
    fn unknown_event_type_is_preserved() {
        let kind: EventType = serde_json::from_value(json!("ITEM_MAKE_CURRENT_VERSION")).unwrap();
        assert_eq!(kind, EventType::Other("ITEM_MAKE_CURRENT_VERSION".to_string()));
        assert!(!kind.is_known());
        assert_eq!(
            serde_json::to_value(&kind).unwrap(),
            json!("ITEM_MAKE_CURRENT_VERSION")
        );
    }

    #[test]
    fn event_decodes_without_source() {
        let event: Event = serde_json::from_value(json!({
            "type": "event",
            "event_id": "f82c3ba03e41f7e8a7608363cc6c0390183c3f83",
            "created_by": {"type": "user", "id": "17738362", "name": "sean rose", "login": "sean@box.com"},
            "created_at": "2012-12-12T10:53:43-08:00",
            "recorded_at": "2012-12-12T10:53:48-08:00",
            "event_type": "LOCK_CREATE",
            "session_id": "70090280850c8d2a1933c1",
            "source": null
        }))
        .unwrap();
        assert_eq!(event.event_type, EventType::LockCreated);
        assert_eq!(event.created_by.unwrap().login.as_deref(), Some("sean@box.com"));
        assert!(event.source.is_none());
        assert!(event.recorded_at > event.created_at);
    }

    #[test]
    fn page_accepts_string_stream_position() {
        let page: EventPage = serde_json::from_value(json!({
            "chunk_size": 0,
            "next_stream_position": "1152922976252290886",
            "entries": []
        }))
        .unwrap();
        assert_eq!(page.next_stream_position, 1152922976252290886);
        assert!(page.is_empty());
        assert!(page.is_consistent());
    }

    #[test]
    fn page_rejects_negative_stream_position() {
        let result = serde_json::from_value::<EventPage>(json!({
            "chunk_size": 0,
            "next_stream_position": -1,
            "entries": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn page_requires_stream_position() {
        let result = serde_json::from_value::<EventPage>(json!({"chunk_size": 0, "entries": []}));
        assert!(result.is_err());
    }

    #[test]
    fn inconsistent_chunk_size_is_reported_not_rejected() {
        let page: EventPage = serde_json::from_value(json!({
            "chunk_size": 3,
            "next_stream_position": 10,
            "entries": []
        }))
        .unwrap();
        assert!(!page.is_consistent());
    }
}
