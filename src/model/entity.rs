//! Mini representations of the objects events refer to.

use serde::{Deserialize, Deserializer, Serialize};

/// A user, as embedded in `created_by` and user-sourced events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "type", default = "user_type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

fn user_type() -> String {
    "user".to_string()
}

/// A file or folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "type", default = "comment_type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
}

fn comment_type() -> String {
    "comment".to_string()
}

/// The object an event acted upon, selected by its `type` field.
///
/// Kinds this crate does not model are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventSource {
    File(Item),
    Folder(Item),
    Comment(Comment),
    User(User),
    Other(serde_json::Value),
}

impl EventSource {
    /// The source's `type` field, if it has one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            EventSource::File(item) | EventSource::Folder(item) => Some(&item.kind),
            EventSource::Comment(comment) => Some(&comment.kind),
            EventSource::User(user) => Some(&user.kind),
            EventSource::Other(raw) => raw.get("type").and_then(|t| t.as_str()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            EventSource::File(item) | EventSource::Folder(item) => Some(&item.id),
            EventSource::Comment(comment) => Some(&comment.id),
            EventSource::User(user) => Some(&user.id),
            EventSource::Other(raw) => raw.get("id").and_then(|t| t.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for EventSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;

        let raw = serde_json::Value::deserialize(deserializer)?;
        let kind = raw.get("type").and_then(|t| t.as_str()).map(str::to_owned);
        let source = match kind.as_deref() {
            Some("file") => EventSource::File(serde_json::from_value(raw).map_err(D::Error::custom)?),
            Some("folder") => {
                EventSource::Folder(serde_json::from_value(raw).map_err(D::Error::custom)?)
            }
            Some("comment") => {
                EventSource::Comment(serde_json::from_value(raw).map_err(D::Error::custom)?)
            }
            Some("user") => EventSource::User(serde_json::from_value(raw).map_err(D::Error::custom)?),
            _ => EventSource::Other(raw),
        };
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn folder_source_decodes_by_type() {
        let source: EventSource = serde_json::from_value(json!({
            "type": "folder",
            "id": "11446498",
            "sequence_id": "1",
            "etag": "1",
            "name": "Pictures"
        }))
        .unwrap();
        match &source {
            EventSource::Folder(item) => assert_eq!(item.name.as_deref(), Some("Pictures")),
            other => panic!("expected folder, got {other:?}"),
        }
        assert_eq!(source.kind(), Some("folder"));
        assert_eq!(source.id(), Some("11446498"));
    }

    #[test]
    fn unknown_source_kind_keeps_raw_fields() {
        let raw = json!({"type": "web_link", "id": "77", "url": "https://example.com"});
        let source: EventSource = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(source, EventSource::Other(raw));
        assert_eq!(source.kind(), Some("web_link"));
    }

    #[test]
    fn untyped_source_is_other() {
        let raw = json!({"folder_id": "0", "item_name": "x"});
        let source: EventSource = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(source, EventSource::Other(raw));
        assert_eq!(source.kind(), None);
        assert_eq!(source.id(), None);
    }

    #[test]
    fn known_kind_missing_id_is_an_error() {
        let result = serde_json::from_value::<EventSource>(json!({"type": "file", "name": "a.txt"}));
        assert!(result.is_err());
    }

    #[test]
    fn source_serializes_back_with_type_field() {
        let source = EventSource::Comment(Comment {
            kind: "comment".to_string(),
            id: "9".to_string(),
            message: Some("hi".to_string()),
            created_by: None,
        });
        let value = serde_json::to_value(&source).unwrap();
        assert_eq!(value, json!({"type": "comment", "id": "9", "message": "hi"}));
    }
}
