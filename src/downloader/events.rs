// Status events and the ordered sink they are delivered through
//
// The pipeline runs on its own worker; the transport collaborator drains
// events from the other end of the sink and delivers them to the client.
// Sends must never block and must preserve per-request emission order.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::models::MediaInfo;

/// One structured progress/result event. Serializes to the wire schema
/// consumed by the playback client: `{"action":"status","message":...}`,
/// `{"action":"error","message":...}` or the terminal
/// `{"action":"media",...}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum StatusEvent {
    Status {
        message: String,
    },
    Error {
        message: String,
    },
    Media {
        id: String,
        title: Option<String>,
        like_count: Option<i64>,
        view_count: Option<i64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        playlist_videos: Vec<String>,
    },
}

impl StatusEvent {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn media(info: &MediaInfo) -> Self {
        Self::Media {
            id: info.id.clone(),
            title: info.title.clone(),
            like_count: info.like_count,
            view_count: info.view_count,
            playlist_videos: info.playlist_videos.clone(),
        }
    }
}

/// Destination for a request's event stream. Implementations must not
/// block the emitting worker and must preserve emission order.
pub trait EventSink: Send + Sync {
    fn send(&self, event: StatusEvent);
}

/// `EventSink` backed by an unbounded channel. The transport side owns the
/// receiver and forwards each event to the remote client in order.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn send(&self, event: StatusEvent) {
        // A closed receiver means the client went away mid-request.
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_to_the_wire_schema() {
        let status = StatusEvent::status("Downloading resource ...");
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"action":"status","message":"Downloading resource ..."}"#
        );

        let media = StatusEvent::Media {
            id: "dQw4w9WgXcQ".to_string(),
            title: Some("a title".to_string()),
            like_count: Some(12),
            view_count: None,
            playlist_videos: Vec::new(),
        };
        let json = serde_json::to_value(&media).unwrap();
        assert_eq!(json["action"], "media");
        assert_eq!(json["view_count"], serde_json::Value::Null);
        // empty continuation queue is omitted entirely
        assert!(json.get("playlist_videos").is_none());
    }

    #[test]
    fn playlist_continuation_is_included_when_non_empty() {
        let media = StatusEvent::Media {
            id: "a".to_string(),
            title: None,
            like_count: None,
            view_count: None,
            playlist_videos: vec!["b".to_string(), "c".to_string()],
        };
        let json = serde_json::to_value(&media).unwrap();
        assert_eq!(json["playlist_videos"][1], "c");
    }

    #[test]
    fn channel_sink_preserves_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.send(StatusEvent::status("one"));
        sink.send(StatusEvent::status("two"));
        assert_eq!(rx.try_recv().unwrap(), StatusEvent::status("one"));
        assert_eq!(rx.try_recv().unwrap(), StatusEvent::status("two"));
    }
}
