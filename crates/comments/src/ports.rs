//! Collaborator contracts for the comment panel
//!
//! The panel never persists anything itself. It reports every change to an
//! [`AnnotationStore`], draws reply ids from a [`ReplyIdSource`] and reads the time
//! from a [`Clock`], so hosts and tests can substitute each of them.

use chrono::{DateTime, TimeZone, Utc};
use comment_model::{Annotation, AnnotationId, ReplyId, Timestamp};
use serde::Serialize;

/// Receiver of outbound change notifications.
///
/// Delivery is synchronous and happens once per mutation; the panel does not retry.
pub trait AnnotationStore {
    /// Body text or replies of an annotation changed.
    fn on_update(&mut self, annotation: &Annotation);

    /// An annotation and all of its replies were removed.
    fn on_delete(&mut self, id: &AnnotationId);

    /// The user picked an annotation in the comment list.
    fn on_selected(&mut self, annotation: &Annotation);
}

/// Notification recorded by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StoreEvent {
    Updated { annotation: Annotation },
    Deleted { id: AnnotationId },
    Selected { annotation: Annotation },
}

/// Store that keeps every notification in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    events: Vec<StoreEvent>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[StoreEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }
}

impl AnnotationStore for RecordingStore {
    fn on_update(&mut self, annotation: &Annotation) {
        self.events.push(StoreEvent::Updated { annotation: annotation.clone() });
    }

    fn on_delete(&mut self, id: &AnnotationId) {
        self.events.push(StoreEvent::Deleted { id: id.clone() });
    }

    fn on_selected(&mut self, annotation: &Annotation) {
        self.events.push(StoreEvent::Selected { annotation: annotation.clone() });
    }
}

/// Source of ids for newly composed replies. Must not repeat itself.
pub trait ReplyIdSource {
    fn next_id(&mut self) -> ReplyId;
}

/// Random UUID v4 reply ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidReplyIds;

impl ReplyIdSource for UuidReplyIds {
    fn next_id(&mut self) -> ReplyId {
        ReplyId(uuid::Uuid::new_v4().to_string())
    }
}

/// Deterministic `<prefix><n>` reply ids, starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialReplyIds {
    prefix: String,
    next: u64,
}

impl SequentialReplyIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 1 }
    }
}

impl Default for SequentialReplyIds {
    fn default() -> Self {
        Self::new("reply-")
    }
}

impl ReplyIdSource for SequentialReplyIds {
    fn next_id(&mut self) -> ReplyId {
        let id = ReplyId(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Wall clock used to stamp reply dates.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl FixedClock {
    /// Clock frozen at the Unix epoch.
    pub fn epoch() -> Self {
        Self(DateTime::<Utc>::default())
    }

    pub fn at_unix(seconds: i64) -> Self {
        Self(Utc.timestamp_opt(seconds, 0).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comment_model::Subtype;

    #[test]
    fn sequential_ids_count_up_from_one() {
        let mut ids = SequentialReplyIds::new("r");
        assert_eq!(ids.next_id().as_str(), "r1");
        assert_eq!(ids.next_id().as_str(), "r2");
    }

    #[test]
    fn uuid_ids_do_not_repeat() {
        let mut ids = UuidReplyIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn recording_store_keeps_arrival_order() {
        let annotation =
            Annotation::new("a1", 1, Subtype::Square, "alice", FixedClock::epoch().now());
        let mut store = RecordingStore::new();

        store.on_selected(&annotation);
        store.on_update(&annotation);
        store.on_delete(annotation.id());

        let events = store.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], StoreEvent::Selected { .. }));
        assert!(matches!(events[1], StoreEvent::Updated { .. }));
        assert_eq!(events[2], StoreEvent::Deleted { id: AnnotationId::from("a1") });
        assert!(store.events().is_empty());
    }

    #[test]
    fn store_events_serialize_with_kind_tag() {
        let event = StoreEvent::Deleted { id: AnnotationId::from("a1") };
        let json = serde_json::to_value(&event).expect("event should serialize");
        assert_eq!(json, serde_json::json!({ "kind": "deleted", "id": "a1" }));
    }
}
