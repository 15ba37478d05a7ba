use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::EventKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationEvent {
    pub kind: EventKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEvent {
    pub fn new(kind: EventKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(EventKind::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(EventKind::Assistant, content)
    }

    pub fn system_notice(content: impl Into<String>) -> Self {
        Self::new(EventKind::SystemNotice, content)
    }

    pub fn file_notice(content: impl Into<String>) -> Self {
        Self::new(EventKind::FileNotice, content)
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self::new(EventKind::Warning, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(EventKind::Error, content)
    }
}

/// Append-only conversation log. Insertion order is causal order.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: Vec<ConversationEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps never go backwards: an event stamped before the current
    /// tail takes the tail's timestamp.
    pub fn append(&mut self, mut event: ConversationEvent) -> &ConversationEvent {
        if let Some(last) = self.events.last() {
            if event.timestamp < last.timestamp {
                event.timestamp = last.timestamp;
            }
        }
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    pub fn events(&self) -> &[ConversationEvent] {
        &self.events
    }

    /// Events appended after the first `cursor` ones.
    pub fn since(&self, cursor: usize) -> &[ConversationEvent] {
        self.events.get(cursor..).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationEvent> {
        self.events.last()
    }
}
