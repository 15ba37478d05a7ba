//! Plain-text and JSON-lines rendering of timeline events.

use client_core::{ConversationEvent, SessionSnapshot};
use shared::domain::{BackendStatus, EventKind};

fn label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::User => "you",
        EventKind::Assistant => "assistant",
        EventKind::SystemNotice => "system",
        EventKind::FileNotice => "file",
        EventKind::Warning => "warning",
        EventKind::Error => "error",
    }
}

pub fn render_event(event: &ConversationEvent, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string(event)?);
    }
    Ok(format!(
        "[{}] {}: {}",
        event.timestamp.format("%H:%M:%S"),
        label(event.kind),
        event.content
    ))
}

pub fn render_status(snapshot: &SessionSnapshot, backend: BackendStatus, base_url: &str) -> String {
    let backend = match backend {
        BackendStatus::Checking => "checking",
        BackendStatus::Connected => "connected",
        BackendStatus::Unreachable => "unreachable",
    };
    let document = match (&snapshot.file_name, snapshot.status.session_id()) {
        (Some(name), Some(session_id)) => format!("{name} (session {session_id})"),
        (Some(name), None) => name.clone(),
        (None, _) => "none".to_string(),
    };
    format!(
        "backend: {backend} ({base_url})\ndocument: {document}\nstatus: {}{}\nevents: {}",
        snapshot.status.label(),
        if snapshot.busy { " (busy)" } else { "" },
        snapshot.timeline_len
    )
}
