//! Messages exchanged with the transport layer around the core.
//!
//! The shapes mirror the browser extension's runtime messages; every
//! payload is a single `data` string. Errors travel as text too.

use crate::text::PageText;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one user-initiated extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Message {
    /// Trigger: collect the page text
    ExtractContent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    /// Page text on its way to the summarizer
    ProcessText {
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    /// Summary on its way to the display
    DisplayResult {
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    /// Transient error text for the display
    DisplayError {
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
}

impl Message {
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Message::ExtractContent { request_id }
            | Message::ProcessText { request_id, .. }
            | Message::DisplayResult { request_id, .. }
            | Message::DisplayError { request_id, .. } => *request_id,
        }
    }

    pub fn display_result(data: impl Into<String>, request_id: Option<RequestId>) -> Self {
        Message::DisplayResult {
            data: data.into(),
            request_id,
        }
    }

    pub fn display_error(data: impl Into<String>, request_id: Option<RequestId>) -> Self {
        Message::DisplayError {
            data: data.into(),
            request_id,
        }
    }
}

/// Cap page text before it is relayed to the summarizer.
pub fn truncate_payload(text: &PageText, max_chars: usize) -> PageText {
    text.truncated(max_chars)
}

/// Hands out increasing request ids and remembers the newest one.
///
/// A display that checks [`RequestTracker::is_current`] before rendering
/// drops results from requests that were superseded while in flight.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; it supersedes all earlier ones.
    pub fn begin(&self) -> RequestId {
        RequestId(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Record an id issued elsewhere, if it is newer than what we have.
    pub fn observe(&self, id: RequestId) {
        self.latest.fetch_max(id.0, Ordering::SeqCst);
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest.load(Ordering::SeqCst) == id.0
    }
}
