//! UI-agnostic request state types
//!
//! These types are shared by every frontend (terminal UI, one-shot CLI) and
//! carry no dependency on a specific UI framework.

use serde::Serialize;

use crate::tone::Tone;

/// The user's not-yet-submitted input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftInput {
    pub email_content: String,
    pub tone: Tone,
}

impl DraftInput {
    /// Whether the email body has any non-whitespace content.
    pub fn is_submittable(&self) -> bool {
        !self.email_content.trim().is_empty()
    }

    /// Snapshot the draft into the payload sent to the generation endpoint.
    pub fn to_request(&self) -> ReplyRequest {
        ReplyRequest {
            email_content: self.email_content.clone(),
            tone: self.tone.as_str().to_string(),
        }
    }
}

/// Wire payload for `POST {api_url}/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub email_content: String,
    pub tone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Pending,
    Succeeded,
    Failed,
}
