//! Request lifecycle for a single reply generation.
//!
//! The controller owns the draft, the request status, and the copy
//! acknowledgment. At most one generation call is in flight at a time; a
//! submit while one is pending is silently ignored.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::clipboard::{Clipboard, ClipboardError};
use crate::generator::{GenerationRequestFailed, ReplyGenerator};
use crate::state::{DraftInput, RequestStatus};
use crate::tone::Tone;

/// Shown for every generation failure, whatever the cause.
pub const FAILURE_MESSAGE: &str = "Failed to generate email reply. Please try again.";

/// How long the "copied" acknowledgment stays up after a clipboard write.
pub const COPY_ACK_INTERVAL: Duration = Duration::from_millis(1500);

// Reply and error live inside the phase so they can never coexist.
#[derive(Debug)]
enum Phase {
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

pub struct ReplyRequestController {
    draft: DraftInput,
    phase: Phase,
    in_flight: Option<JoinHandle<Result<String, GenerationRequestFailed>>>,
    generator: Arc<dyn ReplyGenerator>,
    copy_ack_until: Option<Instant>,
    ack_interval: Duration,
}

impl ReplyRequestController {
    pub fn new(generator: Arc<dyn ReplyGenerator>) -> Self {
        Self {
            draft: DraftInput::default(),
            phase: Phase::Idle,
            in_flight: None,
            generator,
            copy_ack_until: None,
            ack_interval: COPY_ACK_INTERVAL,
        }
    }

    pub fn with_ack_interval(mut self, interval: Duration) -> Self {
        self.ack_interval = interval;
        self
    }

    pub fn draft(&self) -> &DraftInput {
        &self.draft
    }

    pub fn status(&self) -> RequestStatus {
        match self.phase {
            Phase::Idle => RequestStatus::Idle,
            Phase::Pending => RequestStatus::Pending,
            Phase::Succeeded(_) => RequestStatus::Succeeded,
            Phase::Failed(_) => RequestStatus::Failed,
        }
    }

    pub fn reply(&self) -> Option<&str> {
        match &self.phase {
            Phase::Succeeded(reply) => Some(reply.as_str()),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending)
    }

    /// Whether `submit` would issue a request right now.
    pub fn can_submit(&self) -> bool {
        self.draft.is_submittable() && !self.is_pending()
    }

    pub fn update_email_content(&mut self, text: impl Into<String>) {
        self.draft.email_content = text.into();
    }

    pub fn update_tone(&mut self, tone: Tone) {
        self.draft.tone = tone;
    }

    /// Issue one generation request for the current draft.
    ///
    /// Returns `false` without doing anything when the draft is blank or a
    /// request is already pending. Must be called inside a tokio runtime.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }

        let request = self.draft.to_request();
        tracing::info!(
            tone = self.draft.tone.display_name(),
            chars = request.email_content.chars().count(),
            "submitting reply generation request"
        );

        self.phase = Phase::Pending;

        let generator = Arc::clone(&self.generator);
        self.in_flight = Some(tokio::spawn(async move {
            generator.generate(&request).await
        }));
        true
    }

    /// Settle the in-flight request if it has already finished.
    ///
    /// Returns `true` when a transition out of `Pending` happened.
    pub async fn poll_response(&mut self) -> bool {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|handle| handle.is_finished());
        if !finished {
            return false;
        }
        self.wait_for_response().await
    }

    /// Wait for the in-flight request to finish and apply its outcome.
    ///
    /// Returns `false` when nothing was in flight.
    pub async fn wait_for_response(&mut self) -> bool {
        let Some(handle) = self.in_flight.take() else {
            return false;
        };

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(err) => Err(GenerationRequestFailed::new(format!(
                "generation task did not complete: {}",
                err
            ))),
        };
        self.complete(outcome);
        true
    }

    fn complete(&mut self, outcome: Result<String, GenerationRequestFailed>) {
        match outcome {
            Ok(reply) => {
                tracing::info!(chars = reply.chars().count(), "reply generated");
                self.phase = Phase::Succeeded(reply);
            }
            Err(err) => {
                tracing::warn!(reason = %err.reason, "reply generation failed");
                self.phase = Phase::Failed(FAILURE_MESSAGE.to_string());
            }
        }
    }

    /// Copy the generated reply to the clipboard.
    ///
    /// Returns `Ok(false)` without touching the clipboard when there is no
    /// reply. The acknowledgment is only raised after a successful write.
    pub fn copy_result(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool, ClipboardError> {
        let Phase::Succeeded(reply) = &self.phase else {
            return Ok(false);
        };

        if let Err(err) = clipboard.write_text(reply) {
            tracing::warn!(reason = %err.reason, "failed to copy reply");
            return Err(err);
        }
        tracing::debug!("reply copied to clipboard");

        self.copy_ack_until = Some(Instant::now() + self.ack_interval);
        Ok(true)
    }

    pub fn copy_acknowledged(&self) -> bool {
        self.copy_ack_until
            .is_some_and(|until| Instant::now() < until)
    }

    /// Drop an acknowledgment whose display interval has elapsed.
    pub fn tick(&mut self) {
        if let Some(until) = self.copy_ack_until {
            if Instant::now() >= until {
                self.copy_ack_until = None;
            }
        }
    }
}
