pub mod clipboard;
pub mod config;
pub mod controller;
pub mod generator;
pub mod state;
pub mod tone;

// Re-export main types for convenience
pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use config::Config;
pub use controller::{ReplyRequestController, COPY_ACK_INTERVAL, FAILURE_MESSAGE};
pub use generator::{GenerationRequestFailed, HttpReplyClient, ReplyGenerator};
pub use state::{DraftInput, ReplyRequest, RequestStatus};
pub use tone::Tone;
