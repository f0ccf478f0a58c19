//! Chat orchestration: intent classification, then retrieval or prediction.

mod intent;
mod service;

pub use intent::{Intent, IntentClassifier};
pub use service::{ChatReply, ChatService};
