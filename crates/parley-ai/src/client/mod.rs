//! Bridge between a conversation and the hosted model.
//!
//! `ChatClient` sends one message per call and always produces reply text:
//! backend failures are logged and replaced by a fixed apology.

mod chat;
mod types;


pub use chat::ChatClient;
pub use types::{ChatMode, ChatSettings, Reply, DEFAULT_APOLOGY};
