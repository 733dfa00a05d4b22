//! Conversation session management.
//!
//! A `ConversationSession` holds the transcript of one chat and its running
//! usage counter. It knows nothing about transport.

mod manager;


pub use manager::ConversationSession;
