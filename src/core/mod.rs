//! Core chat engine components
//!
//! Session bookkeeping and the submit flow that sits between the HTTP layer
//! and the model provider.

mod chat;
mod session;

pub use chat::{ChatEngine, ChatError, Submission};
pub use session::{Session, SessionStore};
