//! Core assistant components
//!
//! Memory, reply interpretation and the chat engine that ties them to the
//! remote model and the action dispatcher.

mod chat;
mod interpreter;
mod memory;

pub use chat::{ChatEngine, ChatRequest, ChatResponse, FAILURE_MESSAGE};
pub use memory::{MemoryError, MemoryRecord, MemoryStore};
