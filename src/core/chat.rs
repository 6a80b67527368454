//! Chat engine
//!
//! The ChatEngine handles one user message per call:
//! 1. Loads the memory record
//! 2. Builds the instruction prompt (persona, memory, action list)
//! 3. Sends a single-turn request to the LLM
//! 4. Interprets the reply as a command or plain text
//! 5. Dispatches commands and returns the confirmation, or returns the text

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::actions::{ActionError, Dispatcher};
use crate::config::prompts;
use crate::conversation::single_turn;
use crate::providers::{Provider, ProviderError};

use super::interpreter::{interpret, Interpretation};
use super::memory::MemoryStore;

/// Reply shown to the user when anything goes wrong
pub const FAILURE_MESSAGE: &str = "Senhor, falha de conexão com os servidores Stark.";

/// Request to the chat engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,
}

/// Response from the chat engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Text for the user: the model's reply or an action confirmation
    pub response: String,
}

/// Errors from the chat engine
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),
}

/// What a successful turn produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The model answered in prose
    Text(String),
    /// The model asked for an action; holds the dispatcher's confirmation
    Action(String),
}

impl Reply {
    pub fn into_text(self) -> String {
        match self {
            Reply::Text(text) | Reply::Action(text) => text,
        }
    }
}

/// The core chat engine
pub struct ChatEngine {
    provider: Provider,
    dispatcher: Dispatcher,
    memory: Arc<MemoryStore>,
}

impl ChatEngine {
    pub fn new(provider: Provider, dispatcher: Dispatcher, memory: Arc<MemoryStore>) -> Self {
        Self {
            provider,
            dispatcher,
            memory,
        }
    }

    /// Process one user message
    pub async fn chat(&self, message: &str) -> Result<Reply, ChatError> {
        let record = self.memory.load().await;
        let instructions = prompts::instruction_prompt(&record, Local::now());

        let reply = self
            .provider
            .chat(&single_turn(instructions, message))
            .await?;
        tracing::debug!(provider = self.provider.name(), reply = %reply.content, "Model replied");

        match interpret(&reply.content) {
            Interpretation::Command(command) => {
                let confirmation = self.dispatcher.dispatch(&command).await?;
                Ok(Reply::Action(confirmation))
            }
            Interpretation::Text(text) => Ok(Reply::Text(text)),
        }
    }
}
