//! Message types exchanged with the remote model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A single request/response exchange: instructions plus one user message.
/// Nothing is carried over between turns.
pub fn single_turn(instructions: impl Into<String>, user_message: impl Into<String>) -> [Message; 2] {
    [Message::system(instructions), Message::user(user_message)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_turn_shape() {
        let [system, user] = single_turn("be helpful", "oi");
        assert_eq!(system.role, Role::System);
        assert_eq!(user, Message::user("oi"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
