//! Role-tagged chat messages.
//!
//! These types are the contract between a session and any chat backend. The
//! serialized form matches the chat wire format (`{"role":"user","content":..}`).

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_role() {
        let json = serde_json::to_string(&Message::user("hi")).expect("serialize");
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn deserializes_assistant_reply() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"ok"}"#).expect("parse");
        assert_eq!(msg, Message::assistant("ok"));
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.content(), "ok");
    }
}
