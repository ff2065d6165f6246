//! Single-seed conversation session.
//!
//! The first successful `send` fixes the session's seed (typically a guideline
//! document). Every later turn is sent as `[seed, turn]`, so the request size
//! stays constant and no server-side conversation state is assumed.

use anyhow::Result;
use tracing::debug;

use crate::core::message::Message;
use crate::core::request::{TurnKind, compose_request};
use crate::io::backend::ChatBackend;

/// One logical conversation against a chat backend.
#[derive(Debug)]
pub struct ChatSession<B> {
    model: String,
    history: Vec<Message>,
    backend: B,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(model: impl Into<String>, backend: B) -> Self {
        Self {
            model: model.into(),
            history: Vec::new(),
            backend,
        }
    }

    /// Send `text` and return the backend's reply.
    ///
    /// The first successful call stores `text` as the seed. Replies are never
    /// stored. Backend errors propagate unchanged and leave the history as it was.
    pub fn send(&mut self, text: &str) -> Result<String> {
        let request = compose_request(&self.history, text);
        debug!(
            model = %self.model,
            kind = ?request.kind,
            messages = request.messages.len(),
            "sending turn"
        );
        let reply = self.backend.chat(&self.model, &request.messages)?;
        if request.kind == TurnKind::Seed {
            self.history = request.messages;
        }
        Ok(reply)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn is_seeded(&self) -> bool {
        !self.history.is_empty()
    }
}
