//! Outgoing request composition for a seeded conversation.
//!
//! A session stores at most one message (the seed). Every turn is sent as the
//! seed plus the turn text, unless the turn text is the seed itself.

use crate::core::message::Message;

/// How a turn relates to the stored seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// No seed stored yet; this turn becomes the seed once the backend answers.
    Seed,
    /// Turn text equals the seed content; the seed is resent unchanged.
    Resend,
    /// Regular turn: seed plus one fresh user message.
    Turn,
}

/// The message list to send plus its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRequest {
    pub kind: TurnKind,
    pub messages: Vec<Message>,
}

/// Build the request for `text` given the stored `history`.
///
/// Seed detection compares content, not call order: a turn whose text equals
/// the seed is indistinguishable from a resend of the seed.
pub fn compose_request(history: &[Message], text: &str) -> ComposedRequest {
    let Some(seed) = history.first() else {
        return ComposedRequest {
            kind: TurnKind::Seed,
            messages: vec![Message::user(text)],
        };
    };

    if seed.content() == text {
        return ComposedRequest {
            kind: TurnKind::Resend,
            messages: history.to_vec(),
        };
    }

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.extend_from_slice(history);
    messages.push(Message::user(text));
    ComposedRequest {
        kind: TurnKind::Turn,
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_sends_single_user_message() {
        let request = compose_request(&[], "guidelines");
        assert_eq!(request.kind, TurnKind::Seed);
        assert_eq!(request.messages, vec![Message::user("guidelines")]);
    }

    #[test]
    fn different_text_appends_after_seed() {
        let history = vec![Message::user("guidelines")];
        let request = compose_request(&history, "file body");
        assert_eq!(request.kind, TurnKind::Turn);
        assert_eq!(
            request.messages,
            vec![Message::user("guidelines"), Message::user("file body")]
        );
    }

    #[test]
    fn seed_text_is_not_duplicated() {
        let history = vec![Message::user("guidelines")];
        let request = compose_request(&history, "guidelines");
        assert_eq!(request.kind, TurnKind::Resend);
        assert_eq!(request.messages, history);
    }

    #[test]
    fn comparison_is_exact_content_match() {
        let history = vec![Message::user("guidelines")];
        let request = compose_request(&history, "guidelines\n");
        assert_eq!(request.kind, TurnKind::Turn);
        assert_eq!(request.messages.len(), 2);
    }
}
