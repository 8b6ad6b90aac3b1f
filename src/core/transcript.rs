//! Append-only message store for the current session.

use tracing::debug;

use super::constants::GREETING;
use super::message::Message;

/// Ordered conversation plus the in-flight flag that gates input.
///
/// Messages can only be appended. Insertion order is the rendered order.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    pending: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opened with the assistant greeting, tagged with `model`.
    pub fn with_greeting(model: &str) -> Self {
        let mut transcript = Self::new();
        transcript.append_assistant_message(GREETING, Some(model.to_string()));
        transcript
    }

    /// Append a user-authored message. Blank text is refused and `None` is
    /// returned; otherwise the index of the new entry.
    pub fn append_user_message(
        &mut self,
        text: impl Into<String>,
        model: Option<String>,
    ) -> Option<usize> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(self.push(Message::user(text, model)))
    }

    /// Append an assistant-authored message (reply, fallback or system notice).
    pub fn append_assistant_message(
        &mut self,
        text: impl Into<String>,
        model: Option<String>,
    ) -> usize {
        self.push(Message::assistant(text, model))
    }

    fn push(&mut self, message: Message) -> usize {
        debug!(
            index = self.messages.len(),
            is_user = message.is_user(),
            model = message.model().unwrap_or("-"),
            "transcript append"
        );
        self.messages.push(message);
        self.messages.len() - 1
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    /// True while a chat request is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_seeds_one_assistant_message() {
        let transcript = Transcript::with_greeting("llama3-8b-8192");
        assert_eq!(transcript.len(), 1);
        let seed = &transcript.messages()[0];
        assert!(seed.is_assistant());
        assert_eq!(seed.content(), GREETING);
        assert_eq!(seed.model(), Some("llama3-8b-8192"));
        assert!(!transcript.is_pending());
    }

    #[test]
    fn blank_user_text_is_refused() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.append_user_message("", None), None);
        assert_eq!(transcript.append_user_message("  \n\t ", None), None);
        assert!(transcript.is_empty());
    }

    #[test]
    fn appends_keep_insertion_order() {
        let mut transcript = Transcript::new();
        assert_eq!(
            transcript.append_user_message("first", Some("m".into())),
            Some(0)
        );
        assert_eq!(transcript.append_assistant_message("second", None), 1);
        assert_eq!(
            transcript.append_user_message("third", Some("m".into())),
            Some(2)
        );

        let contents: Vec<&str> = transcript.messages().iter().map(|m| m.content()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(transcript.last().map(|m| m.content()), Some("third"));
    }

    #[test]
    fn assistant_messages_accept_any_text() {
        let mut transcript = Transcript::new();
        transcript.append_assistant_message("", None);
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn pending_flag_toggles() {
        let mut transcript = Transcript::new();
        transcript.set_pending(true);
        assert!(transcript.is_pending());
        transcript.set_pending(false);
        assert!(!transcript.is_pending());
        assert!(transcript.is_empty());
    }
}
